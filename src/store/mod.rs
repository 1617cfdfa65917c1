//! Persistence boundary for payroll data.
//!
//! [`PayrollStore`] is the repository the payroll service writes through.
//! Implementations must make [`PayrollStore::begin_run`] and
//! [`PayrollStore::commit_payslip`] atomic: either every effect of the call
//! is visible afterwards or none is.

mod memory;

pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::PayrollConfiguration;
use crate::error::PayrollResult;
use crate::models::{
    Business, Deduction, Employee, EmployeeBonus, EmployeeYtd, PayrollRun, Payslip,
};

/// Trait for payroll repository operations
pub trait PayrollStore: Send + Sync {
    /// Inserts or replaces a business.
    fn upsert_business(&self, business: Business) -> PayrollResult<()>;
    /// Looks up a business.
    fn get_business(&self, business_id: &str) -> PayrollResult<Option<Business>>;

    /// Sets the payroll configuration of a business.
    fn set_configuration(
        &self,
        business_id: &str,
        config: PayrollConfiguration,
    ) -> PayrollResult<()>;
    /// Looks up the payroll configuration of a business.
    fn get_configuration(&self, business_id: &str) -> PayrollResult<Option<PayrollConfiguration>>;

    /// Replaces the deductions of a business.
    fn set_deductions(&self, business_id: &str, deductions: Vec<Deduction>) -> PayrollResult<()>;
    /// Lists the deductions of a business.
    fn load_deductions(&self, business_id: &str) -> PayrollResult<Vec<Deduction>>;

    /// Inserts or replaces an employee.
    fn upsert_employee(&self, employee: Employee) -> PayrollResult<()>;
    /// Looks up an employee.
    fn get_employee(&self, employee_id: &str) -> PayrollResult<Option<Employee>>;
    /// Lists the employees of a business ordered by id.
    fn load_employees(&self, business_id: &str) -> PayrollResult<Vec<Employee>>;

    /// Inserts a bonus; fails with `DuplicateBonus` if the employee already
    /// has one of the same type for the same month.
    fn insert_bonus(&self, bonus: EmployeeBonus) -> PayrollResult<EmployeeBonus>;
    /// Replaces an unapplied bonus.
    fn update_bonus(&self, bonus: EmployeeBonus) -> PayrollResult<EmployeeBonus>;
    /// Deletes an unapplied bonus.
    fn delete_bonus(&self, bonus_id: Uuid) -> PayrollResult<()>;
    /// Looks up a bonus.
    fn get_bonus(&self, bonus_id: Uuid) -> PayrollResult<Option<EmployeeBonus>>;
    /// Lists an employee's bonuses ordered by creation time.
    fn load_bonuses(&self, employee_id: &str) -> PayrollResult<Vec<EmployeeBonus>>;

    /// Creates a draft run; fails with `DuplicatePeriod` if the business
    /// already has a run for the same period.
    fn begin_run(&self, run: PayrollRun) -> PayrollResult<PayrollRun>;
    /// Moves a run to its terminal status.
    fn finish_run(
        &self,
        run_id: Uuid,
        succeeded: usize,
        failed: usize,
        now: DateTime<Utc>,
    ) -> PayrollResult<PayrollRun>;
    /// Looks up a run.
    fn get_run(&self, run_id: Uuid) -> PayrollResult<Option<PayrollRun>>;

    /// Persists a payslip, marks its bonuses applied and folds it into the
    /// employee's YTD record for `year`, all or nothing.
    fn commit_payslip(
        &self,
        payslip: Payslip,
        year: i32,
        now: DateTime<Utc>,
    ) -> PayrollResult<EmployeeYtd>;
    /// Lists the payslips of a run ordered by employee id.
    fn load_payslips_for_run(&self, run_id: Uuid) -> PayrollResult<Vec<Payslip>>;
    /// Lists an employee's payslips that accumulate into `year`.
    fn load_payslips_for_employee(&self, employee_id: &str, year: i32)
    -> PayrollResult<Vec<Payslip>>;

    /// Looks up an employee's YTD record.
    fn get_ytd(&self, employee_id: &str, year: i32) -> PayrollResult<Option<EmployeeYtd>>;
    /// Lists the YTD records of a business's employees ordered by employee id.
    fn load_ytd_for_business(&self, business_id: &str, year: i32)
    -> PayrollResult<Vec<EmployeeYtd>>;
}
