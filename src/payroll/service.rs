//! Payroll service: runs payroll and manages bonuses and reports.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{PayslipInput, compute_payslip};
use crate::config::{BusinessConfig, PayrollConfiguration};
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    Business, Deduction, Employee, EmployeeBonus, EmployeeFailure, EmployeeYtd, NewBonus,
    PayPeriod, PayrollRun, PayrollRunReport, PayrollRunResult, PayrollSummary, YtdSummary,
};
use crate::store::PayrollStore;

/// One employee picked for a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSelection {
    /// The employee to pay.
    pub employee_id: String,
    /// Overtime hours worked in the period.
    #[serde(default)]
    pub overtime_hours: Decimal,
}

impl EmployeeSelection {
    /// Selects an employee with no overtime.
    pub fn new(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            overtime_hours: Decimal::ZERO,
        }
    }
}

/// Input to [`PayrollService::run_payroll`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunPayrollRequest {
    /// The business being paid.
    pub business_id: String,
    /// The period covered.
    pub period: PayPeriod,
    /// Date the run is dated for; defaults to the period end.
    #[serde(default)]
    pub run_date: Option<NaiveDate>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// The employees to pay.
    pub employees: Vec<EmployeeSelection>,
}

/// Service for payroll operations
#[derive(Clone)]
pub struct PayrollService {
    store: Arc<dyn PayrollStore>,
}

impl PayrollService {
    /// Creates a service writing through `store`.
    pub fn new(store: Arc<dyn PayrollStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<dyn PayrollStore> {
        &self.store
    }

    /// Loads a business's seed configuration into the store.
    pub fn seed(&self, config: BusinessConfig) -> PayrollResult<()> {
        config.validate()?;
        let (business, payroll, deductions, employees) = config.into_parts();
        let business_id = business.id.clone();

        self.store.upsert_business(business)?;
        if let Some(payroll) = payroll {
            self.store.set_configuration(&business_id, payroll)?;
        }
        self.store.set_deductions(&business_id, deductions)?;
        let employee_count = employees.len();
        for employee in employees {
            self.store.upsert_employee(employee)?;
        }

        info!(
            business_id = %business_id,
            employees = employee_count,
            "Seeded business"
        );
        Ok(())
    }

    /// Registers or replaces a business.
    pub fn register_business(&self, business: Business) -> PayrollResult<()> {
        self.store.upsert_business(business)
    }

    /// Validates and stores the payroll configuration of a business.
    pub fn configure(&self, business_id: &str, config: PayrollConfiguration) -> PayrollResult<()> {
        self.require_business(business_id)?;
        config.validate()?;
        self.store.set_configuration(business_id, config)
    }

    /// Validates and stores the deductions of a business.
    pub fn set_deductions(&self, business_id: &str, deductions: Vec<Deduction>) -> PayrollResult<()> {
        self.require_business(business_id)?;
        for deduction in &deductions {
            deduction.validate()?;
        }
        self.store.set_deductions(business_id, deductions)
    }

    /// Validates and stores an employee of an existing business.
    pub fn register_employee(&self, employee: Employee) -> PayrollResult<()> {
        self.require_business(&employee.business_id)?;
        employee.validate()?;
        self.store.upsert_employee(employee)
    }

    /// Runs payroll for the selected employees of a business.
    ///
    /// Run-level problems are returned as `Err` before anything is written.
    /// Once the draft run exists, each employee is computed and committed on
    /// their own; a failing employee is listed in the result and the batch
    /// carries on.
    pub fn run_payroll(&self, request: RunPayrollRequest) -> PayrollResult<PayrollRunResult> {
        let start_time = Instant::now();
        let RunPayrollRequest {
            business_id,
            period,
            run_date,
            notes,
            employees,
        } = request;

        period.validate()?;
        self.require_operating_business(&business_id)?;
        let config = self
            .store
            .get_configuration(&business_id)?
            .ok_or_else(|| PayrollError::ConfigurationMissing {
                business_id: business_id.clone(),
            })?;
        config.validate()?;
        let deductions = self.store.load_deductions(&business_id)?;

        let eligible = self.eligible_employees(&business_id, &employees)?;
        if eligible.is_empty() {
            return Err(PayrollError::NoEligibleEmployees { business_id });
        }

        let now = Utc::now();
        let run = self.store.begin_run(PayrollRun::draft(
            business_id.as_str(),
            period,
            run_date.unwrap_or(period.end_date),
            notes,
            now,
        ))?;
        info!(
            run_id = %run.id,
            business_id = %business_id,
            start = %period.start_date,
            end = %period.end_date,
            employees = eligible.len(),
            "Payroll run started"
        );

        let mut payslip_ids = Vec::new();
        let mut failures = Vec::new();
        for (employee, overtime_hours) in &eligible {
            match self.pay_employee(&run, employee, *overtime_hours, &config, &deductions) {
                Ok(payslip_id) => payslip_ids.push(payslip_id),
                Err(err) => {
                    warn!(
                        run_id = %run.id,
                        employee_id = %employee.id,
                        error = %err,
                        "Employee payslip failed"
                    );
                    failures.push(EmployeeFailure {
                        employee_id: employee.id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let run = self
            .store
            .finish_run(run.id, payslip_ids.len(), failures.len(), Utc::now())?;
        info!(
            run_id = %run.id,
            status = ?run.status,
            succeeded = run.succeeded,
            failed = run.failed,
            duration_us = start_time.elapsed().as_micros(),
            "Payroll run finished"
        );

        Ok(PayrollRunResult {
            run_id: run.id,
            status: run.status,
            succeeded: run.succeeded,
            failed: run.failed,
            payslip_ids,
            failures,
        })
    }

    /// Active employees of `business_id` from the selection, ordered by id.
    fn eligible_employees(
        &self,
        business_id: &str,
        selection: &[EmployeeSelection],
    ) -> PayrollResult<Vec<(Employee, Decimal)>> {
        let mut eligible: BTreeMap<String, (Employee, Decimal)> = BTreeMap::new();
        for selected in selection {
            if eligible.contains_key(&selected.employee_id) {
                continue;
            }
            match self.store.get_employee(&selected.employee_id)? {
                Some(employee) if employee.business_id == business_id && employee.is_active => {
                    eligible.insert(employee.id.clone(), (employee, selected.overtime_hours));
                }
                Some(_) => debug!(
                    business_id = %business_id,
                    employee_id = %selected.employee_id,
                    "Skipping inactive or foreign employee"
                ),
                None => debug!(
                    business_id = %business_id,
                    employee_id = %selected.employee_id,
                    "Skipping unknown employee"
                ),
            }
        }
        Ok(eligible.into_values().collect())
    }

    fn pay_employee(
        &self,
        run: &PayrollRun,
        employee: &Employee,
        overtime_hours: Decimal,
        config: &PayrollConfiguration,
        deductions: &[Deduction],
    ) -> PayrollResult<Uuid> {
        let bonuses = self.store.load_bonuses(&employee.id)?;
        let now = Utc::now();
        let payslip = compute_payslip(PayslipInput {
            payroll_run_id: run.id,
            employee,
            overtime_hours,
            bonuses: &bonuses,
            deductions,
            config,
            period: run.period,
            now,
        })?;
        let payslip_id = payslip.id;
        let net_pay = payslip.net_pay;

        self.store
            .commit_payslip(payslip, run.period.ytd_year(), now)
            .map_err(|err| PayrollError::PayslipComputationFailed {
                employee_id: employee.id.clone(),
                message: format!("commit failed: {}", err),
            })?;

        debug!(
            run_id = %run.id,
            employee_id = %employee.id,
            net_pay = %net_pay,
            "Payslip committed"
        );
        Ok(payslip_id)
    }

    /// Records a bonus for an employee.
    pub fn add_bonus(&self, employee_id: &str, bonus: NewBonus) -> PayrollResult<EmployeeBonus> {
        bonus.validate()?;
        self.require_employee(employee_id)?;
        let stored = self
            .store
            .insert_bonus(bonus.into_bonus(employee_id, Utc::now()))?;
        info!(
            employee_id = %employee_id,
            bonus_id = %stored.id,
            bonus_type = stored.bonus_type.as_str(),
            "Bonus recorded"
        );
        Ok(stored)
    }

    /// Replaces the details of an unapplied bonus.
    pub fn update_bonus(&self, bonus_id: Uuid, update: NewBonus) -> PayrollResult<EmployeeBonus> {
        update.validate()?;
        let existing = self
            .store
            .get_bonus(bonus_id)?
            .ok_or(PayrollError::BonusNotFound { bonus_id })?;
        existing.ensure_mutable()?;

        let updated = EmployeeBonus {
            bonus_type: update.bonus_type,
            amount: update.amount,
            month: update.month,
            year: update.year,
            description: update.description,
            is_taxable: update.is_taxable,
            ..existing
        };
        self.store.update_bonus(updated)
    }

    /// Deletes an unapplied bonus.
    pub fn delete_bonus(&self, bonus_id: Uuid) -> PayrollResult<()> {
        self.store.delete_bonus(bonus_id)?;
        info!(bonus_id = %bonus_id, "Bonus deleted");
        Ok(())
    }

    /// Lists an employee's bonuses.
    pub fn list_bonuses(&self, employee_id: &str) -> PayrollResult<Vec<EmployeeBonus>> {
        self.require_employee(employee_id)?;
        self.store.load_bonuses(employee_id)
    }

    /// Returns a run with its payslips and totals.
    pub fn run_report(&self, run_id: Uuid) -> PayrollResult<PayrollRunReport> {
        let run = self
            .store
            .get_run(run_id)?
            .ok_or(PayrollError::RunNotFound { run_id })?;
        let payslips = self.store.load_payslips_for_run(run_id)?;
        let summary = PayrollSummary::from_payslips(&payslips)?;
        Ok(PayrollRunReport {
            run,
            payslips,
            summary,
        })
    }

    /// Returns an employee's YTD totals, zeroed if nothing has been paid yet.
    pub fn employee_ytd(&self, employee_id: &str, year: i32) -> PayrollResult<EmployeeYtd> {
        self.require_employee(employee_id)?;
        Ok(self
            .store
            .get_ytd(employee_id, year)?
            .unwrap_or_else(|| EmployeeYtd::zeroed(employee_id, year, Utc::now())))
    }

    /// Summarizes YTD totals across a business's employees.
    pub fn ytd_summary(&self, business_id: &str, year: i32) -> PayrollResult<YtdSummary> {
        self.require_business(business_id)?;
        let mut records = Vec::new();
        for record in self.store.load_ytd_for_business(business_id, year)? {
            let name = self
                .store
                .get_employee(&record.employee_id)?
                .map(|e| e.full_name())
                .unwrap_or_else(|| record.employee_id.clone());
            records.push((name, record));
        }
        YtdSummary::build(business_id, year, records, Utc::now())
    }

    fn require_business(&self, business_id: &str) -> PayrollResult<Business> {
        self.store
            .get_business(business_id)?
            .ok_or_else(|| PayrollError::BusinessNotFound {
                business_id: business_id.to_string(),
            })
    }

    fn require_operating_business(&self, business_id: &str) -> PayrollResult<Business> {
        let business = self.require_business(business_id)?;
        if !business.can_operate() {
            return Err(PayrollError::BusinessNotApproved {
                business_id: business_id.to_string(),
            });
        }
        Ok(business)
    }

    fn require_employee(&self, employee_id: &str) -> PayrollResult<Employee> {
        self.store
            .get_employee(employee_id)?
            .ok_or_else(|| PayrollError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })
    }
}
