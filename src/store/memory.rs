//! In-memory payroll store
//!
//! Every table lives behind one `RwLock`, so each mutating call validates
//! and applies its writes under a single lock acquisition.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::config::PayrollConfiguration;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    Business, Deduction, Employee, EmployeeBonus, EmployeeYtd, PayrollRun, Payslip,
};

use super::PayrollStore;

#[derive(Debug, Clone)]
struct StoredPayslip {
    year: i32,
    payslip: Payslip,
}

#[derive(Debug, Default)]
struct Tables {
    businesses: HashMap<String, Business>,
    configurations: HashMap<String, PayrollConfiguration>,
    deductions: HashMap<String, Vec<Deduction>>,
    employees: BTreeMap<String, Employee>,
    bonuses: HashMap<Uuid, EmployeeBonus>,
    runs: HashMap<Uuid, PayrollRun>,
    payslips: Vec<StoredPayslip>,
    ytd: HashMap<(String, i32), EmployeeYtd>,
}

impl Tables {
    fn duplicate_bonus(&self, bonus: &EmployeeBonus) -> Option<&EmployeeBonus> {
        self.bonuses.values().find(|existing| {
            existing.id != bonus.id
                && existing.employee_id == bonus.employee_id
                && existing.bonus_type == bonus.bonus_type
                && existing.month == bonus.month
                && existing.year == bonus.year
        })
    }

    fn ensure_unique_bonus(&self, bonus: &EmployeeBonus) -> PayrollResult<()> {
        if self.duplicate_bonus(bonus).is_some() {
            return Err(PayrollError::DuplicateBonus {
                employee_id: bonus.employee_id.clone(),
                bonus_type: bonus.bonus_type.as_str().to_string(),
                month: bonus.month,
                year: bonus.year,
            });
        }
        Ok(())
    }

    fn mutable_bonus(&self, bonus_id: Uuid) -> PayrollResult<&EmployeeBonus> {
        let bonus = self
            .bonuses
            .get(&bonus_id)
            .ok_or(PayrollError::BonusNotFound { bonus_id })?;
        bonus.ensure_mutable()?;
        Ok(bonus)
    }
}

/// Thread-safe in-memory implementation of [`PayrollStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl PayrollStore for MemoryStore {
    fn upsert_business(&self, business: Business) -> PayrollResult<()> {
        self.tables
            .write()
            .businesses
            .insert(business.id.clone(), business);
        Ok(())
    }

    fn get_business(&self, business_id: &str) -> PayrollResult<Option<Business>> {
        Ok(self.tables.read().businesses.get(business_id).cloned())
    }

    fn set_configuration(
        &self,
        business_id: &str,
        config: PayrollConfiguration,
    ) -> PayrollResult<()> {
        self.tables
            .write()
            .configurations
            .insert(business_id.to_string(), config);
        Ok(())
    }

    fn get_configuration(&self, business_id: &str) -> PayrollResult<Option<PayrollConfiguration>> {
        Ok(self.tables.read().configurations.get(business_id).cloned())
    }

    fn set_deductions(&self, business_id: &str, deductions: Vec<Deduction>) -> PayrollResult<()> {
        self.tables
            .write()
            .deductions
            .insert(business_id.to_string(), deductions);
        Ok(())
    }

    fn load_deductions(&self, business_id: &str) -> PayrollResult<Vec<Deduction>> {
        Ok(self
            .tables
            .read()
            .deductions
            .get(business_id)
            .cloned()
            .unwrap_or_default())
    }

    fn upsert_employee(&self, employee: Employee) -> PayrollResult<()> {
        self.tables
            .write()
            .employees
            .insert(employee.id.clone(), employee);
        Ok(())
    }

    fn get_employee(&self, employee_id: &str) -> PayrollResult<Option<Employee>> {
        Ok(self.tables.read().employees.get(employee_id).cloned())
    }

    fn load_employees(&self, business_id: &str) -> PayrollResult<Vec<Employee>> {
        Ok(self
            .tables
            .read()
            .employees
            .values()
            .filter(|e| e.business_id == business_id)
            .cloned()
            .collect())
    }

    fn insert_bonus(&self, bonus: EmployeeBonus) -> PayrollResult<EmployeeBonus> {
        let mut tables = self.tables.write();
        tables.ensure_unique_bonus(&bonus)?;
        tables.bonuses.insert(bonus.id, bonus.clone());
        Ok(bonus)
    }

    fn update_bonus(&self, bonus: EmployeeBonus) -> PayrollResult<EmployeeBonus> {
        let mut tables = self.tables.write();
        let existing = tables.mutable_bonus(bonus.id)?;
        if existing.employee_id != bonus.employee_id || bonus.is_applied {
            return Err(PayrollError::InvalidBonus {
                field: "bonus".to_string(),
                message: "employee and applied state cannot be changed".to_string(),
            });
        }
        tables.ensure_unique_bonus(&bonus)?;
        tables.bonuses.insert(bonus.id, bonus.clone());
        Ok(bonus)
    }

    fn delete_bonus(&self, bonus_id: Uuid) -> PayrollResult<()> {
        let mut tables = self.tables.write();
        tables.mutable_bonus(bonus_id)?;
        tables.bonuses.remove(&bonus_id);
        Ok(())
    }

    fn get_bonus(&self, bonus_id: Uuid) -> PayrollResult<Option<EmployeeBonus>> {
        Ok(self.tables.read().bonuses.get(&bonus_id).cloned())
    }

    fn load_bonuses(&self, employee_id: &str) -> PayrollResult<Vec<EmployeeBonus>> {
        let mut bonuses: Vec<EmployeeBonus> = self
            .tables
            .read()
            .bonuses
            .values()
            .filter(|b| b.employee_id == employee_id)
            .cloned()
            .collect();
        bonuses.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(bonuses)
    }

    fn begin_run(&self, run: PayrollRun) -> PayrollResult<PayrollRun> {
        let mut tables = self.tables.write();
        if tables
            .runs
            .values()
            .any(|existing| existing.covers(&run.business_id, &run.period))
        {
            return Err(PayrollError::DuplicatePeriod {
                business_id: run.business_id.clone(),
                start: run.period.start_date,
                end: run.period.end_date,
            });
        }
        tables.runs.insert(run.id, run.clone());
        Ok(run)
    }

    fn finish_run(
        &self,
        run_id: Uuid,
        succeeded: usize,
        failed: usize,
        now: DateTime<Utc>,
    ) -> PayrollResult<PayrollRun> {
        let mut tables = self.tables.write();
        let run = tables
            .runs
            .get_mut(&run_id)
            .ok_or(PayrollError::RunNotFound { run_id })?;
        run.finish(succeeded, failed, now);
        Ok(run.clone())
    }

    fn get_run(&self, run_id: Uuid) -> PayrollResult<Option<PayrollRun>> {
        Ok(self.tables.read().runs.get(&run_id).cloned())
    }

    fn commit_payslip(
        &self,
        mut payslip: Payslip,
        year: i32,
        now: DateTime<Utc>,
    ) -> PayrollResult<EmployeeYtd> {
        payslip.recompute_totals()?;
        let mut tables = self.tables.write();

        // Validate everything before the first write.
        let run = tables
            .runs
            .get(&payslip.payroll_run_id)
            .ok_or(PayrollError::RunNotFound {
                run_id: payslip.payroll_run_id,
            })?;
        if run.status.is_terminal() {
            return Err(PayrollError::calculation(format!(
                "payroll run {} is no longer accepting payslips",
                run.id
            )));
        }
        if !tables.employees.contains_key(&payslip.employee_id) {
            return Err(PayrollError::EmployeeNotFound {
                employee_id: payslip.employee_id.clone(),
            });
        }
        if tables.payslips.iter().any(|stored| {
            stored.payslip.id == payslip.id
                || (stored.payslip.payroll_run_id == payslip.payroll_run_id
                    && stored.payslip.employee_id == payslip.employee_id)
        }) {
            return Err(PayrollError::calculation(format!(
                "payslip for employee '{}' already recorded in run {}",
                payslip.employee_id, payslip.payroll_run_id
            )));
        }
        for bonus_id in &payslip.applied_bonus_ids {
            let bonus = tables.mutable_bonus(*bonus_id)?;
            if bonus.employee_id != payslip.employee_id {
                return Err(PayrollError::InvalidBonus {
                    field: "employee_id".to_string(),
                    message: format!(
                        "bonus {} belongs to employee '{}'",
                        bonus_id, bonus.employee_id
                    ),
                });
            }
        }

        let key = (payslip.employee_id.clone(), year);
        let ytd = tables
            .ytd
            .get(&key)
            .cloned()
            .unwrap_or_else(|| EmployeeYtd::zeroed(&payslip.employee_id, year, now))
            .accumulate(&payslip, now)?;

        for bonus_id in &payslip.applied_bonus_ids {
            if let Some(bonus) = tables.bonuses.get_mut(bonus_id) {
                bonus.mark_applied(now);
            }
        }
        tables.ytd.insert(key, ytd.clone());
        tables.payslips.push(StoredPayslip { year, payslip });

        Ok(ytd)
    }

    fn load_payslips_for_run(&self, run_id: Uuid) -> PayrollResult<Vec<Payslip>> {
        let mut payslips: Vec<Payslip> = self
            .tables
            .read()
            .payslips
            .iter()
            .filter(|stored| stored.payslip.payroll_run_id == run_id)
            .map(|stored| stored.payslip.clone())
            .collect();
        payslips.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(payslips)
    }

    fn load_payslips_for_employee(
        &self,
        employee_id: &str,
        year: i32,
    ) -> PayrollResult<Vec<Payslip>> {
        Ok(self
            .tables
            .read()
            .payslips
            .iter()
            .filter(|stored| stored.year == year && stored.payslip.employee_id == employee_id)
            .map(|stored| stored.payslip.clone())
            .collect())
    }

    fn get_ytd(&self, employee_id: &str, year: i32) -> PayrollResult<Option<EmployeeYtd>> {
        Ok(self
            .tables
            .read()
            .ytd
            .get(&(employee_id.to_string(), year))
            .cloned())
    }

    fn load_ytd_for_business(
        &self,
        business_id: &str,
        year: i32,
    ) -> PayrollResult<Vec<EmployeeYtd>> {
        let tables = self.tables.read();
        Ok(tables
            .employees
            .values()
            .filter(|e| e.business_id == business_id)
            .filter_map(|e| tables.ytd.get(&(e.id.clone(), year)).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuditTrace, BonusType, NewBonus, PayPeriod};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> PayPeriod {
        PayPeriod::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap()
    }

    fn employee(id: &str) -> Employee {
        Employee {
            id: id.to_string(),
            business_id: "acme".to_string(),
            first_name: "Test".to_string(),
            last_name: id.to_string(),
            job_title: String::new(),
            basic_salary: Decimal::new(100_000, 0),
            date_of_hire: date(2023, 1, 1),
            is_active: true,
        }
    }

    fn bonus(employee_id: &str, bonus_type: BonusType) -> EmployeeBonus {
        NewBonus {
            bonus_type,
            amount: Decimal::new(10_000, 0),
            month: 1,
            year: 2025,
            description: String::new(),
            is_taxable: true,
        }
        .into_bonus(employee_id, Utc::now())
    }

    fn payslip(run_id: Uuid, employee_id: &str, bonus_ids: Vec<Uuid>) -> Payslip {
        Payslip {
            id: Uuid::new_v4(),
            payroll_run_id: run_id,
            employee_id: employee_id.to_string(),
            basic_pay: Decimal::new(100_000, 0),
            overtime_pay: Decimal::ZERO,
            bonus: Decimal::new(10_000, 0),
            paye_tax: Decimal::ZERO,
            nis_deduction: Decimal::new(3_300, 0),
            nht_deduction: Decimal::ZERO,
            heart_deduction: Decimal::ZERO,
            ed_deduction: Decimal::ZERO,
            other_deductions: Decimal::ZERO,
            gross_pay: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            net_pay: Decimal::ZERO,
            applied_bonus_ids: bonus_ids,
            audit_trace: AuditTrace::default(),
            generated_at: Utc::now(),
        }
    }

    fn store_with_run() -> (MemoryStore, PayrollRun) {
        let store = MemoryStore::new();
        store.upsert_employee(employee("emp_001")).unwrap();
        store.upsert_employee(employee("emp_002")).unwrap();
        let run = store
            .begin_run(PayrollRun::draft("acme", january(), date(2025, 1, 31), "", Utc::now()))
            .unwrap();
        (store, run)
    }

    #[test]
    fn test_begin_run_rejects_duplicate_period() {
        let (store, _) = store_with_run();
        let again = PayrollRun::draft("acme", january(), date(2025, 1, 31), "", Utc::now());

        let result = store.begin_run(again.clone());

        assert!(matches!(result, Err(PayrollError::DuplicatePeriod { .. })));
        assert!(store.get_run(again.id).unwrap().is_none());
    }

    #[test]
    fn test_begin_run_allows_other_business_same_period() {
        let (store, _) = store_with_run();
        let other = PayrollRun::draft("globex", january(), date(2025, 1, 31), "", Utc::now());
        assert!(store.begin_run(other).is_ok());
    }

    #[test]
    fn test_commit_payslip_applies_bonus_and_ytd() {
        let (store, run) = store_with_run();
        let bonus = store.insert_bonus(bonus("emp_001", BonusType::Performance)).unwrap();

        let ytd = store
            .commit_payslip(payslip(run.id, "emp_001", vec![bonus.id]), 2025, Utc::now())
            .unwrap();

        assert_eq!(ytd.gross_pay, Decimal::new(110_000, 0));
        assert_eq!(ytd.net_pay, Decimal::new(106_700, 0));
        assert_eq!(ytd.payslip_count, 1);
        assert!(store.get_bonus(bonus.id).unwrap().unwrap().is_applied);
        assert_eq!(store.load_payslips_for_run(run.id).unwrap().len(), 1);
        assert_eq!(store.get_ytd("emp_001", 2025).unwrap(), Some(ytd));
    }

    #[test]
    fn test_failed_commit_changes_nothing() {
        let (store, run) = store_with_run();
        let good = store.insert_bonus(bonus("emp_001", BonusType::Performance)).unwrap();
        let mut paid = store.insert_bonus(bonus("emp_001", BonusType::Holiday)).unwrap();
        paid.mark_applied(Utc::now());
        // Simulate a bonus that was consumed elsewhere.
        store.tables.write().bonuses.insert(paid.id, paid.clone());

        let result = store.commit_payslip(
            payslip(run.id, "emp_001", vec![good.id, paid.id]),
            2025,
            Utc::now(),
        );

        assert!(matches!(
            result,
            Err(PayrollError::BonusAlreadyApplied { .. })
        ));
        assert!(!store.get_bonus(good.id).unwrap().unwrap().is_applied);
        assert!(store.load_payslips_for_run(run.id).unwrap().is_empty());
        assert!(store.get_ytd("emp_001", 2025).unwrap().is_none());
    }

    #[test]
    fn test_commit_rejects_second_payslip_for_employee_in_run() {
        let (store, run) = store_with_run();
        store
            .commit_payslip(payslip(run.id, "emp_001", vec![]), 2025, Utc::now())
            .unwrap();

        let result = store.commit_payslip(payslip(run.id, "emp_001", vec![]), 2025, Utc::now());

        assert!(result.is_err());
        assert_eq!(store.get_ytd("emp_001", 2025).unwrap().unwrap().payslip_count, 1);
    }

    #[test]
    fn test_commit_rejected_after_run_finishes() {
        let (store, run) = store_with_run();
        store.finish_run(run.id, 0, 0, Utc::now()).unwrap();

        let result = store.commit_payslip(payslip(run.id, "emp_001", vec![]), 2025, Utc::now());
        assert!(matches!(result, Err(PayrollError::CalculationError { .. })));
    }

    #[test]
    fn test_commit_rejects_overflowing_totals() {
        let (store, run) = store_with_run();
        let mut slip = payslip(run.id, "emp_001", vec![]);
        slip.other_deductions = Decimal::MAX;

        let result = store.commit_payslip(slip, 2025, Utc::now());

        assert!(matches!(result, Err(PayrollError::CalculationError { .. })));
        assert!(store.load_payslips_for_run(run.id).unwrap().is_empty());
        assert!(store.get_ytd("emp_001", 2025).unwrap().is_none());
    }

    #[test]
    fn test_commit_rejects_bonus_of_other_employee() {
        let (store, run) = store_with_run();
        let theirs = store.insert_bonus(bonus("emp_002", BonusType::Sales)).unwrap();

        let result =
            store.commit_payslip(payslip(run.id, "emp_001", vec![theirs.id]), 2025, Utc::now());

        assert!(matches!(result, Err(PayrollError::InvalidBonus { .. })));
        assert!(!store.get_bonus(theirs.id).unwrap().unwrap().is_applied);
    }

    #[test]
    fn test_duplicate_bonus_rejected() {
        let store = MemoryStore::new();
        store.insert_bonus(bonus("emp_001", BonusType::Performance)).unwrap();

        let result = store.insert_bonus(bonus("emp_001", BonusType::Performance));
        assert!(matches!(result, Err(PayrollError::DuplicateBonus { .. })));

        assert!(store.insert_bonus(bonus("emp_001", BonusType::Holiday)).is_ok());
        assert!(store.insert_bonus(bonus("emp_002", BonusType::Performance)).is_ok());
    }

    #[test]
    fn test_delete_bonus() {
        let store = MemoryStore::new();
        let stored = store.insert_bonus(bonus("emp_001", BonusType::Performance)).unwrap();

        store.delete_bonus(stored.id).unwrap();

        assert!(store.get_bonus(stored.id).unwrap().is_none());
        assert_eq!(
            store.delete_bonus(stored.id),
            Err(PayrollError::BonusNotFound {
                bonus_id: stored.id
            })
        );
    }

    #[test]
    fn test_applied_bonus_cannot_be_deleted_or_updated() {
        let (store, run) = store_with_run();
        let stored = store.insert_bonus(bonus("emp_001", BonusType::Performance)).unwrap();
        store
            .commit_payslip(payslip(run.id, "emp_001", vec![stored.id]), 2025, Utc::now())
            .unwrap();

        assert_eq!(
            store.delete_bonus(stored.id),
            Err(PayrollError::BonusAlreadyApplied {
                bonus_id: stored.id
            })
        );

        let mut edited = stored.clone();
        edited.amount = Decimal::new(1, 0);
        assert!(matches!(
            store.update_bonus(edited),
            Err(PayrollError::BonusAlreadyApplied { .. })
        ));
        assert!(store.get_bonus(stored.id).unwrap().is_some());
    }

    #[test]
    fn test_ytd_for_business_lists_own_employees() {
        let (store, run) = store_with_run();
        let mut outsider = employee("emp_900");
        outsider.business_id = "globex".to_string();
        store.upsert_employee(outsider).unwrap();

        store
            .commit_payslip(payslip(run.id, "emp_002", vec![]), 2025, Utc::now())
            .unwrap();
        store
            .commit_payslip(payslip(run.id, "emp_001", vec![]), 2025, Utc::now())
            .unwrap();

        let records = store.load_ytd_for_business("acme", 2025).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["emp_001", "emp_002"]);
        assert!(store.load_ytd_for_business("acme", 2024).unwrap().is_empty());
    }
}
