//! Year-to-date accumulator model.
//!
//! An [`EmployeeYtd`] is a materialized aggregate: each field equals the sum
//! of the matching field across every payslip issued to the employee within
//! the calendar year. It is only ever advanced by [`EmployeeYtd::accumulate`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

use super::Payslip;

/// Running totals for one employee in one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeYtd {
    /// The employee the totals belong to.
    pub employee_id: String,
    /// The calendar year.
    pub year: i32,
    /// Number of payslips folded in.
    pub payslip_count: u32,
    /// YTD basic pay.
    pub basic_pay: Decimal,
    /// YTD overtime pay.
    pub overtime_pay: Decimal,
    /// YTD bonuses.
    pub bonus: Decimal,
    /// YTD gross pay.
    pub gross_pay: Decimal,
    /// YTD PAYE tax.
    pub paye_tax: Decimal,
    /// YTD NIS contributions.
    pub nis_deduction: Decimal,
    /// YTD NHT contributions.
    pub nht_deduction: Decimal,
    /// YTD HEART contributions.
    pub heart_deduction: Decimal,
    /// YTD education tax.
    pub ed_deduction: Decimal,
    /// YTD business-configured deductions.
    pub other_deductions: Decimal,
    /// YTD total deductions.
    pub total_deductions: Decimal,
    /// YTD net pay.
    pub net_pay: Decimal,
    /// When the record last changed.
    pub last_updated: DateTime<Utc>,
}

fn add(field: &str, total: Decimal, amount: Decimal) -> PayrollResult<Decimal> {
    total
        .checked_add(amount)
        .ok_or_else(|| PayrollError::calculation(format!("YTD {} overflowed", field)))
}

impl EmployeeYtd {
    /// A record with every accumulator at zero.
    pub fn zeroed(employee_id: impl Into<String>, year: i32, now: DateTime<Utc>) -> Self {
        Self {
            employee_id: employee_id.into(),
            year,
            payslip_count: 0,
            basic_pay: Decimal::ZERO,
            overtime_pay: Decimal::ZERO,
            bonus: Decimal::ZERO,
            gross_pay: Decimal::ZERO,
            paye_tax: Decimal::ZERO,
            nis_deduction: Decimal::ZERO,
            nht_deduction: Decimal::ZERO,
            heart_deduction: Decimal::ZERO,
            ed_deduction: Decimal::ZERO,
            other_deductions: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            net_pay: Decimal::ZERO,
            last_updated: now,
        }
    }

    /// Returns a copy of this record with `payslip` folded in.
    ///
    /// `self` is left untouched so the caller can commit the new record
    /// atomically with the payslip, or drop it on failure.
    pub fn accumulate(&self, payslip: &Payslip, now: DateTime<Utc>) -> PayrollResult<Self> {
        if payslip.employee_id != self.employee_id {
            return Err(PayrollError::calculation(format!(
                "payslip for '{}' cannot accumulate into YTD of '{}'",
                payslip.employee_id, self.employee_id
            )));
        }

        Ok(Self {
            employee_id: self.employee_id.clone(),
            year: self.year,
            payslip_count: self.payslip_count + 1,
            basic_pay: add("basic_pay", self.basic_pay, payslip.basic_pay)?,
            overtime_pay: add("overtime_pay", self.overtime_pay, payslip.overtime_pay)?,
            bonus: add("bonus", self.bonus, payslip.bonus)?,
            gross_pay: add("gross_pay", self.gross_pay, payslip.gross_pay)?,
            paye_tax: add("paye_tax", self.paye_tax, payslip.paye_tax)?,
            nis_deduction: add("nis_deduction", self.nis_deduction, payslip.nis_deduction)?,
            nht_deduction: add("nht_deduction", self.nht_deduction, payslip.nht_deduction)?,
            heart_deduction: add("heart_deduction", self.heart_deduction, payslip.heart_deduction)?,
            ed_deduction: add("ed_deduction", self.ed_deduction, payslip.ed_deduction)?,
            other_deductions: add(
                "other_deductions",
                self.other_deductions,
                payslip.other_deductions,
            )?,
            total_deductions: add(
                "total_deductions",
                self.total_deductions,
                payslip.total_deductions,
            )?,
            net_pay: add("net_pay", self.net_pay, payslip.net_pay)?,
            last_updated: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuditTrace;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn payslip(employee_id: &str, basic: &str, bonus: &str, nis: &str) -> Payslip {
        let mut payslip = Payslip {
            id: Uuid::new_v4(),
            payroll_run_id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            basic_pay: dec(basic),
            overtime_pay: Decimal::ZERO,
            bonus: dec(bonus),
            paye_tax: Decimal::ZERO,
            nis_deduction: dec(nis),
            nht_deduction: Decimal::ZERO,
            heart_deduction: Decimal::ZERO,
            ed_deduction: Decimal::ZERO,
            other_deductions: Decimal::ZERO,
            gross_pay: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            net_pay: Decimal::ZERO,
            applied_bonus_ids: vec![],
            audit_trace: AuditTrace::default(),
            generated_at: Utc::now(),
        };
        payslip.recompute_totals().unwrap();
        payslip
    }

    #[test]
    fn test_zeroed_record_has_no_payslips() {
        let ytd = EmployeeYtd::zeroed("emp_001", 2025, Utc::now());
        assert_eq!(ytd.payslip_count, 0);
        assert_eq!(ytd.gross_pay, Decimal::ZERO);
        assert_eq!(ytd.net_pay, Decimal::ZERO);
    }

    #[test]
    fn test_accumulate_sums_every_field() {
        let ytd = EmployeeYtd::zeroed("emp_001", 2025, Utc::now());
        let january = payslip("emp_001", "100000", "10000", "3300");
        let february = payslip("emp_001", "100000", "0", "3000");

        let ytd = ytd.accumulate(&january, Utc::now()).unwrap();
        let ytd = ytd.accumulate(&february, Utc::now()).unwrap();

        assert_eq!(ytd.payslip_count, 2);
        assert_eq!(ytd.basic_pay, dec("200000"));
        assert_eq!(ytd.bonus, dec("10000"));
        assert_eq!(ytd.gross_pay, dec("210000"));
        assert_eq!(ytd.nis_deduction, dec("6300"));
        assert_eq!(ytd.total_deductions, dec("6300"));
        assert_eq!(ytd.net_pay, dec("203700"));
    }

    #[test]
    fn test_accumulate_leaves_original_untouched() {
        let ytd = EmployeeYtd::zeroed("emp_001", 2025, Utc::now());
        let _ = ytd
            .accumulate(&payslip("emp_001", "500", "0", "0"), Utc::now())
            .unwrap();
        assert_eq!(ytd.gross_pay, Decimal::ZERO);
    }

    #[test]
    fn test_accumulate_rejects_other_employee() {
        let ytd = EmployeeYtd::zeroed("emp_001", 2025, Utc::now());
        let result = ytd.accumulate(&payslip("emp_002", "500", "0", "0"), Utc::now());
        assert!(matches!(result, Err(PayrollError::CalculationError { .. })));
    }
}
