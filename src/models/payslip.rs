//! Payslip model.
//!
//! A payslip is the computed pay record for one employee in one payroll run.
//! Its derived totals are never taken from input: [`Payslip::recompute_totals`]
//! rebuilds them from the component fields every time a payslip is persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};

use super::AuditTrace;

/// The computed pay record for one employee in one payroll run.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{AuditTrace, Payslip};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let mut payslip = Payslip {
///     id: Uuid::new_v4(),
///     payroll_run_id: Uuid::new_v4(),
///     employee_id: "emp_001".to_string(),
///     basic_pay: Decimal::new(100_000, 0),
///     overtime_pay: Decimal::ZERO,
///     bonus: Decimal::new(10_000, 0),
///     paye_tax: Decimal::ZERO,
///     nis_deduction: Decimal::new(3_300, 0),
///     nht_deduction: Decimal::ZERO,
///     heart_deduction: Decimal::ZERO,
///     ed_deduction: Decimal::ZERO,
///     other_deductions: Decimal::ZERO,
///     gross_pay: Decimal::ZERO,
///     total_deductions: Decimal::ZERO,
///     net_pay: Decimal::ZERO,
///     applied_bonus_ids: vec![],
///     audit_trace: AuditTrace::default(),
///     generated_at: Utc::now(),
/// };
/// payslip.recompute_totals().unwrap();
/// assert_eq!(payslip.gross_pay, Decimal::new(110_000, 0));
/// assert_eq!(payslip.net_pay, Decimal::new(106_700, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// Unique identifier for this payslip.
    pub id: Uuid,
    /// The run that produced this payslip.
    pub payroll_run_id: Uuid,
    /// The employee paid.
    pub employee_id: String,
    /// Basic salary for the period.
    pub basic_pay: Decimal,
    /// Overtime earnings for the period.
    pub overtime_pay: Decimal,
    /// Sum of bonuses paid out in this payslip.
    pub bonus: Decimal,
    /// PAYE income tax withheld.
    pub paye_tax: Decimal,
    /// Capped NIS contribution.
    pub nis_deduction: Decimal,
    /// NHT contribution.
    pub nht_deduction: Decimal,
    /// HEART contribution.
    pub heart_deduction: Decimal,
    /// Education tax.
    pub ed_deduction: Decimal,
    /// Business-configured deductions.
    pub other_deductions: Decimal,
    /// `basic_pay + overtime_pay + bonus`.
    pub gross_pay: Decimal,
    /// Sum of every deduction field.
    pub total_deductions: Decimal,
    /// `gross_pay - total_deductions`.
    pub net_pay: Decimal,
    /// Bonuses consumed by this payslip.
    #[serde(default)]
    pub applied_bonus_ids: Vec<Uuid>,
    /// How each figure was reached.
    #[serde(default)]
    pub audit_trace: AuditTrace,
    /// When the payslip was generated.
    pub generated_at: DateTime<Utc>,
}

fn add(field: &str, a: Decimal, b: Decimal) -> PayrollResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| PayrollError::calculation(format!("payslip {} overflowed", field)))
}

impl Payslip {
    /// Sum of the individual deduction fields.
    pub fn deduction_sum(&self) -> PayrollResult<Decimal> {
        [
            self.nis_deduction,
            self.nht_deduction,
            self.heart_deduction,
            self.ed_deduction,
            self.other_deductions,
        ]
        .into_iter()
        .try_fold(self.paye_tax, |total, amount| {
            add("total_deductions", total, amount)
        })
    }

    /// Rebuilds `gross_pay`, `total_deductions` and `net_pay` from the
    /// component fields.
    ///
    /// Fails without touching the payslip if any total overflows.
    pub fn recompute_totals(&mut self) -> PayrollResult<()> {
        let gross_pay = add(
            "gross_pay",
            add("gross_pay", self.basic_pay, self.overtime_pay)?,
            self.bonus,
        )?;
        let total_deductions = self.deduction_sum()?;
        let net_pay = gross_pay
            .checked_sub(total_deductions)
            .ok_or_else(|| PayrollError::calculation("payslip net_pay overflowed"))?;

        self.gross_pay = gross_pay;
        self.total_deductions = total_deductions;
        self.net_pay = net_pay;
        Ok(())
    }
}
