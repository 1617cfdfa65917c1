//! Bonus totalling for a pay period.
//!
//! This module sums the bonuses an employee is owed for the month in which
//! the pay period ends.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{AuditStep, EmployeeBonus};

use super::rounding::checked_add;

/// The result of totalling an employee's bonuses.
#[derive(Debug, Clone)]
pub struct BonusTotalResult {
    /// Sum of the payable bonuses.
    pub total: Decimal,
    /// The bonuses included in `total`, in the order given.
    pub bonus_ids: Vec<Uuid>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Sums the unapplied bonuses payable in `month`/`year`.
///
/// Already-applied bonuses and bonuses for other months are ignored, so a
/// bonus can never be paid twice.
///
/// # Errors
///
/// Returns `InvalidBonus` if a payable bonus has a non-positive amount, or
/// `CalculationError` if the sum overflows.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_bonus_total;
/// use payroll_engine::models::{BonusType, NewBonus};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
///
/// let bonus = NewBonus {
///     bonus_type: BonusType::Performance,
///     amount: Decimal::new(10_000, 0),
///     month: 1,
///     year: 2025,
///     description: String::new(),
///     is_taxable: true,
/// }
/// .into_bonus("emp_001", Utc::now());
///
/// let result = calculate_bonus_total(&[bonus], 1, 2025, 1).unwrap();
/// assert_eq!(result.total, Decimal::new(10_000, 0));
/// assert_eq!(result.bonus_ids.len(), 1);
/// ```
pub fn calculate_bonus_total(
    bonuses: &[EmployeeBonus],
    month: u32,
    year: i32,
    step_number: u32,
) -> PayrollResult<BonusTotalResult> {
    let mut total = Decimal::ZERO;
    let mut bonus_ids = Vec::new();
    let mut lines = Vec::new();

    for bonus in bonuses.iter().filter(|b| b.is_payable_in(month, year)) {
        if bonus.amount <= Decimal::ZERO {
            return Err(PayrollError::InvalidBonus {
                field: "amount".to_string(),
                message: format!(
                    "bonus {} has non-positive amount {}",
                    bonus.id, bonus.amount
                ),
            });
        }
        total = checked_add("bonus total", total, bonus.amount)?;
        bonus_ids.push(bonus.id);
        lines.push(serde_json::json!({
            "bonus_id": bonus.id,
            "bonus_type": bonus.bonus_type.as_str(),
            "amount": bonus.amount.normalize().to_string()
        }));
    }

    let reasoning = if bonus_ids.is_empty() {
        format!("No unapplied bonuses for {}/{}", month, year)
    } else {
        format!(
            "{} unapplied bonus(es) for {}/{} totalling ${}",
            bonus_ids.len(),
            month,
            year,
            total.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "bonus_total".to_string(),
        rule_name: "Bonus Total".to_string(),
        input: serde_json::json!({
            "month": month,
            "year": year,
            "candidates": bonuses.len()
        }),
        output: serde_json::json!({
            "bonuses": lines,
            "bonus_total": total.normalize().to_string()
        }),
        reasoning,
    };

    Ok(BonusTotalResult {
        total,
        bonus_ids,
        audit_step,
    })
}
