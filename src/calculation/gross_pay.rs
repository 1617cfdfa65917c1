//! Gross pay calculation.

use rust_decimal::Decimal;

use crate::error::PayrollResult;
use crate::models::AuditStep;

use super::rounding::checked_add;

/// The result of calculating gross pay.
#[derive(Debug, Clone)]
pub struct GrossPayResult {
    /// `basic_pay + overtime_pay + bonus`, unrounded.
    pub gross_pay: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Sums basic salary, overtime pay and bonuses into gross pay.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_gross_pay;
/// use rust_decimal::Decimal;
///
/// let result = calculate_gross_pay(
///     Decimal::new(100_000, 0),
///     Decimal::ZERO,
///     Decimal::new(10_000, 0),
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.gross_pay, Decimal::new(110_000, 0));
/// ```
pub fn calculate_gross_pay(
    basic_pay: Decimal,
    overtime_pay: Decimal,
    bonus: Decimal,
    step_number: u32,
) -> PayrollResult<GrossPayResult> {
    let gross_pay = checked_add(
        "gross pay",
        checked_add("gross pay", basic_pay, overtime_pay)?,
        bonus,
    )?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "gross_pay".to_string(),
        rule_name: "Gross Pay".to_string(),
        input: serde_json::json!({
            "basic_pay": basic_pay.normalize().to_string(),
            "overtime_pay": overtime_pay.round_dp(4).normalize().to_string(),
            "bonus": bonus.normalize().to_string()
        }),
        output: serde_json::json!({
            "gross_pay": gross_pay.round_dp(4).normalize().to_string()
        }),
        reasoning: format!(
            "${} basic + ${} overtime + ${} bonus = ${}",
            basic_pay.normalize(),
            overtime_pay.round_dp(2).normalize(),
            bonus.normalize(),
            gross_pay.round_dp(2).normalize()
        ),
    };

    Ok(GrossPayResult {
        gross_pay,
        audit_step,
    })
}
