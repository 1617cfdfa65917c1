//! PAYE income tax calculation.
//!
//! Tax is charged at a flat rate on gross pay above the monthly share of the
//! annual threshold: `max(0, (gross − paye_threshold / 12) × paye_rate)`.

use rust_decimal::Decimal;

use crate::config::PayrollConfiguration;
use crate::error::PayrollResult;
use crate::models::AuditStep;

use super::rounding::checked_mul;

/// The result of calculating PAYE tax.
#[derive(Debug, Clone)]
pub struct PayeTaxResult {
    /// The monthly threshold used.
    pub monthly_threshold: Decimal,
    /// Gross pay above the threshold.
    pub taxable_income: Decimal,
    /// Tax due, unrounded.
    pub paye_tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates PAYE tax on `gross_pay`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_paye_tax;
/// use payroll_engine::config::PayrollConfiguration;
/// use rust_decimal::Decimal;
///
/// let config = PayrollConfiguration::default();
///
/// // Monthly threshold is 125,000; 110,000 is below it.
/// let result = calculate_paye_tax(Decimal::new(110_000, 0), &config, 1).unwrap();
/// assert_eq!(result.paye_tax, Decimal::ZERO);
///
/// // 25% of the 25,000 above the threshold.
/// let result = calculate_paye_tax(Decimal::new(150_000, 0), &config, 1).unwrap();
/// assert_eq!(result.paye_tax, Decimal::new(6_250, 0));
/// ```
pub fn calculate_paye_tax(
    gross_pay: Decimal,
    config: &PayrollConfiguration,
    step_number: u32,
) -> PayrollResult<PayeTaxResult> {
    let monthly_threshold = config.monthly_paye_threshold();
    let taxable_income = (gross_pay - monthly_threshold).max(Decimal::ZERO);
    let paye_tax = checked_mul("PAYE tax", taxable_income, config.paye_rate)?;

    let reasoning = if taxable_income.is_zero() {
        format!(
            "Gross ${} does not exceed monthly threshold ${} - no PAYE due",
            gross_pay.round_dp(2).normalize(),
            monthly_threshold.round_dp(2).normalize()
        )
    } else {
        format!(
            "(${} - ${}) × {} = ${}",
            gross_pay.round_dp(2).normalize(),
            monthly_threshold.round_dp(2).normalize(),
            config.paye_rate.normalize(),
            paye_tax.round_dp(4).normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "paye_tax".to_string(),
        rule_name: "PAYE Income Tax".to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.round_dp(4).normalize().to_string(),
            "annual_threshold": config.paye_threshold.normalize().to_string(),
            "rate": config.paye_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "monthly_threshold": monthly_threshold.round_dp(4).normalize().to_string(),
            "taxable_income": taxable_income.round_dp(4).normalize().to_string(),
            "paye_tax": paye_tax.round_dp(4).normalize().to_string()
        }),
        reasoning,
    };

    Ok(PayeTaxResult {
        monthly_threshold,
        taxable_income,
        paye_tax,
        audit_step,
    })
}
