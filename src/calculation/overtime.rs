//! Overtime pay calculation.
//!
//! Salaried employees are paid overtime at an hourly rate derived from
//! their monthly salary: `salary × 12 / (standard_hours_per_week × 52)`,
//! multiplied by the business's overtime multiplier.

use rust_decimal::Decimal;

use crate::config::PayrollConfiguration;
use crate::error::{PayrollError, PayrollResult};
use crate::models::AuditStep;

use super::rounding::{checked_div, checked_mul};

/// Weeks per year used to derive the hourly rate.
pub const WEEKS_PER_YEAR: u32 = 52;

/// The result of calculating overtime pay.
#[derive(Debug, Clone)]
pub struct OvertimeResult {
    /// The ordinary hourly rate derived from salary.
    pub hourly_rate: Decimal,
    /// Overtime pay, unrounded.
    pub overtime_pay: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates overtime pay for `overtime_hours` worked in the period.
///
/// # Errors
///
/// Returns `InvalidEmployee` for negative hours and `CalculationError` on
/// overflow.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_overtime_pay;
/// use payroll_engine::config::PayrollConfiguration;
/// use rust_decimal::Decimal;
///
/// let config = PayrollConfiguration::default();
/// let result = calculate_overtime_pay(Decimal::new(104_000, 0), Decimal::new(10, 0), &config, 1).unwrap();
///
/// // 104,000 × 12 / 2,080 = 600 per hour; 10 hours at 1.5x
/// assert_eq!(result.hourly_rate, Decimal::new(600, 0));
/// assert_eq!(result.overtime_pay, Decimal::new(9_000, 0));
/// ```
pub fn calculate_overtime_pay(
    basic_salary: Decimal,
    overtime_hours: Decimal,
    config: &PayrollConfiguration,
    step_number: u32,
) -> PayrollResult<OvertimeResult> {
    if overtime_hours < Decimal::ZERO {
        return Err(PayrollError::InvalidEmployee {
            field: "overtime_hours".to_string(),
            message: format!("must not be negative, got {}", overtime_hours),
        });
    }

    let annual_salary = checked_mul("annual salary", basic_salary, Decimal::from(12))?;
    let annual_hours =
        Decimal::from(config.standard_hours_per_week) * Decimal::from(WEEKS_PER_YEAR);
    let hourly_rate = checked_div("hourly rate", annual_salary, annual_hours)?;

    let overtime_pay = if overtime_hours.is_zero() {
        Decimal::ZERO
    } else {
        let hours_pay = checked_mul("overtime pay", hourly_rate, overtime_hours)?;
        checked_mul("overtime pay", hours_pay, config.overtime_rate_multiplier)?
    };

    let reasoning = if overtime_hours.is_zero() {
        "No overtime hours worked".to_string()
    } else {
        format!(
            "{} hours × ${}/hr × {} = ${}",
            overtime_hours.normalize(),
            hourly_rate.round_dp(4).normalize(),
            config.overtime_rate_multiplier.normalize(),
            overtime_pay.round_dp(4).normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "overtime_pay".to_string(),
        rule_name: "Overtime Pay".to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.normalize().to_string(),
            "overtime_hours": overtime_hours.normalize().to_string(),
            "standard_hours_per_week": config.standard_hours_per_week,
            "multiplier": config.overtime_rate_multiplier.normalize().to_string()
        }),
        output: serde_json::json!({
            "hourly_rate": hourly_rate.round_dp(4).normalize().to_string(),
            "overtime_pay": overtime_pay.round_dp(4).normalize().to_string()
        }),
        reasoning,
    };

    Ok(OvertimeResult {
        hourly_rate,
        overtime_pay,
        audit_step,
    })
}
