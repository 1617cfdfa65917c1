//! NIS contribution calculation.
//!
//! NIS is charged at a flat rate on gross pay, capped at the monthly share
//! of the annual ceiling: `min(gross × nis_rate, nis_ceiling / 12)`.

use rust_decimal::Decimal;

use crate::config::PayrollConfiguration;
use crate::error::PayrollResult;
use crate::models::{AuditStep, AuditWarning};

use super::rounding::checked_mul;

/// The result of calculating the NIS contribution.
#[derive(Debug, Clone)]
pub struct NisContributionResult {
    /// Contribution due, unrounded.
    pub nis_deduction: Decimal,
    /// True when the ceiling reduced the contribution.
    pub ceiling_applied: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Set when the ceiling applied.
    pub warning: Option<AuditWarning>,
}

/// Calculates the capped NIS contribution on `gross_pay`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_nis_contribution;
/// use payroll_engine::config::PayrollConfiguration;
/// use rust_decimal::Decimal;
///
/// let config = PayrollConfiguration::default();
/// let result = calculate_nis_contribution(Decimal::new(110_000, 0), &config, 1).unwrap();
/// assert_eq!(result.nis_deduction, Decimal::new(3_300, 0));
/// assert!(!result.ceiling_applied);
/// ```
pub fn calculate_nis_contribution(
    gross_pay: Decimal,
    config: &PayrollConfiguration,
    step_number: u32,
) -> PayrollResult<NisContributionResult> {
    let uncapped = checked_mul("NIS contribution", gross_pay, config.nis_rate)?;
    let monthly_ceiling = config.monthly_nis_ceiling();

    let (nis_deduction, ceiling_applied) = if uncapped > monthly_ceiling {
        (monthly_ceiling, true)
    } else {
        (uncapped, false)
    };

    let reasoning = if ceiling_applied {
        format!(
            "${} × {} = ${} (capped at monthly ceiling ${})",
            gross_pay.round_dp(2).normalize(),
            config.nis_rate.normalize(),
            uncapped.round_dp(4).normalize(),
            monthly_ceiling.round_dp(2).normalize()
        )
    } else {
        format!(
            "${} × {} = ${}",
            gross_pay.round_dp(2).normalize(),
            config.nis_rate.normalize(),
            uncapped.round_dp(4).normalize()
        )
    };

    let warning = ceiling_applied.then(|| AuditWarning {
        code: "NIS_CEILING_REACHED".to_string(),
        message: format!(
            "NIS contribution capped at monthly ceiling ${}",
            monthly_ceiling.round_dp(2).normalize()
        ),
        severity: "low".to_string(),
    });

    let audit_step = AuditStep {
        step_number,
        rule_id: "nis_contribution".to_string(),
        rule_name: "NIS Contribution".to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.round_dp(4).normalize().to_string(),
            "rate": config.nis_rate.normalize().to_string(),
            "annual_ceiling": config.nis_ceiling.normalize().to_string()
        }),
        output: serde_json::json!({
            "uncapped": uncapped.round_dp(4).normalize().to_string(),
            "monthly_ceiling": monthly_ceiling.round_dp(4).normalize().to_string(),
            "ceiling_applied": ceiling_applied,
            "nis_deduction": nis_deduction.round_dp(4).normalize().to_string()
        }),
        reasoning,
    };

    Ok(NisContributionResult {
        nis_deduction,
        ceiling_applied,
        audit_step,
        warning,
    })
}
