//! Flat-rate statutory contributions (NHT, HEART and Education tax).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PayrollConfiguration;
use crate::error::PayrollResult;
use crate::models::AuditStep;

use super::rounding::checked_mul;

/// A statutory contribution charged as a flat fraction of gross pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlatRateContribution {
    /// National Housing Trust.
    Nht,
    /// HEART Trust.
    Heart,
    /// Education tax.
    Education,
}

impl FlatRateContribution {
    /// All flat-rate contributions, in payslip order.
    pub const ALL: [FlatRateContribution; 3] = [
        FlatRateContribution::Nht,
        FlatRateContribution::Heart,
        FlatRateContribution::Education,
    ];

    /// The configured rate for this contribution.
    pub fn rate(&self, config: &PayrollConfiguration) -> Decimal {
        match self {
            FlatRateContribution::Nht => config.nht_rate,
            FlatRateContribution::Heart => config.heart_rate,
            FlatRateContribution::Education => config.ed_rate,
        }
    }

    fn rule_id(&self) -> &'static str {
        match self {
            FlatRateContribution::Nht => "nht_contribution",
            FlatRateContribution::Heart => "heart_contribution",
            FlatRateContribution::Education => "education_tax",
        }
    }

    fn rule_name(&self) -> &'static str {
        match self {
            FlatRateContribution::Nht => "NHT Contribution",
            FlatRateContribution::Heart => "HEART Contribution",
            FlatRateContribution::Education => "Education Tax",
        }
    }
}

/// The result of calculating one flat-rate contribution.
#[derive(Debug, Clone)]
pub struct FlatRateResult {
    /// Which contribution was calculated.
    pub contribution: FlatRateContribution,
    /// Amount due, unrounded.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates `gross_pay × rate` for one flat-rate contribution.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{FlatRateContribution, calculate_flat_rate};
/// use payroll_engine::config::PayrollConfiguration;
/// use rust_decimal::Decimal;
///
/// let config = PayrollConfiguration::default();
/// let result = calculate_flat_rate(FlatRateContribution::Nht, Decimal::new(100_000, 0), &config, 1).unwrap();
/// assert_eq!(result.amount, Decimal::new(2_000, 0));
/// ```
pub fn calculate_flat_rate(
    contribution: FlatRateContribution,
    gross_pay: Decimal,
    config: &PayrollConfiguration,
    step_number: u32,
) -> PayrollResult<FlatRateResult> {
    let rate = contribution.rate(config);
    let amount = checked_mul(contribution.rule_name(), gross_pay, rate)?;

    let audit_step = AuditStep {
        step_number,
        rule_id: contribution.rule_id().to_string(),
        rule_name: contribution.rule_name().to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.round_dp(4).normalize().to_string(),
            "rate": rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "amount": amount.round_dp(4).normalize().to_string()
        }),
        reasoning: format!(
            "${} × {} = ${}",
            gross_pay.round_dp(2).normalize(),
            rate.normalize(),
            amount.round_dp(4).normalize()
        ),
    };

    Ok(FlatRateResult {
        contribution,
        amount,
        audit_step,
    })
}
