//! Business-configured deductions.

use rust_decimal::Decimal;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{AuditStep, Deduction};

use super::rounding::checked_add;

/// The result of summing a business's deductions.
#[derive(Debug, Clone)]
pub struct OtherDeductionsResult {
    /// Sum of active deductions, unrounded.
    pub total: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Sums every active deduction against `gross_pay`.
///
/// Inactive deductions are skipped.
pub fn calculate_other_deductions(
    deductions: &[Deduction],
    gross_pay: Decimal,
    step_number: u32,
) -> PayrollResult<OtherDeductionsResult> {
    let mut total = Decimal::ZERO;
    let mut lines = Vec::new();

    for deduction in deductions.iter().filter(|d| d.is_active) {
        let amount = deduction.amount_for(gross_pay).ok_or_else(|| {
            PayrollError::calculation(format!("deduction '{}' overflowed", deduction.name))
        })?;
        total = checked_add("other deductions", total, amount)?;
        lines.push(serde_json::json!({
            "name": deduction.name,
            "kind": deduction.kind,
            "amount": amount.round_dp(4).normalize().to_string()
        }));
    }

    let reasoning = if lines.is_empty() {
        "No active business deductions".to_string()
    } else {
        format!(
            "{} active deduction(s) totalling ${}",
            lines.len(),
            total.round_dp(2).normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "other_deductions".to_string(),
        rule_name: "Business Deductions".to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.round_dp(4).normalize().to_string(),
            "configured": deductions.len()
        }),
        output: serde_json::json!({
            "deductions": lines,
            "total": total.round_dp(4).normalize().to_string()
        }),
        reasoning,
    };

    Ok(OtherDeductionsResult { total, audit_step })
}
