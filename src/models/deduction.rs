//! Business-level deductions applied on top of the statutory ones.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// How a deduction amount is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    /// A fixed currency amount per payslip.
    Fixed,
    /// A fraction of gross pay (e.g. 0.05 for 5%).
    Percentage,
}

fn default_active() -> bool {
    true
}

/// A deduction configured by a business, such as a union due or a loan
/// repayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    /// Name of the deduction; unique within a business.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Fixed amount or fraction of gross pay.
    pub kind: DeductionKind,
    /// The amount or fraction.
    pub amount: Decimal,
    /// Whether employees may opt out.
    #[serde(default)]
    pub is_mandatory: bool,
    /// Inactive deductions are ignored.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Deduction {
    /// Checks the amount is non-negative and percentages are fractions.
    pub fn validate(&self) -> PayrollResult<()> {
        if self.amount < Decimal::ZERO {
            return Err(PayrollError::InvalidConfiguration {
                field: format!("deductions.{}.amount", self.name),
                message: format!("must not be negative, got {}", self.amount),
            });
        }
        if self.kind == DeductionKind::Percentage && self.amount > Decimal::ONE {
            return Err(PayrollError::InvalidConfiguration {
                field: format!("deductions.{}.amount", self.name),
                message: format!("percentage must be a fraction in [0, 1], got {}", self.amount),
            });
        }
        Ok(())
    }

    /// The amount this deduction takes from `gross_pay`, unrounded.
    ///
    /// Returns `None` on arithmetic overflow.
    pub fn amount_for(&self, gross_pay: Decimal) -> Option<Decimal> {
        match self.kind {
            DeductionKind::Fixed => Some(self.amount),
            DeductionKind::Percentage => gross_pay.checked_mul(self.amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn deduction(kind: DeductionKind, amount: &str) -> Deduction {
        Deduction {
            name: "union_dues".to_string(),
            description: String::new(),
            kind,
            amount: dec(amount),
            is_mandatory: false,
            is_active: true,
        }
    }

    #[test]
    fn test_fixed_amount_ignores_gross() {
        let d = deduction(DeductionKind::Fixed, "1500");
        assert_eq!(d.amount_for(dec("100000")), Some(dec("1500")));
    }

    #[test]
    fn test_percentage_of_gross() {
        let d = deduction(DeductionKind::Percentage, "0.05");
        assert_eq!(d.amount_for(dec("110000")), Some(dec("5500")));
    }

    #[test]
    fn test_validate_rejects_percentage_above_one() {
        assert!(matches!(
            deduction(DeductionKind::Percentage, "1.5").validate(),
            Err(PayrollError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        assert!(deduction(DeductionKind::Fixed, "-1").validate().is_err());
        assert!(deduction(DeductionKind::Fixed, "25000").validate().is_ok());
    }

    #[test]
    fn test_deserialize_defaults_active() {
        let yaml = "name: loan\nkind: fixed\namount: \"2000\"\n";
        let d: Deduction = serde_yaml::from_str(yaml).unwrap();
        assert!(d.is_active);
        assert!(!d.is_mandatory);
        assert_eq!(d.kind, DeductionKind::Fixed);
    }
}
