//! Currency rounding and checked arithmetic helpers.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{PayrollError, PayrollResult};

/// Decimal places kept on every stored monetary amount.
pub const CURRENCY_DP: u32 = 2;

/// Rounds a monetary amount half-up (midpoint away from zero) to cents.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("2.345").unwrap()), Decimal::from_str("2.35").unwrap());
/// assert_eq!(round_currency(Decimal::from_str("2.344").unwrap()), Decimal::from_str("2.34").unwrap());
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Multiplies two decimals, failing with a `CalculationError` naming `what`
/// on overflow.
pub fn checked_mul(what: &str, a: Decimal, b: Decimal) -> PayrollResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| PayrollError::calculation(format!("{} overflowed", what)))
}

/// Adds two decimals, failing with a `CalculationError` naming `what` on
/// overflow.
pub fn checked_add(what: &str, a: Decimal, b: Decimal) -> PayrollResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| PayrollError::calculation(format!("{} overflowed", what)))
}

/// Divides two decimals, failing on overflow or a zero divisor.
pub fn checked_div(what: &str, a: Decimal, b: Decimal) -> PayrollResult<Decimal> {
    a.checked_div(b)
        .ok_or_else(|| PayrollError::calculation(format!("{} could not be divided", what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_currency(dec("0.005")), dec("0.01"));
        assert_eq!(round_currency(dec("416666.666666")), dec("416666.67"));
        assert_eq!(round_currency(dec("100")), dec("100"));
    }

    #[test]
    fn test_round_negative_midpoint_away_from_zero() {
        assert_eq!(round_currency(dec("-0.125")), dec("-0.13"));
    }

    #[test]
    fn test_checked_mul_overflow_is_error() {
        let result = checked_mul("gross pay", Decimal::MAX, dec("2"));
        match result {
            Err(PayrollError::CalculationError { message }) => {
                assert_eq!(message, "gross pay overflowed");
            }
            other => panic!("Expected CalculationError, got {:?}", other),
        }
    }

    #[test]
    fn test_checked_add_overflow_is_error() {
        assert!(checked_add("total", Decimal::MAX, Decimal::ONE).is_err());
        assert_eq!(checked_add("total", dec("1.5"), dec("2.5")).unwrap(), dec("4.0"));
    }

    #[test]
    fn test_checked_div_by_zero_is_error() {
        assert!(checked_div("hourly rate", Decimal::ONE, Decimal::ZERO).is_err());
    }
}
