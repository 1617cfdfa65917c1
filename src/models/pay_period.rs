//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type that bounds a payroll run.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// Represents a pay period with its inclusive date range.
///
/// The end date decides which month's bonuses are consumed and which
/// calendar year the resulting payslips accumulate into.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
/// )
/// .unwrap();
///
/// assert_eq!(period.bonus_month(), (1, 2025));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates a validated pay period.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> PayrollResult<Self> {
        let period = Self {
            start_date,
            end_date,
        };
        period.validate()?;
        Ok(period)
    }

    /// Fails with [`PayrollError::InvalidPeriod`] if the end precedes the start.
    pub fn validate(&self) -> PayrollResult<()> {
        if self.end_date < self.start_date {
            return Err(PayrollError::InvalidPeriod {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// The (month, year) whose bonuses this period pays out.
    pub fn bonus_month(&self) -> (u32, i32) {
        (self.end_date.month(), self.end_date.year())
    }

    /// The calendar year the period's payslips accumulate into.
    pub fn ytd_year(&self) -> i32 {
        self.end_date.year()
    }
}
