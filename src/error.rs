//! Error types for the Payroll Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while configuring businesses,
//! managing bonuses and running payroll.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the Payroll Engine.
///
/// Run-level errors (configuration, input, duplicate period) abort a payroll
/// run before anything is written. Per-employee problems are reported as
/// [`PayrollError::PayslipComputationFailed`] inside the run result instead
/// of aborting the batch.
///
/// # Example
///
/// ```
/// use payroll_engine::error::PayrollError;
///
/// let error = PayrollError::ConfigurationMissing {
///     business_id: "acme".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Payroll configuration missing for business 'acme'"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayrollError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The business has not completed its payroll rate setup.
    #[error("Payroll configuration missing for business '{business_id}'")]
    ConfigurationMissing {
        /// The business without a configuration.
        business_id: String,
    },

    /// A configured rate or threshold is outside its allowed range.
    #[error("Invalid payroll configuration field '{field}': {message}")]
    InvalidConfiguration {
        /// The offending configuration field.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// The pay period ends before it starts.
    #[error("Invalid pay period: end date {end} is before start date {start}")]
    InvalidPeriod {
        /// The start of the requested period.
        start: NaiveDate,
        /// The end of the requested period.
        end: NaiveDate,
    },

    /// No active employee of the business remained in the selection.
    #[error("No eligible employees selected for business '{business_id}'")]
    NoEligibleEmployees {
        /// The business the run was requested for.
        business_id: String,
    },

    /// A payroll run already exists for the same business and bounds.
    #[error("A payroll run already exists for business '{business_id}' from {start} to {end}")]
    DuplicatePeriod {
        /// The business the run was requested for.
        business_id: String,
        /// The start of the requested period.
        start: NaiveDate,
        /// The end of the requested period.
        end: NaiveDate,
    },

    /// The business is unknown.
    #[error("Business not found: {business_id}")]
    BusinessNotFound {
        /// The business id that was not found.
        business_id: String,
    },

    /// The business has not been approved by an administrator.
    #[error("Business '{business_id}' is not approved for payroll operations")]
    BusinessNotApproved {
        /// The business id.
        business_id: String,
    },

    /// The employee is unknown.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The employee id that was not found.
        employee_id: String,
    },

    /// An employee record was invalid or contained inconsistent data.
    #[error("Invalid employee field '{field}': {message}")]
    InvalidEmployee {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The bonus is unknown.
    #[error("Bonus not found: {bonus_id}")]
    BonusNotFound {
        /// The bonus id that was not found.
        bonus_id: Uuid,
    },

    /// The bonus has already contributed to a payslip and is frozen.
    #[error("Bonus {bonus_id} has already been applied to a payroll run")]
    BonusAlreadyApplied {
        /// The applied bonus.
        bonus_id: Uuid,
    },

    /// A bonus of the same type already exists for the employee and month.
    #[error("A {bonus_type} bonus already exists for employee '{employee_id}' in {month}/{year}")]
    DuplicateBonus {
        /// The employee the bonus belongs to.
        employee_id: String,
        /// The bonus category.
        bonus_type: String,
        /// The bonus month.
        month: u32,
        /// The bonus year.
        year: i32,
    },

    /// A bonus record was invalid.
    #[error("Invalid bonus field '{field}': {message}")]
    InvalidBonus {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The payroll run is unknown.
    #[error("Payroll run not found: {run_id}")]
    RunNotFound {
        /// The run id that was not found.
        run_id: Uuid,
    },

    /// One employee's payslip could not be produced.
    #[error("Payslip computation failed for employee '{employee_id}': {message}")]
    PayslipComputationFailed {
        /// The employee whose payslip failed.
        employee_id: String,
        /// Why the payslip could not be produced.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl PayrollError {
    /// Builds a [`PayrollError::CalculationError`] from anything displayable.
    pub fn calculation(message: impl Into<String>) -> Self {
        Self::CalculationError {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;
