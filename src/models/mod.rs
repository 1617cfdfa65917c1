//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod bonus;
mod business;
mod deduction;
mod employee;
mod pay_period;
mod payroll_run;
mod payslip;
mod report;
mod ytd;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use bonus::{BonusType, EmployeeBonus, NewBonus};
pub use business::{Business, BusinessStatus};
pub use deduction::{Deduction, DeductionKind};
pub use employee::Employee;
pub use pay_period::PayPeriod;
pub use payroll_run::{EmployeeFailure, PayrollRun, PayrollRunResult, RunStatus};
pub use payslip::Payslip;
pub use report::{PayrollRunReport, PayrollSummary, YtdSummary, YtdSummaryLine};
pub use ytd::EmployeeYtd;
