//! Payroll orchestration.
//!
//! [`PayrollService`] ties the calculation rules to the store: it validates
//! a run, creates the draft, computes and commits one payslip per employee
//! and settles the run's final status. It also owns bonus management and
//! the read-side reports.

mod service;

pub use service::{EmployeeSelection, PayrollService, RunPayrollRequest};
