//! Payroll engine for small businesses
//!
//! This crate runs payroll for a business over a pay period, producing one
//! payslip per employee with statutory deductions (PAYE, NIS, NHT, HEART,
//! education tax), business deductions and bonuses, and keeps each
//! employee's year-to-date totals in step with the payslips issued.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod payroll;
pub mod store;
