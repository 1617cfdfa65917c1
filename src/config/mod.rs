//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load business seed configurations
//! from YAML files, including the business record, its statutory payroll
//! rates, business-level deductions and employees.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/acme").unwrap();
//! println!("Loaded business: {}", loader.business().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{BusinessConfig, DeductionsFile, EmployeesFile, PayFrequency, PayrollConfiguration};
