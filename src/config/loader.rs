//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading business
//! seed configurations from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{PayrollError, PayrollResult};
use crate::models::Business;

use super::types::{BusinessConfig, DeductionsFile, EmployeesFile, PayrollConfiguration};

/// Loads and provides access to one business's configuration.
///
/// # Directory Structure
///
/// Each business has its own directory under the configuration root:
/// ```text
/// config/acme/
/// ├── business.yaml    # Business record (required)
/// ├── payroll.yaml     # Statutory rates and thresholds
/// ├── deductions.yaml  # Business-level deductions
/// └── employees.yaml   # Employees
/// ```
///
/// Only `business.yaml` is required. A business without `payroll.yaml` has
/// no payroll configuration, and payroll runs for it are refused.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/acme")?;
/// println!("Loaded business: {}", loader.business().name);
/// # Ok::<(), payroll_engine::error::PayrollError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: BusinessConfig,
}

impl ConfigLoader {
    /// Loads and validates configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `business.yaml` is missing
    /// - Any present file contains invalid YAML
    /// - Any rate, deduction or employee fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();

        let business = Self::load_yaml::<Business>(&path.join("business.yaml"))?;
        let payroll = Self::load_optional::<PayrollConfiguration>(&path.join("payroll.yaml"))?;
        let deductions = Self::load_optional::<DeductionsFile>(&path.join("deductions.yaml"))?
            .unwrap_or_default()
            .deductions;
        let employees = Self::load_optional::<EmployeesFile>(&path.join("employees.yaml"))?
            .unwrap_or_default()
            .employees;

        let config = BusinessConfig::new(business, payroll, deductions, employees);
        config.validate()?;

        debug!(
            business_id = %config.business().id,
            employees = config.employees().len(),
            deductions = config.deductions().len(),
            "Loaded business configuration"
        );

        Ok(Self { config })
    }

    /// Loads every business directory under `root`, ordered by directory name.
    pub fn load_all<P: AsRef<Path>>(root: P) -> PayrollResult<Vec<Self>> {
        let root = root.as_ref();
        let root_str = root.display().to_string();

        let entries = fs::read_dir(root).map_err(|_| PayrollError::ConfigNotFound {
            path: root_str.clone(),
        })?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| PayrollError::ConfigNotFound {
                path: root_str.clone(),
            })?;
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        dirs.sort();

        if dirs.is_empty() {
            return Err(PayrollError::ConfigNotFound {
                path: format!("{} (no business directories found)", root_str),
            });
        }

        dirs.iter().map(Self::load).collect()
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PayrollResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PayrollError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads a YAML file if it exists.
    fn load_optional<T: serde::de::DeserializeOwned>(path: &Path) -> PayrollResult<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load_yaml(path).map(Some)
    }

    /// Returns the underlying business configuration.
    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    /// Returns the business record.
    pub fn business(&self) -> &Business {
        self.config.business()
    }

    /// Gets the payroll configuration.
    ///
    /// Fails with `ConfigurationMissing` if the directory had no `payroll.yaml`.
    pub fn payroll(&self) -> PayrollResult<&PayrollConfiguration> {
        self.config
            .payroll()
            .ok_or_else(|| PayrollError::ConfigurationMissing {
                business_id: self.config.business().id.clone(),
            })
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> BusinessConfig {
        self.config
    }
}
