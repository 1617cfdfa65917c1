//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from a business's YAML seed directory.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Business, Deduction, Employee};

/// How often the business pays its employees.
///
/// Salaries, thresholds and ceilings are pro-rated monthly, so
/// [`PayrollConfiguration::validate`] rejects the other frequencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// Every week.
    Weekly,
    /// Every two weeks.
    BiWeekly,
    /// Once a month.
    #[default]
    Monthly,
}

/// Statutory rates and thresholds used to compute payslips for a business.
///
/// Every field has a default, so a `payroll.yaml` only needs to list the
/// values that differ.
///
/// # Example
///
/// ```
/// use payroll_engine::config::PayrollConfiguration;
/// use rust_decimal::Decimal;
///
/// let config = PayrollConfiguration::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.paye_threshold, Decimal::new(1_500_000, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollConfiguration {
    /// Pay frequency.
    pub pay_frequency: PayFrequency,
    /// PAYE income tax rate.
    pub paye_rate: Decimal,
    /// NIS contribution rate.
    pub nis_rate: Decimal,
    /// NHT contribution rate.
    pub nht_rate: Decimal,
    /// HEART contribution rate.
    pub heart_rate: Decimal,
    /// Education tax rate.
    pub ed_rate: Decimal,
    /// Annual income below which no PAYE is due.
    pub paye_threshold: Decimal,
    /// Annual income above which no further NIS is due.
    pub nis_ceiling: Decimal,
    /// Company NIS registration number.
    pub company_nis_number: String,
    /// Company PAYE registration number.
    pub company_paye_number: String,
    /// Overtime pay multiplier.
    pub overtime_rate_multiplier: Decimal,
    /// Standard working hours per week.
    pub standard_hours_per_week: u32,
}

impl Default for PayrollConfiguration {
    fn default() -> Self {
        Self {
            pay_frequency: PayFrequency::Monthly,
            paye_rate: Decimal::new(25, 2),
            nis_rate: Decimal::new(3, 2),
            nht_rate: Decimal::new(2, 2),
            heart_rate: Decimal::new(3, 3),
            ed_rate: Decimal::new(25, 4),
            paye_threshold: Decimal::new(1_500_000, 0),
            nis_ceiling: Decimal::new(5_000_000, 0),
            company_nis_number: String::new(),
            company_paye_number: String::new(),
            overtime_rate_multiplier: Decimal::new(15, 1),
            standard_hours_per_week: 40,
        }
    }
}

fn check_rate(field: &str, value: Decimal) -> PayrollResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(PayrollError::InvalidConfiguration {
            field: field.to_string(),
            message: format!("rate must be a fraction in [0, 1], got {}", value),
        });
    }
    Ok(())
}

fn check_non_negative(field: &str, value: Decimal) -> PayrollResult<()> {
    if value < Decimal::ZERO {
        return Err(PayrollError::InvalidConfiguration {
            field: field.to_string(),
            message: format!("must not be negative, got {}", value),
        });
    }
    Ok(())
}

impl PayrollConfiguration {
    /// Checks every rate, threshold and multiplier is in range.
    pub fn validate(&self) -> PayrollResult<()> {
        check_rate("paye_rate", self.paye_rate)?;
        check_rate("nis_rate", self.nis_rate)?;
        check_rate("nht_rate", self.nht_rate)?;
        check_rate("heart_rate", self.heart_rate)?;
        check_rate("ed_rate", self.ed_rate)?;
        check_non_negative("paye_threshold", self.paye_threshold)?;
        check_non_negative("nis_ceiling", self.nis_ceiling)?;

        if self.pay_frequency != PayFrequency::Monthly {
            return Err(PayrollError::InvalidConfiguration {
                field: "pay_frequency".to_string(),
                message: format!(
                    "only monthly payroll is supported, got {:?}",
                    self.pay_frequency
                ),
            });
        }

        if self.overtime_rate_multiplier < Decimal::ONE {
            return Err(PayrollError::InvalidConfiguration {
                field: "overtime_rate_multiplier".to_string(),
                message: format!("must be at least 1, got {}", self.overtime_rate_multiplier),
            });
        }
        if self.standard_hours_per_week == 0 {
            return Err(PayrollError::InvalidConfiguration {
                field: "standard_hours_per_week".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// The PAYE threshold pro-rated to one month.
    pub fn monthly_paye_threshold(&self) -> Decimal {
        self.paye_threshold / Decimal::from(12)
    }

    /// The NIS ceiling pro-rated to one month.
    pub fn monthly_nis_ceiling(&self) -> Decimal {
        self.nis_ceiling / Decimal::from(12)
    }
}

/// `deductions.yaml` file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeductionsFile {
    /// Deductions configured for the business.
    #[serde(default)]
    pub deductions: Vec<Deduction>,
}

/// `employees.yaml` file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeesFile {
    /// Employees of the business.
    #[serde(default)]
    pub employees: Vec<Employee>,
}

/// Everything loaded from one business's seed directory.
#[derive(Debug, Clone)]
pub struct BusinessConfig {
    business: Business,
    payroll: Option<PayrollConfiguration>,
    deductions: Vec<Deduction>,
    employees: Vec<Employee>,
}

impl BusinessConfig {
    /// Creates a new BusinessConfig from its component parts.
    ///
    /// Employees are stamped with the business id and sorted by id.
    pub fn new(
        business: Business,
        payroll: Option<PayrollConfiguration>,
        deductions: Vec<Deduction>,
        employees: Vec<Employee>,
    ) -> Self {
        let mut employees: Vec<Employee> = employees
            .into_iter()
            .map(|mut e| {
                e.business_id = business.id.clone();
                e
            })
            .collect();
        employees.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            business,
            payroll,
            deductions,
            employees,
        }
    }

    /// Returns the business record.
    pub fn business(&self) -> &Business {
        &self.business
    }

    /// Returns the payroll configuration, if one was provided.
    pub fn payroll(&self) -> Option<&PayrollConfiguration> {
        self.payroll.as_ref()
    }

    /// Returns the configured deductions.
    pub fn deductions(&self) -> &[Deduction] {
        &self.deductions
    }

    /// Returns the seeded employees, ordered by id.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Validates the payroll configuration, deductions and employees.
    pub fn validate(&self) -> PayrollResult<()> {
        if let Some(payroll) = &self.payroll {
            payroll.validate()?;
        }
        for deduction in &self.deductions {
            deduction.validate()?;
        }
        for employee in &self.employees {
            employee.validate()?;
        }
        Ok(())
    }

    /// Splits the configuration into its parts.
    pub fn into_parts(
        self,
    ) -> (
        Business,
        Option<PayrollConfiguration>,
        Vec<Deduction>,
        Vec<Employee>,
    ) {
        (self.business, self.payroll, self.deductions, self.employees)
    }
}
