//! Employee model.
//!
//! This module defines the Employee struct used as input to payroll runs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

fn default_active() -> bool {
    true
}

/// Represents an employee of a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The business the employee works for. Filled in from the seed
    /// directory when omitted.
    #[serde(default)]
    pub business_id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Job title.
    #[serde(default)]
    pub job_title: String,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// The date the employee was hired.
    pub date_of_hire: NaiveDate,
    /// Inactive employees are skipped by payroll runs.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Employee {
    /// Returns the employee's display name.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Employee;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     business_id: "acme".to_string(),
    ///     first_name: "Ada".to_string(),
    ///     last_name: "Brown".to_string(),
    ///     job_title: "Accountant".to_string(),
    ///     basic_salary: Decimal::new(100_000, 0),
    ///     date_of_hire: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
    ///     is_active: true,
    /// };
    /// assert_eq!(employee.full_name(), "Ada Brown");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Checks the fields a payslip depends on.
    pub fn validate(&self) -> PayrollResult<()> {
        if self.id.trim().is_empty() {
            return Err(PayrollError::InvalidEmployee {
                field: "id".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.basic_salary < Decimal::ZERO {
            return Err(PayrollError::InvalidEmployee {
                field: "basic_salary".to_string(),
                message: format!("must not be negative, got {}", self.basic_salary),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_employee(basic_salary: Decimal) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            business_id: "acme".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Brown".to_string(),
            job_title: "Accountant".to_string(),
            basic_salary,
            date_of_hire: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            is_active: true,
        }
    }

    #[test]
    fn test_deserialize_employee_defaults_to_active() {
        let json = r#"{
            "id": "emp_001",
            "business_id": "acme",
            "first_name": "Ada",
            "last_name": "Brown",
            "basic_salary": "100000.00",
            "date_of_hire": "2023-06-01"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert!(employee.is_active);
        assert_eq!(employee.basic_salary, Decimal::new(10_000_000, 2));
        assert!(employee.job_title.is_empty());
    }

    #[test]
    fn test_validate_accepts_zero_salary() {
        assert!(create_test_employee(Decimal::ZERO).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_salary() {
        let result = create_test_employee(Decimal::new(-500, 0)).validate();
        match result {
            Err(PayrollError::InvalidEmployee { field, .. }) => assert_eq!(field, "basic_salary"),
            other => panic!("Expected InvalidEmployee, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_blank_id() {
        let mut employee = create_test_employee(Decimal::ONE);
        employee.id = "  ".to_string();
        assert!(matches!(
            employee.validate(),
            Err(PayrollError::InvalidEmployee { field, .. }) if field == "id"
        ));
    }

    #[test]
    fn test_full_name() {
        assert_eq!(create_test_employee(Decimal::ONE).full_name(), "Ada Brown");
    }
}
