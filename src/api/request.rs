//! Request types for the payroll API.
//!
//! This module defines the JSON request structures accepted by the
//! `/payroll-runs` and bonus endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{BonusType, NewBonus, PayPeriod};
use crate::payroll::{EmployeeSelection, RunPayrollRequest};

/// Request body for `POST /payroll-runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunPayrollBody {
    /// The business being paid.
    pub business_id: String,
    /// First day of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the pay period (inclusive).
    pub end_date: NaiveDate,
    /// Date the run is dated for; defaults to `end_date`.
    #[serde(default)]
    pub run_date: Option<NaiveDate>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// The employees to pay.
    #[serde(default)]
    pub employees: Vec<EmployeeSelectionBody>,
}

/// One employee picked in a run request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeSelectionBody {
    /// The employee to pay.
    pub employee_id: String,
    /// Overtime hours worked in the period.
    #[serde(default)]
    pub overtime_hours: Decimal,
}

/// Request body for creating or replacing a bonus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusBody {
    /// The bonus category.
    pub bonus_type: BonusType,
    /// The bonus amount.
    pub amount: Decimal,
    /// Month the bonus is payable (1-12).
    pub month: u32,
    /// Year the bonus is payable.
    pub year: i32,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Whether the bonus is reported as taxable.
    #[serde(default = "default_taxable")]
    pub is_taxable: bool,
}

fn default_taxable() -> bool {
    true
}

impl From<RunPayrollBody> for RunPayrollRequest {
    fn from(body: RunPayrollBody) -> Self {
        RunPayrollRequest {
            business_id: body.business_id,
            // Validated by the service so a reversed period reports InvalidPeriod.
            period: PayPeriod {
                start_date: body.start_date,
                end_date: body.end_date,
            },
            run_date: body.run_date,
            notes: body.notes,
            employees: body.employees.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<EmployeeSelectionBody> for EmployeeSelection {
    fn from(body: EmployeeSelectionBody) -> Self {
        EmployeeSelection {
            employee_id: body.employee_id,
            overtime_hours: body.overtime_hours,
        }
    }
}

impl From<BonusBody> for NewBonus {
    fn from(body: BonusBody) -> Self {
        NewBonus {
            bonus_type: body.bonus_type,
            amount: body.amount,
            month: body.month,
            year: body.year,
            description: body.description,
            is_taxable: body.is_taxable,
        }
    }
}
