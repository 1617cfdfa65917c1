//! Employee bonus model.
//!
//! Bonuses are recorded against a month and year and paid out by the first
//! payroll run whose period ends in that month. Once paid they are frozen.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};

/// Category of a bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusType {
    /// Performance bonus.
    Performance,
    /// Holiday bonus.
    Holiday,
    /// Attendance bonus.
    Attendance,
    /// Sales bonus.
    Sales,
    /// Special recognition.
    Special,
    /// Anything else.
    Other,
}

impl BonusType {
    /// Returns the snake_case name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            BonusType::Performance => "performance",
            BonusType::Holiday => "holiday",
            BonusType::Attendance => "attendance",
            BonusType::Sales => "sales",
            BonusType::Special => "special",
            BonusType::Other => "other",
        }
    }
}

fn default_taxable() -> bool {
    true
}

/// A bonus awarded to one employee for a given month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeBonus {
    /// Unique identifier for the bonus.
    pub id: Uuid,
    /// The employee receiving the bonus.
    pub employee_id: String,
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
    /// Recorded for reporting; PAYE is charged on the whole gross either way.
    #[serde(default = "default_taxable")]
    pub is_taxable: bool,
    /// Set once the bonus has contributed to a payslip.
    #[serde(default)]
    pub is_applied: bool,
    /// When the bonus was applied.
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
    /// When the bonus was recorded.
    pub created_at: DateTime<Utc>,
}

impl EmployeeBonus {
    /// Returns true if the bonus is unapplied and payable in `month`/`year`.
    pub fn is_payable_in(&self, month: u32, year: i32) -> bool {
        !self.is_applied && self.month == month && self.year == year
    }

    /// Fails with [`PayrollError::BonusAlreadyApplied`] once the bonus is frozen.
    pub fn ensure_mutable(&self) -> PayrollResult<()> {
        if self.is_applied {
            return Err(PayrollError::BonusAlreadyApplied { bonus_id: self.id });
        }
        Ok(())
    }

    /// Marks the bonus as paid out. Irreversible.
    pub fn mark_applied(&mut self, at: DateTime<Utc>) {
        self.is_applied = true;
        self.applied_at = Some(at);
    }
}

/// Input for recording a new bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBonus {
    /// The bonus category.
    pub bonus_type: BonusType,
    /// The bonus amount; must be positive.
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

impl NewBonus {
    /// Validates the amount and month.
    pub fn validate(&self) -> PayrollResult<()> {
        if self.amount <= Decimal::ZERO {
            return Err(PayrollError::InvalidBonus {
                field: "amount".to_string(),
                message: format!("must be greater than zero, got {}", self.amount),
            });
        }
        if !(1..=12).contains(&self.month) {
            return Err(PayrollError::InvalidBonus {
                field: "month".to_string(),
                message: format!("must be between 1 and 12, got {}", self.month),
            });
        }
        Ok(())
    }

    /// Builds the stored bonus record for `employee_id`.
    pub fn into_bonus(self, employee_id: impl Into<String>, now: DateTime<Utc>) -> EmployeeBonus {
        EmployeeBonus {
            id: Uuid::new_v4(),
            employee_id: employee_id.into(),
            bonus_type: self.bonus_type,
            amount: self.amount,
            month: self.month,
            year: self.year,
            description: self.description,
            is_taxable: self.is_taxable,
            is_applied: false,
            applied_at: None,
            created_at: now,
        }
    }
}
