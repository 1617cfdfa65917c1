//! Business model.
//!
//! A business owns its employees, payroll configuration, bonuses, runs and
//! reports. Registration is reviewed by an administrator before the business
//! may run payroll.

use serde::{Deserialize, Serialize};

/// Administrator review state of a registered business.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessStatus {
    /// Awaiting administrator review.
    #[default]
    Pending,
    /// Approved; payroll operations are allowed.
    Approved,
    /// Rejected by an administrator.
    Rejected,
}

/// A business using the payroll system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    /// Unique identifier for the business.
    pub id: String,
    /// Trading name.
    pub name: String,
    /// Company registration number, if any.
    #[serde(default)]
    pub registration_number: String,
    /// Approval status.
    #[serde(default)]
    pub status: BusinessStatus,
}

impl Business {
    /// Returns true once an administrator has approved the business.
    pub fn is_approved(&self) -> bool {
        self.status == BusinessStatus::Approved
    }

    /// Returns true if the business may perform payroll operations.
    pub fn can_operate(&self) -> bool {
        self.is_approved()
    }
}
