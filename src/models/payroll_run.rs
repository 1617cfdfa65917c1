//! Payroll run model and the result returned by a run.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayPeriod;

/// Lifecycle state of a payroll run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Created, employees not yet processed.
    Draft,
    /// Every selected employee received a payslip.
    Completed,
    /// Some employees failed, at least one succeeded.
    PartiallyCompleted,
    /// No employee received a payslip.
    Failed,
}

impl RunStatus {
    /// The terminal status for a run with the given outcome counts.
    pub fn from_counts(succeeded: usize, failed: usize) -> Self {
        match (succeeded, failed) {
            (_, 0) => RunStatus::Completed,
            (0, _) => RunStatus::Failed,
            _ => RunStatus::PartiallyCompleted,
        }
    }

    /// Returns true once the run has left [`RunStatus::Draft`].
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Draft)
    }
}

/// One execution of payroll for a business over a pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier for the run.
    pub id: Uuid,
    /// The business being paid.
    pub business_id: String,
    /// The period covered.
    pub period: PayPeriod,
    /// The date the run is dated for.
    pub run_date: NaiveDate,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Current status.
    pub status: RunStatus,
    /// Payslips produced.
    pub succeeded: usize,
    /// Employees that failed.
    pub failed: usize,
    /// When the run was created.
    pub created_at: DateTime<Utc>,
    /// When the run reached a terminal status.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl PayrollRun {
    /// A new run in [`RunStatus::Draft`].
    pub fn draft(
        business_id: impl Into<String>,
        period: PayPeriod,
        run_date: NaiveDate,
        notes: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            business_id: business_id.into(),
            period,
            run_date,
            notes: notes.into(),
            status: RunStatus::Draft,
            succeeded: 0,
            failed: 0,
            created_at: now,
            completed_at: None,
        }
    }

    /// Moves the run to its terminal status.
    pub fn finish(&mut self, succeeded: usize, failed: usize, now: DateTime<Utc>) {
        self.status = RunStatus::from_counts(succeeded, failed);
        self.succeeded = succeeded;
        self.failed = failed;
        self.completed_at = Some(now);
    }

    /// Returns true if this run covers exactly `period` for `business_id`.
    pub fn covers(&self, business_id: &str, period: &PayPeriod) -> bool {
        self.business_id == business_id && self.period == *period
    }
}

/// Why one employee did not receive a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFailure {
    /// The employee that failed.
    pub employee_id: String,
    /// Human-readable reason.
    pub reason: String,
}

/// Outcome of a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRunResult {
    /// The run created.
    pub run_id: Uuid,
    /// Terminal status.
    pub status: RunStatus,
    /// Number of payslips produced.
    pub succeeded: usize,
    /// Number of employees that failed.
    pub failed: usize,
    /// Payslips produced, in processing order.
    pub payslip_ids: Vec<Uuid>,
    /// Employees that failed, in processing order.
    pub failures: Vec<EmployeeFailure>,
}
