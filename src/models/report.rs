//! Read-side report models built from stored payslips and YTD records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

use super::{EmployeeYtd, PayrollRun, Payslip};

fn add(field: &str, total: Decimal, amount: Decimal) -> PayrollResult<Decimal> {
    total
        .checked_add(amount)
        .ok_or_else(|| PayrollError::calculation(format!("summary {} overflowed", field)))
}

/// Totals across the payslips of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSummary {
    /// Number of payslips.
    pub payslip_count: usize,
    /// Sum of gross pay.
    pub total_gross_pay: Decimal,
    /// Sum of total deductions.
    pub total_deductions: Decimal,
    /// Sum of net pay.
    pub total_net_pay: Decimal,
}

impl PayrollSummary {
    /// Sums the given payslips.
    pub fn from_payslips<'a>(
        payslips: impl IntoIterator<Item = &'a Payslip>,
    ) -> PayrollResult<Self> {
        payslips
            .into_iter()
            .try_fold(Self::default(), |summary, payslip| {
                Ok(Self {
                    payslip_count: summary.payslip_count + 1,
                    total_gross_pay: add("gross_pay", summary.total_gross_pay, payslip.gross_pay)?,
                    total_deductions: add(
                        "total_deductions",
                        summary.total_deductions,
                        payslip.total_deductions,
                    )?,
                    total_net_pay: add("net_pay", summary.total_net_pay, payslip.net_pay)?,
                })
            })
    }
}

/// A run together with its payslips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRunReport {
    /// The run.
    pub run: PayrollRun,
    /// Payslips ordered by employee id.
    pub payslips: Vec<Payslip>,
    /// Totals over `payslips`.
    pub summary: PayrollSummary,
}

/// One employee's line in a [`YtdSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtdSummaryLine {
    /// The employee.
    pub employee_id: String,
    /// Display name.
    pub name: String,
    /// YTD gross pay.
    pub gross_pay: Decimal,
    /// YTD total deductions.
    pub deductions: Decimal,
    /// YTD net pay.
    pub net_pay: Decimal,
}

/// Year-to-date totals for every employee of a business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtdSummary {
    /// The business reported on.
    pub business_id: String,
    /// The calendar year.
    pub year: i32,
    /// Employees with a YTD record for the year.
    pub total_employees: usize,
    /// Sum of YTD gross pay.
    pub total_gross_pay: Decimal,
    /// Sum of YTD total deductions.
    pub total_deductions: Decimal,
    /// Sum of YTD net pay.
    pub total_net_pay: Decimal,
    /// Per-employee lines ordered by employee id.
    pub employees: Vec<YtdSummaryLine>,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
}

impl YtdSummary {
    /// Builds the summary from `(display name, record)` pairs.
    pub fn build(
        business_id: impl Into<String>,
        year: i32,
        records: Vec<(String, EmployeeYtd)>,
        now: DateTime<Utc>,
    ) -> PayrollResult<Self> {
        let mut summary = Self {
            business_id: business_id.into(),
            year,
            total_employees: records.len(),
            total_gross_pay: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            total_net_pay: Decimal::ZERO,
            employees: Vec::with_capacity(records.len()),
            generated_at: now,
        };

        for (name, record) in records {
            summary.total_gross_pay = add("gross_pay", summary.total_gross_pay, record.gross_pay)?;
            summary.total_deductions = add(
                "total_deductions",
                summary.total_deductions,
                record.total_deductions,
            )?;
            summary.total_net_pay = add("net_pay", summary.total_net_pay, record.net_pay)?;
            summary.employees.push(YtdSummaryLine {
                employee_id: record.employee_id,
                name,
                gross_pay: record.gross_pay,
                deductions: record.total_deductions,
                net_pay: record.net_pay,
            });
        }

        summary
            .employees
            .sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(summary)
    }
}
