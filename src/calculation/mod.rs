//! Calculation logic for the payroll engine.
//!
//! This module contains the per-employee calculation rules: bonus totals,
//! overtime pay, gross pay, PAYE income tax, the capped NIS contribution,
//! the flat-rate NHT, HEART and Education tax contributions, business
//! deductions, and payslip assembly with rounding and an audit trace.

mod bonus_total;
mod flat_rate;
mod gross_pay;
mod nis_contribution;
mod other_deductions;
mod overtime;
mod paye_tax;
mod payslip;
mod rounding;

pub use bonus_total::{BonusTotalResult, calculate_bonus_total};
pub use flat_rate::{FlatRateContribution, FlatRateResult, calculate_flat_rate};
pub use gross_pay::{GrossPayResult, calculate_gross_pay};
pub use nis_contribution::{NisContributionResult, calculate_nis_contribution};
pub use other_deductions::{OtherDeductionsResult, calculate_other_deductions};
pub use overtime::{OvertimeResult, WEEKS_PER_YEAR, calculate_overtime_pay};
pub use paye_tax::{PayeTaxResult, calculate_paye_tax};
pub use payslip::{PayslipInput, compute_payslip};
pub use rounding::{CURRENCY_DP, checked_add, checked_div, checked_mul, round_currency};
