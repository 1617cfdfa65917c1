//! Payslip assembly.
//!
//! [`compute_payslip`] runs every calculation rule for one employee in
//! order, rounds each monetary component once and derives the totals from
//! the rounded components. It is pure: nothing is persisted here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::PayrollConfiguration;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{AuditStep, AuditTrace, Deduction, Employee, EmployeeBonus, PayPeriod, Payslip};

use super::bonus_total::calculate_bonus_total;
use super::flat_rate::{FlatRateContribution, calculate_flat_rate};
use super::gross_pay::calculate_gross_pay;
use super::nis_contribution::calculate_nis_contribution;
use super::other_deductions::calculate_other_deductions;
use super::overtime::calculate_overtime_pay;
use super::paye_tax::calculate_paye_tax;
use super::rounding::round_currency;

/// Everything needed to compute one employee's payslip.
#[derive(Debug, Clone)]
pub struct PayslipInput<'a> {
    /// The run the payslip belongs to.
    pub payroll_run_id: Uuid,
    /// The employee being paid.
    pub employee: &'a Employee,
    /// Overtime hours worked in the period.
    pub overtime_hours: Decimal,
    /// The employee's bonuses; only unapplied ones for the period's month count.
    pub bonuses: &'a [EmployeeBonus],
    /// The business's configured deductions.
    pub deductions: &'a [Deduction],
    /// The business's payroll configuration.
    pub config: &'a PayrollConfiguration,
    /// The period being paid.
    pub period: PayPeriod,
    /// Timestamp stamped on the payslip.
    pub now: DateTime<Utc>,
}

/// Computes a payslip, or explains why it cannot be produced.
///
/// Every failure is reported as [`PayrollError::PayslipComputationFailed`]
/// carrying the employee id, so the caller can record it and move on.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{PayslipInput, compute_payslip};
/// use payroll_engine::config::PayrollConfiguration;
/// use payroll_engine::models::{Employee, PayPeriod};
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     business_id: "acme".to_string(),
///     first_name: "Ada".to_string(),
///     last_name: "Brown".to_string(),
///     job_title: String::new(),
///     basic_salary: Decimal::new(100_000, 0),
///     date_of_hire: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
///     is_active: true,
/// };
/// let config = PayrollConfiguration::default();
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
/// )
/// .unwrap();
///
/// let payslip = compute_payslip(PayslipInput {
///     payroll_run_id: Uuid::new_v4(),
///     employee: &employee,
///     overtime_hours: Decimal::ZERO,
///     bonuses: &[],
///     deductions: &[],
///     config: &config,
///     period,
///     now: Utc::now(),
/// })
/// .unwrap();
///
/// assert_eq!(payslip.gross_pay, Decimal::new(100_000, 0));
/// assert_eq!(payslip.net_pay, payslip.gross_pay - payslip.total_deductions);
/// ```
pub fn compute_payslip(input: PayslipInput<'_>) -> PayrollResult<Payslip> {
    let employee_id = input.employee.id.clone();
    build_payslip(input).map_err(|e| match e {
        PayrollError::PayslipComputationFailed { .. } => e,
        other => PayrollError::PayslipComputationFailed {
            employee_id,
            message: other.to_string(),
        },
    })
}

fn next_step(steps: &[AuditStep]) -> u32 {
    steps.len() as u32 + 1
}

fn build_payslip(input: PayslipInput<'_>) -> PayrollResult<Payslip> {
    let employee = input.employee;
    employee.validate()?;

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings = Vec::new();

    let (month, year) = input.period.bonus_month();
    let bonus = calculate_bonus_total(input.bonuses, month, year, next_step(&steps))?;
    steps.push(bonus.audit_step);

    let overtime = calculate_overtime_pay(
        employee.basic_salary,
        input.overtime_hours,
        input.config,
        next_step(&steps),
    )?;
    steps.push(overtime.audit_step);

    let gross = calculate_gross_pay(
        employee.basic_salary,
        overtime.overtime_pay,
        bonus.total,
        next_step(&steps),
    )?;
    steps.push(gross.audit_step);
    let gross_pay = gross.gross_pay;

    let paye = calculate_paye_tax(gross_pay, input.config, next_step(&steps))?;
    steps.push(paye.audit_step);

    let nis = calculate_nis_contribution(gross_pay, input.config, next_step(&steps))?;
    steps.push(nis.audit_step);
    warnings.extend(nis.warning);

    let mut flat = [Decimal::ZERO; 3];
    for (slot, contribution) in flat.iter_mut().zip(FlatRateContribution::ALL) {
        let result =
            calculate_flat_rate(contribution, gross_pay, input.config, next_step(&steps))?;
        *slot = result.amount;
        steps.push(result.audit_step);
    }
    let [nht, heart, ed] = flat;

    let other =
        calculate_other_deductions(input.deductions, gross_pay, next_step(&steps))?;
    steps.push(other.audit_step);

    let mut payslip = Payslip {
        id: Uuid::new_v4(),
        payroll_run_id: input.payroll_run_id,
        employee_id: employee.id.clone(),
        basic_pay: round_currency(employee.basic_salary),
        overtime_pay: round_currency(overtime.overtime_pay),
        bonus: round_currency(bonus.total),
        paye_tax: round_currency(paye.paye_tax),
        nis_deduction: round_currency(nis.nis_deduction),
        nht_deduction: round_currency(nht),
        heart_deduction: round_currency(heart),
        ed_deduction: round_currency(ed),
        other_deductions: round_currency(other.total),
        gross_pay: Decimal::ZERO,
        total_deductions: Decimal::ZERO,
        net_pay: Decimal::ZERO,
        applied_bonus_ids: bonus.bonus_ids,
        audit_trace: AuditTrace::default(),
        generated_at: input.now,
    };
    payslip.recompute_totals()?;

    if payslip.net_pay < Decimal::ZERO {
        return Err(PayrollError::calculation(format!(
            "deductions ${} exceed gross pay ${}",
            payslip.total_deductions, payslip.gross_pay
        )));
    }

    steps.push(AuditStep {
        step_number: next_step(&steps),
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        input: serde_json::json!({
            "gross_pay": payslip.gross_pay.to_string(),
            "total_deductions": payslip.total_deductions.to_string()
        }),
        output: serde_json::json!({
            "net_pay": payslip.net_pay.to_string()
        }),
        reasoning: format!(
            "${} gross - ${} deductions = ${}",
            payslip.gross_pay, payslip.total_deductions, payslip.net_pay
        ),
    });

    payslip.audit_trace = AuditTrace { steps, warnings };
    Ok(payslip)
}
