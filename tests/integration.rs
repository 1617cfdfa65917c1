//! End-to-end tests for the payroll engine HTTP API.
//!
//! These tests drive the router seeded from `./config` and cover:
//! - Statutory deductions on a full monthly run
//! - PAYE threshold and business deductions
//! - Bonus consumption across runs
//! - Overtime pay
//! - Year-to-date accumulation and the business summary
//! - Error cases

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_engine::api::{create_router, AppState};
use payroll_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let loaders = ConfigLoader::load_all("./config").expect("Failed to load config");
    AppState::seeded(loaders).expect("Failed to seed state")
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn decimal_field(value: &Value, field: &str) -> Decimal {
    let raw = value[field]
        .as_str()
        .unwrap_or_else(|| panic!("field {} missing in {}", field, value));
    decimal(raw)
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

fn run_request(start: &str, end: &str, employees: Vec<Value>) -> Value {
    json!({
        "business_id": "acme",
        "start_date": start,
        "end_date": end,
        "employees": employees
    })
}

fn pick(employee_id: &str) -> Value {
    json!({"employee_id": employee_id})
}

/// Runs payroll and returns the run report.
async fn run_and_report(state: &AppState, body: Value) -> Value {
    let (status, result) = send(create_router(state.clone()), "POST", "/payroll-runs", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "run failed: {}", result);

    let uri = format!("/payroll-runs/{}", result["run_id"].as_str().unwrap());
    let (status, report) = send(create_router(state.clone()), "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    report
}

fn payslip_for<'a>(report: &'a Value, employee_id: &str) -> &'a Value {
    report["payslips"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["employee_id"] == employee_id)
        .unwrap_or_else(|| panic!("no payslip for {}", employee_id))
}

fn assert_totals_consistent(payslip: &Value) {
    let gross = decimal_field(payslip, "basic_pay")
        + decimal_field(payslip, "overtime_pay")
        + decimal_field(payslip, "bonus");
    assert_eq!(decimal_field(payslip, "gross_pay"), gross);

    let deductions = decimal_field(payslip, "paye_tax")
        + decimal_field(payslip, "nis_deduction")
        + decimal_field(payslip, "nht_deduction")
        + decimal_field(payslip, "heart_deduction")
        + decimal_field(payslip, "ed_deduction")
        + decimal_field(payslip, "other_deductions");
    assert_eq!(decimal_field(payslip, "total_deductions"), deductions);
    assert_eq!(
        decimal_field(payslip, "net_pay"),
        gross - deductions,
        "net pay mismatch in {}",
        payslip
    );
}

// =============================================================================
// Monthly runs
// =============================================================================

#[tokio::test]
async fn test_below_threshold_employee() {
    let state = create_test_state();
    let report = run_and_report(
        &state,
        run_request("2025-01-01", "2025-01-31", vec![pick("emp_001")]),
    )
    .await;

    let payslip = payslip_for(&report, "emp_001");
    assert_eq!(decimal_field(payslip, "gross_pay"), decimal("100000"));
    assert_eq!(decimal_field(payslip, "paye_tax"), Decimal::ZERO);
    assert_eq!(decimal_field(payslip, "nis_deduction"), decimal("3000"));
    assert_eq!(decimal_field(payslip, "nht_deduction"), decimal("2000"));
    assert_eq!(decimal_field(payslip, "heart_deduction"), decimal("300"));
    assert_eq!(decimal_field(payslip, "ed_deduction"), decimal("250"));
    assert_eq!(decimal_field(payslip, "other_deductions"), decimal("1500"));
    assert_eq!(decimal_field(payslip, "net_pay"), decimal("92950"));
    assert_totals_consistent(payslip);
}

#[tokio::test]
async fn test_above_threshold_employee_pays_paye() {
    let state = create_test_state();
    let report = run_and_report(
        &state,
        run_request("2025-01-01", "2025-01-31", vec![pick("emp_002")]),
    )
    .await;

    let payslip = payslip_for(&report, "emp_002");
    assert_eq!(decimal_field(payslip, "paye_tax"), decimal("6250"));
    assert_eq!(decimal_field(payslip, "nis_deduction"), decimal("4500"));
    assert_eq!(decimal_field(payslip, "total_deductions"), decimal("16075"));
    assert_eq!(decimal_field(payslip, "net_pay"), decimal("133925"));
}

#[tokio::test]
async fn test_payslip_carries_audit_trace() {
    let state = create_test_state();
    let report = run_and_report(
        &state,
        run_request("2025-01-01", "2025-01-31", vec![pick("emp_001")]),
    )
    .await;

    let steps = payslip_for(&report, "emp_001")["audit_trace"]["steps"]
        .as_array()
        .unwrap()
        .clone();
    assert!(!steps.is_empty());
    for (index, step) in steps.iter().enumerate() {
        assert_eq!(step["step_number"], index as u64 + 1);
    }
    assert!(steps.iter().any(|s| s["rule_id"] == "paye_tax"));
    assert!(steps.iter().any(|s| s["rule_id"] == "nis_contribution"));
}

#[tokio::test]
async fn test_inactive_employee_is_skipped() {
    let state = create_test_state();
    let report = run_and_report(
        &state,
        run_request(
            "2025-01-01",
            "2025-01-31",
            vec![pick("emp_001"), pick("emp_003")],
        ),
    )
    .await;

    assert_eq!(report["payslips"].as_array().unwrap().len(), 1);
    assert_eq!(report["run"]["status"], "completed");
}

#[tokio::test]
async fn test_overtime_adds_to_gross() {
    let state = create_test_state();
    let report = run_and_report(
        &state,
        run_request(
            "2025-01-01",
            "2025-01-31",
            vec![json!({"employee_id": "emp_001", "overtime_hours": "10"})],
        ),
    )
    .await;

    let payslip = payslip_for(&report, "emp_001");
    let overtime = decimal_field(payslip, "overtime_pay");
    assert!(overtime > Decimal::ZERO);
    assert!(decimal_field(payslip, "gross_pay") > decimal("100000"));
    assert_totals_consistent(payslip);
}

// =============================================================================
// Bonuses
// =============================================================================

#[tokio::test]
async fn test_bonus_paid_once() {
    let state = create_test_state();
    let (status, bonus) = send(
        create_router(state.clone()),
        "POST",
        "/employees/emp_001/bonuses",
        Some(json!({"bonus_type": "performance", "amount": "10000", "month": 1, "year": 2025})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let bonus_id = bonus["id"].as_str().unwrap().to_string();

    let report = run_and_report(
        &state,
        run_request("2025-01-01", "2025-01-31", vec![pick("emp_001")]),
    )
    .await;
    let payslip = payslip_for(&report, "emp_001");
    assert_eq!(decimal_field(payslip, "bonus"), decimal("10000"));
    assert_eq!(decimal_field(payslip, "gross_pay"), decimal("110000"));
    assert_eq!(payslip["applied_bonus_ids"][0], bonus_id.as_str());

    // A second run in the same month (a different period) does not pay it again.
    let report = run_and_report(
        &state,
        run_request("2025-01-15", "2025-01-30", vec![pick("emp_001")]),
    )
    .await;
    assert_eq!(
        decimal_field(payslip_for(&report, "emp_001"), "bonus"),
        Decimal::ZERO
    );

    let (status, error) = send(
        create_router(state.clone()),
        "DELETE",
        &format!("/bonuses/{}", bonus_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "BONUS_ALREADY_APPLIED");
}

#[tokio::test]
async fn test_bonus_for_other_month_not_paid() {
    let state = create_test_state();
    send(
        create_router(state.clone()),
        "POST",
        "/employees/emp_001/bonuses",
        Some(json!({"bonus_type": "holiday", "amount": "5000", "month": 12, "year": 2025})),
    )
    .await;

    let report = run_and_report(
        &state,
        run_request("2025-01-01", "2025-01-31", vec![pick("emp_001")]),
    )
    .await;
    assert_eq!(
        decimal_field(payslip_for(&report, "emp_001"), "bonus"),
        Decimal::ZERO
    );
}

// =============================================================================
// Year to date
// =============================================================================

#[tokio::test]
async fn test_ytd_accumulates_across_runs() {
    let state = create_test_state();
    let mut expected_net = Decimal::ZERO;
    for (start, end) in [("2025-01-01", "2025-01-31"), ("2025-02-01", "2025-02-28")] {
        let report = run_and_report(&state, run_request(start, end, vec![pick("emp_002")])).await;
        expected_net += decimal_field(payslip_for(&report, "emp_002"), "net_pay");
    }

    let (status, ytd) = send(
        create_router(state.clone()),
        "GET",
        "/employees/emp_002/ytd/2025",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ytd["payslip_count"], 2);
    assert_eq!(decimal_field(&ytd, "gross_pay"), decimal("300000"));
    assert_eq!(decimal_field(&ytd, "net_pay"), expected_net);

    let (_, other_year) = send(
        create_router(state.clone()),
        "GET",
        "/employees/emp_002/ytd/2024",
        None,
    )
    .await;
    assert_eq!(other_year["payslip_count"], 0);
}

#[tokio::test]
async fn test_ytd_summary_totals_match_employees() {
    let state = create_test_state();
    run_and_report(
        &state,
        run_request(
            "2025-03-01",
            "2025-03-31",
            vec![pick("emp_001"), pick("emp_002")],
        ),
    )
    .await;

    let (status, summary) = send(
        create_router(state.clone()),
        "GET",
        "/businesses/acme/ytd-summary/2025",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_employees"], 2);

    let lines = summary["employees"].as_array().unwrap();
    let gross: Decimal = lines.iter().map(|l| decimal_field(l, "gross_pay")).sum();
    assert_eq!(gross, decimal("250000"));
    assert_eq!(lines[1]["name"], "Bob Brown");
}

// =============================================================================
// Error cases
// =============================================================================

#[tokio::test]
async fn test_no_eligible_employees() {
    let state = create_test_state();
    let (status, error) = send(
        create_router(state),
        "POST",
        "/payroll-runs",
        Some(run_request("2025-01-01", "2025-01-31", vec![pick("emp_003")])),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "NO_ELIGIBLE_EMPLOYEES");
}

#[tokio::test]
async fn test_unknown_business() {
    let state = create_test_state();
    let mut body = run_request("2025-01-01", "2025-01-31", vec![pick("emp_001")]);
    body["business_id"] = json!("missing");
    let (status, error) = send(create_router(state), "POST", "/payroll-runs", Some(body)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "BUSINESS_NOT_FOUND");
}

#[tokio::test]
async fn test_bonus_with_invalid_month() {
    let state = create_test_state();
    let (status, error) = send(
        create_router(state),
        "POST",
        "/employees/emp_001/bonuses",
        Some(json!({"bonus_type": "other", "amount": "100", "month": 13, "year": 2025})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_BONUS");
}

#[tokio::test]
async fn test_malformed_run_id() {
    let state = create_test_state();
    let (status, _) = send(create_router(state), "GET", "/payroll-runs/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
