//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::request::{BonusBody, RunPayrollBody};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll-runs", post(run_payroll_handler))
        .route("/payroll-runs/:run_id", get(run_report_handler))
        .route(
            "/employees/:employee_id/bonuses",
            post(add_bonus_handler).get(list_bonuses_handler),
        )
        .route(
            "/bonuses/:bonus_id",
            put(update_bonus_handler).delete(delete_bonus_handler),
        )
        .route("/employees/:employee_id/ytd/:year", get(employee_ytd_handler))
        .route(
            "/businesses/:business_id/ytd-summary/:year",
            get(ytd_summary_handler),
        )
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a body extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::new(StatusCode::BAD_REQUEST, error).into_response()
}

/// Handler for POST /payroll-runs.
///
/// Runs payroll for the selected employees and returns the run outcome,
/// including per-employee failures.
async fn run_payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<RunPayrollBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll run request");

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match state.service().run_payroll(body.into()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %result.run_id,
                succeeded = result.succeeded,
                failed = result.failed,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll run completed"
            );
            json_response(StatusCode::CREATED, result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Payroll run rejected"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /payroll-runs/:run_id.
async fn run_report_handler(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> Response {
    match state.service().run_report(run_id) {
        Ok(report) => json_response(StatusCode::OK, report),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /employees/:employee_id/bonuses.
async fn add_bonus_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<BonusBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match state.service().add_bonus(&employee_id, body.into()) {
        Ok(bonus) => json_response(StatusCode::CREATED, bonus),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                error = %err,
                "Bonus rejected"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /employees/:employee_id/bonuses.
async fn list_bonuses_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Response {
    match state.service().list_bonuses(&employee_id) {
        Ok(bonuses) => json_response(StatusCode::OK, bonuses),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for PUT /bonuses/:bonus_id.
async fn update_bonus_handler(
    State(state): State<AppState>,
    Path(bonus_id): Path<Uuid>,
    payload: Result<Json<BonusBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match state.service().update_bonus(bonus_id, body.into()) {
        Ok(bonus) => json_response(StatusCode::OK, bonus),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                bonus_id = %bonus_id,
                error = %err,
                "Bonus update rejected"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for DELETE /bonuses/:bonus_id.
async fn delete_bonus_handler(
    State(state): State<AppState>,
    Path(bonus_id): Path<Uuid>,
) -> Response {
    match state.service().delete_bonus(bonus_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for GET /employees/:employee_id/ytd/:year.
async fn employee_ytd_handler(
    State(state): State<AppState>,
    Path((employee_id, year)): Path<(String, i32)>,
) -> Response {
    match state.service().employee_ytd(&employee_id, year) {
        Ok(ytd) => json_response(StatusCode::OK, ytd),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for GET /businesses/:business_id/ytd-summary/:year.
async fn ytd_summary_handler(
    State(state): State<AppState>,
    Path((business_id, year)): Path<(String, i32)>,
) -> Response {
    match state.service().ytd_summary(&business_id, year) {
        Ok(summary) => json_response(StatusCode::OK, summary),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}
