//! Response types for the payroll API.
//!
//! This module defines the error response structures and the mapping from
//! [`PayrollError`] to HTTP status codes.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::PayrollError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Wraps an error body with a status.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<PayrollError> for ApiErrorResponse {
    fn from(error: PayrollError) -> Self {
        let message = error.to_string();
        let (status, code) = match &error {
            PayrollError::ConfigNotFound { .. } | PayrollError::ConfigParseError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            PayrollError::ConfigurationMissing { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "CONFIGURATION_MISSING")
            }
            PayrollError::InvalidConfiguration { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_CONFIGURATION")
            }
            PayrollError::InvalidPeriod { .. } => (StatusCode::BAD_REQUEST, "INVALID_PERIOD"),
            PayrollError::NoEligibleEmployees { .. } => {
                (StatusCode::BAD_REQUEST, "NO_ELIGIBLE_EMPLOYEES")
            }
            PayrollError::DuplicatePeriod { .. } => (StatusCode::CONFLICT, "DUPLICATE_PERIOD"),
            PayrollError::BusinessNotFound { .. } => (StatusCode::NOT_FOUND, "BUSINESS_NOT_FOUND"),
            PayrollError::BusinessNotApproved { .. } => {
                (StatusCode::FORBIDDEN, "BUSINESS_NOT_APPROVED")
            }
            PayrollError::EmployeeNotFound { .. } => (StatusCode::NOT_FOUND, "EMPLOYEE_NOT_FOUND"),
            PayrollError::InvalidEmployee { .. } => (StatusCode::BAD_REQUEST, "INVALID_EMPLOYEE"),
            PayrollError::BonusNotFound { .. } => (StatusCode::NOT_FOUND, "BONUS_NOT_FOUND"),
            PayrollError::BonusAlreadyApplied { .. } => {
                (StatusCode::CONFLICT, "BONUS_ALREADY_APPLIED")
            }
            PayrollError::DuplicateBonus { .. } => (StatusCode::CONFLICT, "DUPLICATE_BONUS"),
            PayrollError::InvalidBonus { .. } => (StatusCode::BAD_REQUEST, "INVALID_BONUS"),
            PayrollError::RunNotFound { .. } => (StatusCode::NOT_FOUND, "RUN_NOT_FOUND"),
            PayrollError::PayslipComputationFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PAYSLIP_COMPUTATION_FAILED")
            }
            PayrollError::CalculationError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CALCULATION_ERROR")
            }
        };

        let error = if status.is_server_error() {
            ApiError::with_details(code, "Internal payroll error", message)
        } else {
            ApiError::new(code, message)
        };
        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_duplicate_period_is_conflict() {
        let response: ApiErrorResponse = PayrollError::DuplicatePeriod {
            business_id: "acme".to_string(),
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        }
        .into();
        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.error.code, "DUPLICATE_PERIOD");
        assert!(response.error.message.contains("acme"));
    }

    #[test]
    fn test_configuration_missing_is_unprocessable() {
        let response: ApiErrorResponse = PayrollError::ConfigurationMissing {
            business_id: "acme".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_missing_entities_are_not_found() {
        for error in [
            PayrollError::RunNotFound {
                run_id: Uuid::nil(),
            },
            PayrollError::BonusNotFound {
                bonus_id: Uuid::nil(),
            },
            PayrollError::EmployeeNotFound {
                employee_id: "ghost".to_string(),
            },
        ] {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn test_internal_errors_carry_details() {
        let response: ApiErrorResponse = PayrollError::calculation("boom").into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.message, "Internal payroll error");
        assert_eq!(
            response.error.details.as_deref(),
            Some("Calculation error: boom")
        );
    }
}
