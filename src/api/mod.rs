//! HTTP API module for the payroll engine.
//!
//! This module exposes payroll runs, bonus management and the
//! year-to-date reports as REST endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BonusBody, EmployeeSelectionBody, RunPayrollBody};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
