//! HTTP API module for the cost dashboard.
//!
//! This module exposes the dashboard view, the operator commands and the
//! CSV exports as JSON-over-HTTP endpoints for an external UI.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AmountInput, DashboardQuery, EmployeePatchRequest, EmployeeRequest, LicensePatchRequest,
    LicenseRequest, PeriodCostRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
