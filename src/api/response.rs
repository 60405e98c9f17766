//! Response types for the cost dashboard API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

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

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
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

fn server_error(code: &str, message: &str, details: String) -> ApiErrorResponse {
    ApiErrorResponse {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        error: ApiError::with_details(code, message, details),
    }
}

impl From<DashboardError> for ApiErrorResponse {
    fn from(error: DashboardError) -> Self {
        let message = error.to_string();
        match error {
            DashboardError::MalformedAmount { raw } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "MALFORMED_AMOUNT",
                    message,
                    format!("'{}' is not a non-negative amount such as R$ 1.234,56", raw),
                ),
            ),
            DashboardError::InvalidRecord { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("INVALID_RECORD", message))
            }
            DashboardError::RecordNotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("RECORD_NOT_FOUND", message),
            },
            DashboardError::MissingRequiredColumn { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "MISSING_REQUIRED_COLUMN",
                    message,
                    "The data file lacks a required column and the policy is fatal",
                ),
            },
            DashboardError::AmountOverflow { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "AMOUNT_OVERFLOW",
                    message,
                    "An amount in the data is too large to total",
                ),
            },
            DashboardError::LossyCommit { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "LOSSY_COMMIT",
                    message,
                    "Fix the data file by hand, then retry",
                ),
            },
            DashboardError::FileNotFound { .. } => {
                server_error("DATA_FILE_ERROR", "Data file not found", message)
            }
            DashboardError::DecodeError { .. } | DashboardError::Csv { .. } => {
                server_error("DATA_FILE_ERROR", "Data file could not be read", message)
            }
            DashboardError::Io { .. } => server_error("IO_ERROR", "Storage failure", message),
            DashboardError::ConfigNotFound { .. } | DashboardError::ConfigParseError { .. } => {
                server_error("CONFIG_ERROR", "Configuration error", message)
            }
        }
    }
}
