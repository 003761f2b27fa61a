//! Error type for the relay's plain HTTP routes and startup checks.
//!
//! Uses `thiserror` for the definitions and converts directly into JSON
//! error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum FedstrError {
    // === Validation errors ===
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // === Availability ===
    #[error("Service unavailable: {message}")]
    Unavailable { message: String },
}

/// JSON error response body sent to clients.
#[derive(Serialize)]
struct ErrorResponse {
    code: u16,
    error: String,
    message: String,
}

impl FedstrError {
    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Error code string for programmatic handling by clients.
    pub fn error_code(&self) -> &str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Unavailable { .. } => "UNAVAILABLE",
        }
    }
}

impl IntoResponse for FedstrError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: status.as_u16(),
            error: self.error_code().to_string(),
            message: self.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}
