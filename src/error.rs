//! Unified error types for the service.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Unified error type for startup and handler internals.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Timestamp formatting error.
    #[error("timestamp error: {0}")]
    Timestamp(#[from] time::error::Format),

    /// Metrics recorder could not be installed.
    #[error("metrics error: {0}")]
    Metrics(String),
}

/// Errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No route matched the request.
    #[error("not found")]
    NotFound {
        /// Request method.
        method: Method,
        /// Request path.
        path: String,
    },

    /// The request body could not be parsed.
    #[error("invalid request body: {message}")]
    InvalidBody {
        /// Response status.
        status: StatusCode,
        /// Parser error text.
        message: String,
    },

    /// Handler failure; the detail is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidBody { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidBody {
            status: StatusCode::BAD_REQUEST,
            message: format!("Failed to parse the request body as JSON: {}", err),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::NotFound { method, path } => json!({
                "error": "not found",
                "method": method.as_str(),
                "path": path,
            }),
            ApiError::InvalidBody { message, .. } => {
                tracing::debug!(%status, "Rejected request body: {}", message);
                json!({ "error": message })
            }
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                json!({ "error": "internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
