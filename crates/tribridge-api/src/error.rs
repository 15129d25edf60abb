//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tribridge_core::BridgeError;
use utoipa::ToSchema;

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Configuration(String),
    BackendUnavailable(String),
    Query(String),
    PartialImport { message: String, failed: usize },
    Internal(String),
}

impl AppError {
    /// Wrap a core error, prefixing the message with the failed operation
    pub fn during(operation: &str, err: BridgeError) -> Self {
        match AppError::from(err) {
            AppError::BadRequest(msg) => AppError::BadRequest(msg),
            AppError::Configuration(msg) => AppError::Configuration(format!("{operation}: {msg}")),
            AppError::BackendUnavailable(msg) => {
                AppError::BackendUnavailable(format!("{operation}: {msg}"))
            }
            AppError::Query(msg) => AppError::Query(format!("{operation}: {msg}")),
            AppError::PartialImport { message, failed } => AppError::PartialImport {
                message: format!("{operation}: {message}"),
                failed,
            },
            AppError::Internal(msg) => AppError::Internal(format!("{operation}: {msg}")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("BAD_REQUEST", msg),
            ),
            AppError::Configuration(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("CONFIGURATION_ERROR", msg),
            ),
            AppError::BackendUnavailable(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("BACKEND_UNAVAILABLE", msg),
            ),
            AppError::Query(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("QUERY_ERROR", msg),
            ),
            AppError::PartialImport { message, failed } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("PARTIAL_IMPORT", message)
                    .with_details(format!("{failed} triples were not stored")),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
        };

        if status.is_server_error() {
            tracing::error!(code = %error.code, message = %error.message, "Request failed");
        }

        (status, Json(error)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<BridgeError> for AppError {
    fn from(err: BridgeError) -> Self {
        let message = err.to_string();
        match err {
            BridgeError::Validation(msg) => AppError::BadRequest(msg),
            BridgeError::Configuration(_) => AppError::Configuration(message),
            BridgeError::BackendUnavailable(_) => AppError::BackendUnavailable(message),
            BridgeError::Query(_) => AppError::Query(message),
            BridgeError::PartialImport { failures, .. } => AppError::PartialImport {
                message,
                failed: failures.len(),
            },
            BridgeError::Other(_) => AppError::Internal(message),
        }
    }
}
