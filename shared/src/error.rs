//! Error types for the shared crate
//!
//! [`ApiError`] is the HTTP-facing error. It renders itself as an error
//! [`ApiResponse`] envelope with the matching status code.

use crate::response::ApiResponse;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

/// Fixed message for every authorization denial
///
/// Missing identity and insufficient role share this message.
pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to perform this action";

/// Unified error type for API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Validation error (400)
    #[error("{message}")]
    Validation {
        message: String,
        errors: Option<serde_json::Value>,
    },

    /// Permission denied (403)
    #[error("{}", PERMISSION_DENIED_MESSAGE)]
    Forbidden,

    /// Resource not found (404)
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Resource already exists (409)
    #[error("Resource already exists: {resource}")]
    Conflict { resource: String },

    /// Database error (500)
    #[error("Database error: {message}")]
    Database { message: String },

    /// Invalid request (400)
    #[error("Invalid request: {message}")]
    Invalid { message: String },
}

/// Result type for API handlers
pub type AppResult<T> = Result<T, ApiError>;

impl ApiError {
    // ========== Convenient constructors ==========

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn conflict(resource: impl Into<String>) -> Self {
        Self::Conflict {
            resource: resource.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    // ========== Error inspection methods ==========

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::Invalid { .. } => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message
    ///
    /// Database and internal details stay in the logs.
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::Forbidden => PERMISSION_DENIED_MESSAGE.to_string(),
            Self::NotFound { resource } => format!("{} not found", resource),
            Self::Conflict { resource } => format!("{} already exists", resource),
            Self::Database { .. } => "Database error".to_string(),
            Self::Invalid { message } => message.clone(),
        }
    }

    /// Error envelope for this error
    pub fn to_envelope(&self) -> ApiResponse<()> {
        match self {
            Self::Validation {
                message,
                errors: Some(errors),
            } => ApiResponse::error_with(message.clone(), errors.clone()),
            _ => ApiResponse::error(self.message()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Database { message } = &self {
            tracing::error!(target: "database", error = %message, "Database error occurred");
        }

        self.to_envelope()
            .with_status(self.status_code())
            .into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation {
            message: "Validation failed".to_string(),
            errors: serde_json::to_value(&errors).ok(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid(format!("Malformed JSON: {}", e))
    }
}
