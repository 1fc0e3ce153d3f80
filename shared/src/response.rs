//! API Response types
//!
//! Every endpoint answers with the same envelope, success or not:
//! ```json
//! { "success": true, "message": "Config created", "data": { ... } }
//! { "success": false, "message": "Validation failed", "errors": { ... } }
//! ```

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Unified API response envelope
///
/// `data` and `errors` are omitted from the JSON when absent, never emitted as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    /// `true` for success envelopes, `false` for error envelopes
    pub success: bool,
    /// Human-readable message
    pub message: String,
    /// Response payload (success only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error details (error only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response carrying `data`
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }

    /// Create a successful response without payload
    pub fn success_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    /// Create an error response with an `errors` payload
    pub fn error_with(message: impl Into<String>, errors: serde_json::Value) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: Some(errors),
        }
    }

    /// Pair the envelope with an explicit status code
    pub fn with_status(self, status: StatusCode) -> (StatusCode, Json<Self>) {
        (status, Json(self))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
