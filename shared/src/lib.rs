//! Shared types for the school server
//!
//! Response envelope, error types and data models used by the server
//! and its clients.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiError, AppResult, PERMISSION_DENIED_MESSAGE};
pub use http;
pub use response::ApiResponse;
pub use serde::{Deserialize, Serialize};
