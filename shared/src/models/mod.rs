//! Data models
//!
//! Shared between school-server and frontend (via API).
//! Stored documents use camelCase field names; timestamps are epoch millis.

pub mod card_view;
pub mod role;
pub mod scheduler;

// Re-exports
pub use card_view::*;
pub use role::*;
pub use scheduler::*;
