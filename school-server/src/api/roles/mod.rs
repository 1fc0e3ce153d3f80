//! Role API Module
//!
//! Read-only view of the role registry, admin only.

mod handler;

use axum::{Router, middleware, routing::get};
use shared::models::Role;

use crate::auth::{RoleGuard, require_roles};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/roles", get(handler::list))
        .route("/api/roles/{role}/permissions", get(handler::get_role_permissions))
        .layer(middleware::from_fn(require_roles(RoleGuard::new([Role::Admin]))))
}
