//! Card View API
//!
//! Recording is public (cards are viewed by anonymous visitors); reading
//! the events requires the `view_analytics` permission.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use shared::models::VIEW_ANALYTICS;

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let record_routes = Router::new().route("/api/cards/{card_id}/views", post(handler::record));

    let read_routes = Router::new()
        .route("/api/cards/{card_id}/views", get(handler::list))
        .route("/api/cards/{card_id}/views/summary", get(handler::summary))
        .layer(middleware::from_fn(require_permission(
            state.registry.clone(),
            VIEW_ANALYTICS,
        )));

    record_routes.merge(read_routes)
}
