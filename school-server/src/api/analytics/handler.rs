//! Page-view relay handler

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Deserialize;
use shared::{ApiError, ApiResponse, AppResult};

use crate::analytics::PageviewEvent;
use crate::api::extract::ApiJson;
use crate::core::ServerState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageviewRequest {
    pub path: String,
    #[serde(default)]
    pub query: String,
    pub client_id: Option<String>,
}

/// POST /api/analytics/pageview
///
/// 202 once handed to the collector (delivery failures are only logged),
/// 204 when no collector is configured.
pub async fn relay_pageview(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<PageviewRequest>,
) -> AppResult<Response> {
    if !payload.path.starts_with('/') {
        return Err(ApiError::invalid("`path` must start with '/'"));
    }

    let Some(collector) = state.pageview_collector.clone() else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let mut event = PageviewEvent::new(&payload.path, &payload.query);
    if let Some(client_id) = payload.client_id {
        event = event.with_client_id(client_id);
    }

    if let Err(e) = collector.send(&event).await {
        tracing::warn!(page = %event.page, error = %e, "Page view dropped");
    }

    Ok(ApiResponse::<()>::success_message("Page view accepted")
        .with_status(StatusCode::ACCEPTED)
        .into_response())
}
