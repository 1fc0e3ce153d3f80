//! Card View API Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use http::{HeaderMap, StatusCode, header};
use serde::Deserialize;
use shared::models::{CardView, CardViewCreate, CardViewSummary, DeviceType, InteractionType};
use shared::util::now_millis;
use shared::{ApiError, ApiResponse, AppResult};
use validator::Validate;

use crate::api::extract::ApiJson;
use crate::core::ServerState;
use crate::db::repository::card_view::{DEFAULT_LIST_LIMIT, NewCardView, TimeWindow};

const MAX_CARD_ID_LEN: usize = 128;

fn check_card_id(card_id: &str) -> AppResult<()> {
    if card_id.trim().is_empty() || card_id.len() > MAX_CARD_ID_LEN {
        return Err(ApiError::invalid("Invalid card id"));
    }
    Ok(())
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Apply request defaults: headers fill missing user agent / referrer, the
/// device type is derived from the user agent, an anonymous viewer gets a
/// fresh id.
fn resolve_event(card_id: String, payload: CardViewCreate, headers: &HeaderMap) -> NewCardView {
    let user_agent = payload
        .user_agent
        .or_else(|| header_value(headers, header::USER_AGENT));
    let device_type = payload.device_type.unwrap_or_else(|| {
        user_agent
            .as_deref()
            .map(DeviceType::from_user_agent)
            .unwrap_or_default()
    });

    NewCardView {
        card_id,
        viewer_id: payload
            .viewer_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        timestamp: payload.timestamp.unwrap_or_else(now_millis),
        user_agent,
        device_type,
        country: payload.country,
        city: payload.city,
        referrer: payload
            .referrer
            .or_else(|| header_value(headers, header::REFERER)),
        interaction_type: payload.interaction_type.unwrap_or_default(),
        interaction_detail: payload.interaction_detail,
    }
}

/// POST /api/cards/{card_id}/views
pub async fn record(
    State(state): State<ServerState>,
    Path(card_id): Path<String>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<CardViewCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<CardView>>)> {
    check_card_id(&card_id)?;
    payload.validate()?;

    let event = resolve_event(card_id, payload, &headers);
    let view = state.card_views().record(event).await?;

    tracing::debug!(
        card_id = %view.card_id,
        interaction = view.interaction_type.as_str(),
        "Card view recorded"
    );
    Ok(ApiResponse::success("Card view recorded", view).with_status(StatusCode::CREATED))
}

#[derive(Debug, Deserialize)]
pub struct ViewsQuery {
    pub from: Option<i64>,
    pub to: Option<i64>,
    #[serde(rename = "type")]
    pub interaction_type: Option<InteractionType>,
    pub limit: Option<usize>,
}

/// GET /api/cards/{card_id}/views?from=&to=&type=&limit=
pub async fn list(
    State(state): State<ServerState>,
    Path(card_id): Path<String>,
    Query(query): Query<ViewsQuery>,
) -> AppResult<ApiResponse<Vec<CardView>>> {
    check_card_id(&card_id)?;
    let window = TimeWindow::new(query.from, query.to);
    if window.is_empty() {
        return Err(ApiError::invalid("`from` must not be after `to`"));
    }
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, DEFAULT_LIST_LIMIT);

    let repo = state.card_views();
    let views = match query.interaction_type {
        Some(interaction_type) => {
            repo.find_by_card_and_type(&card_id, interaction_type, window, limit)
                .await?
        }
        None => repo.find_by_card_in_range(&card_id, window, limit).await?,
    };

    Ok(ApiResponse::success("Card views retrieved", views))
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

/// GET /api/cards/{card_id}/views/summary?from=&to=
pub async fn summary(
    State(state): State<ServerState>,
    Path(card_id): Path<String>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<ApiResponse<CardViewSummary>> {
    check_card_id(&card_id)?;
    let window = TimeWindow::new(query.from, query.to);
    if window.is_empty() {
        return Err(ApiError::invalid("`from` must not be after `to`"));
    }

    let summary = state.card_views().summary(&card_id, window).await?;
    Ok(ApiResponse::success("Card view summary retrieved", summary))
}
