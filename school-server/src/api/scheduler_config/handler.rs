//! Scheduler Config API Handlers
//!
//! A config always belongs to the requesting user; the user id comes from
//! the resolved identity, never from the body.

use axum::Json;
use axum::extract::{Path, Query, State};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use shared::models::{
    AppointmentSchedulerConfig, SchedulerConfigCreate, SchedulerConfigUpdate, TimeSlot,
    is_weekday,
};
use shared::{ApiError, ApiResponse, AppResult};
use validator::Validate;

use crate::api::extract::ApiJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;

fn not_found(user_id: &str) -> ApiError {
    ApiError::not_found(format!("Scheduler config for user {user_id}"))
}

/// GET /api/scheduler-config
pub async fn get_own(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<ApiResponse<AppointmentSchedulerConfig>> {
    let config = state
        .scheduler_configs()
        .find_by_user(&current_user.id)
        .await?
        .ok_or_else(|| not_found(&current_user.id))?;

    Ok(ApiResponse::success("Scheduler config retrieved", config))
}

/// POST /api/scheduler-config
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiJson(payload): ApiJson<SchedulerConfigCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<AppointmentSchedulerConfig>>)> {
    let payload = payload.normalized();
    payload.validate()?;

    let config = state
        .scheduler_configs()
        .create(&current_user.id, payload)
        .await?;

    tracing::info!(user_id = %current_user.id, config_id = %config.id, "Scheduler config created");
    Ok(ApiResponse::success("Scheduler config created", config).with_status(StatusCode::CREATED))
}

/// PUT /api/scheduler-config
///
/// Omitted fields keep their stored value; the merged result is validated
/// as a whole.
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiJson(payload): ApiJson<SchedulerConfigUpdate>,
) -> AppResult<ApiResponse<AppointmentSchedulerConfig>> {
    let repo = state.scheduler_configs();
    let current = repo
        .find_by_user(&current_user.id)
        .await?
        .ok_or_else(|| not_found(&current_user.id))?;

    let merged = payload.apply_to(&current).normalized();
    merged.validate()?;

    let config = repo.update(&current_user.id, merged).await?;
    tracing::info!(user_id = %current_user.id, "Scheduler config updated");
    Ok(ApiResponse::success("Scheduler config updated", config))
}

/// DELETE /api/scheduler-config
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<ApiResponse<()>> {
    if !state.scheduler_configs().delete(&current_user.id).await? {
        return Err(not_found(&current_user.id));
    }

    tracing::info!(user_id = %current_user.id, "Scheduler config deleted");
    Ok(ApiResponse::success_message("Scheduler config deleted"))
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub day: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlots {
    pub day: String,
    pub slot_duration: u32,
    pub slots: Vec<TimeSlot>,
}

/// GET /api/scheduler-config/slots?day=monday
pub async fn slots(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<SlotsQuery>,
) -> AppResult<ApiResponse<DaySlots>> {
    if !is_weekday(&query.day) {
        return Err(ApiError::invalid(format!("Unknown day: {}", query.day)));
    }

    let config = state
        .scheduler_configs()
        .find_by_user(&current_user.id)
        .await?
        .ok_or_else(|| not_found(&current_user.id))?;

    let day = query.day.to_lowercase();
    let slots = config.slots_for(&day);
    Ok(ApiResponse::success(
        "Slots retrieved",
        DaySlots {
            day,
            slot_duration: config.slot_duration,
            slots,
        },
    ))
}

/// GET /api/scheduler-config/users/{user_id}
pub async fn get_for_user(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<AppointmentSchedulerConfig>> {
    let config = state
        .scheduler_configs()
        .find_by_user(&user_id)
        .await?
        .ok_or_else(|| not_found(&user_id))?;

    Ok(ApiResponse::success("Scheduler config retrieved", config))
}
