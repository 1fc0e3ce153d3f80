//! Role API Handlers

use axum::extract::{Path, State};
use shared::models::{Role, RolePermissions};
use shared::{ApiError, ApiResponse, AppResult};

use crate::auth::CurrentUser;
use crate::core::ServerState;

/// GET /api/roles - 所有角色及其权限
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> ApiResponse<Vec<RolePermissions>> {
    tracing::debug!(user_id = %current_user.id, "Fetching roles");
    ApiResponse::success("Roles retrieved", state.registry.list())
}

/// GET /api/roles/{role}/permissions
pub async fn get_role_permissions(
    State(state): State<ServerState>,
    Path(role): Path<String>,
) -> AppResult<ApiResponse<RolePermissions>> {
    let role = Role::parse(&role).ok_or_else(|| ApiError::not_found(format!("Role {role}")))?;

    Ok(ApiResponse::success(
        "Role permissions retrieved",
        RolePermissions {
            role,
            permissions: state.registry.permissions_of(role.as_str()).to_vec(),
        },
    ))
}
