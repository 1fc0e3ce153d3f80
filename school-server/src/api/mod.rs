//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`roles`] - 角色权限查询 (admin)
//! - [`scheduler_config`] - 预约时段配置 (teacher, admin)
//! - [`card_views`] - 名片浏览事件
//! - [`analytics`] - 页面浏览转发
//!
//! 身份解析 ([`resolve_identity`]) 作用于所有路由；守卫按路由分组挂载。

pub mod analytics;
pub mod card_views;
pub mod extract;
pub mod health;
pub mod roles;
pub mod scheduler_config;

use axum::{Router, middleware};

use crate::auth::resolve_identity;
use crate::core::ServerState;

/// Build the API router bound to `state`
pub fn router(state: ServerState) -> Router {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(roles::router())
        .merge(scheduler_config::router())
        .merge(card_views::router(&state))
        .merge(analytics::router())
        .layer(middleware::from_fn_with_state(
            state.jwt_service.clone(),
            resolve_identity,
        ))
        .with_state(state)
}
