//! Appointment Scheduler Config API
//!
//! | 路径 | 方法 | 说明 | 角色 |
//! |------|------|------|------|
//! | /api/scheduler-config | GET/POST/PUT/DELETE | 当前用户的配置 | teacher, admin |
//! | /api/scheduler-config/slots?day= | GET | 某天的可预约时段 | teacher, admin |
//! | /api/scheduler-config/users/{user_id} | GET | 任意用户的配置 | admin |

mod handler;

use axum::{Router, middleware, routing::get};
use shared::models::Role;

use crate::auth::{RoleGuard, require_roles};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let own_routes = Router::new()
        .route(
            "/api/scheduler-config",
            get(handler::get_own)
                .post(handler::create)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/api/scheduler-config/slots", get(handler::slots))
        .layer(middleware::from_fn(require_roles(RoleGuard::new([
            Role::Teacher,
            Role::Admin,
        ]))));

    let admin_routes = Router::new()
        .route("/api/scheduler-config/users/{user_id}", get(handler::get_for_user))
        .layer(middleware::from_fn(require_roles(RoleGuard::new([Role::Admin]))));

    own_routes.merge(admin_routes)
}
