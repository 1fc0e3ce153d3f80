//! 认证授权中间件
//!
//! - [`resolve_identity`]: bearer token -> [`CurrentUser`] in request extensions
//! - [`require_roles`]: role allow-list ([`RoleGuard`])
//! - [`require_permission`]: permission check against the [`RoleRegistry`]
//!
//! Both guards answer a denial with the same 403 envelope; a missing identity
//! and a wrong role are indistinguishable to the client.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::ApiError;

use crate::auth::{Access, CurrentUser, JwtService, RoleGuard, RoleRegistry};
use crate::security_log;

type MiddlewareFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// 身份解析中间件
///
/// 有效令牌 -> 注入 [`CurrentUser`]；缺失、无效或过期的令牌不会中断请求，
/// 只是不注入身份，由后续守卫统一拒绝。
pub async fn resolve_identity(
    State(jwt_service): State<Arc<JwtService>>,
    mut req: Request,
    next: Next,
) -> Response {
    // Never trust an identity that did not come from this middleware
    req.extensions_mut().remove::<CurrentUser>();

    let token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header);

    if let Some(token) = token {
        match jwt_service.validate_token(token) {
            Ok(claims) => {
                req.extensions_mut().insert(CurrentUser::from(claims));
            }
            Err(e) => {
                security_log!(
                    WARN,
                    "auth_failed",
                    error = %e,
                    uri = %req.uri()
                );
            }
        }
    }

    next.run(req).await
}

/// 角色守卫中间件
///
/// # 用法
///
/// ```ignore
/// Router::new()
///     .route("/api/scheduler-config", get(handler::get_own))
///     .layer(middleware::from_fn(require_roles(RoleGuard::new([Role::Teacher, Role::Admin]))));
/// ```
pub fn require_roles(
    guard: RoleGuard,
) -> impl Fn(Request, Next) -> MiddlewareFuture + Clone + Send + Sync + 'static {
    move |req: Request, next: Next| {
        let guard = guard.clone();
        Box::pin(async move {
            let user = req.extensions().get::<CurrentUser>();
            match guard.check(user) {
                Access::Allowed => next.run(req).await,
                Access::Denied => {
                    security_log!(
                        WARN,
                        "role_denied",
                        user_id = user.map(|u| u.id.as_str()).unwrap_or("-"),
                        user_role = user.map(|u| u.role.as_str()).unwrap_or("-"),
                        uri = %req.uri()
                    );
                    ApiError::Forbidden.into_response()
                }
            }
        })
    }
}

/// 权限守卫中间件
///
/// `*` 匹配所有权限。与角色守卫相互独立，每个路由只选用其中一种。
pub fn require_permission(
    registry: Arc<RoleRegistry>,
    permission: &'static str,
) -> impl Fn(Request, Next) -> MiddlewareFuture + Clone + Send + Sync + 'static {
    move |req: Request, next: Next| {
        let registry = registry.clone();
        Box::pin(async move {
            let user = req.extensions().get::<CurrentUser>();
            let granted = user.is_some_and(|u| registry.has_permission(&u.role, permission));

            if granted {
                next.run(req).await
            } else {
                security_log!(
                    WARN,
                    "permission_denied",
                    user_id = user.map(|u| u.id.as_str()).unwrap_or("-"),
                    required_permission = permission,
                    uri = %req.uri()
                );
                ApiError::Forbidden.into_response()
            }
        })
    }
}
