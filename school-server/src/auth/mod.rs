//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌校验
//! - [`CurrentUser`] - 当前用户上下文
//! - [`RoleRegistry`] - 角色权限表
//! - [`RoleGuard`] - 角色白名单守卫
//! - [`resolve_identity`] / [`require_roles`] / [`require_permission`] - 中间件

pub mod extractor;
pub mod guard;
pub mod jwt;
pub mod middleware;
pub mod registry;

pub use guard::{Access, RoleGuard};
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_permission, require_roles, resolve_identity};
pub use registry::RoleRegistry;
