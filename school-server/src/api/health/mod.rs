//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 存活 + 数据库检查 | 无 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "success": true,
//!   "message": "healthy",
//!   "data": { "status": "healthy", "version": "0.1.0", "uptimeSeconds": 12, "database": "ok" }
//! }
//! ```

use axum::{Router, extract::State, routing::get};
use serde::Serialize;
use shared::ApiResponse;
use std::time::SystemTime;

use crate::core::ServerState;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    /// ok | error
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database_latency_ms: Option<u64>,
}

// 服务器启动时间 (懒加载静态变量)
static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

fn get_uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub async fn health(State(state): State<ServerState>) -> ApiResponse<HealthResponse> {
    let db_start = std::time::Instant::now();
    let (database, database_latency_ms) = match state.db.health().await {
        Ok(()) => ("ok", Some(db_start.elapsed().as_millis() as u64)),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            ("error", None)
        }
    };

    let status = if database == "ok" { "healthy" } else { "degraded" };

    ApiResponse::success(
        status,
        HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds: get_uptime_seconds(),
            database,
            database_latency_ms,
        },
    )
}
