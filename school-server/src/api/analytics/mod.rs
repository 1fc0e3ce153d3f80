//! Page-view relay
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/analytics/pageview | POST | 转发一次页面浏览到统计收集端 | 无 |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/analytics/pageview", post(handler::relay_pageview))
}
