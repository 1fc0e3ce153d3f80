//! School Server - 学校管理后台服务
//!
//! # 架构概述
//!
//! - **认证** (`auth`): JWT 身份解析、角色权限表、角色守卫
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储 (预约配置、名片浏览事件)
//! - **HTTP API** (`api`): RESTful 接口，统一响应信封
//! - **统计** (`analytics`): 页面浏览跟踪与转发
//!
//! # 模块结构
//!
//! ```text
//! school-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── common/        # 日志
//! ├── auth/          # JWT、角色权限、守卫
//! ├── db/            # 数据库层
//! ├── api/           # HTTP 路由和处理器
//! └── analytics/     # 页面浏览统计
//! ```

pub mod analytics;
pub mod api;
pub mod auth;
pub mod common;
pub mod core;
pub mod db;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService, RoleGuard, RoleRegistry};
pub use crate::core::{Config, Server, ServerError, ServerState};

pub use shared::{ApiError, ApiResponse, AppResult};

pub use common::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// 初始化日志 (控制台 + 按天滚动文件)
///
/// 日志写入 `work_dir/logs`；生产环境输出 JSON。
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    let log_dir = config.log_dir();
    init_logger_with_file(
        &config.log_level,
        config.log_json,
        Some(&log_dir.to_string_lossy()),
    )
}

pub fn print_banner() {
    println!(
        r#"
   _____      __                __
  / ___/_____/ /_  ____  ____  / /
  \__ \/ ___/ __ \/ __ \/ __ \/ /
 ___/ / /__/ / / / /_/ / /_/ / /
/____/\___/_/ /_/\____/\____/_/
    "#
    );
}
