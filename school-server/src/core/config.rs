use crate::auth::JwtConfig;
use std::path::PathBuf;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | production 时为 true | JSON 日志输出 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | ANALYTICS_COLLECTOR_URL | - | 页面浏览统计收集地址 |
/// | ANALYTICS_TRACKING_ID | - | 统计跟踪 ID |
/// | ANALYTICS_TIMEOUT_MS | 5000 | 统计收集请求超时(毫秒) |
///
/// JWT 相关变量见 [`JwtConfig`]。
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    pub analytics_collector_url: Option<String>,
    pub analytics_tracking_id: Option<String>,
    /// 统计收集请求超时 (毫秒)，需小于 request_timeout_ms
    pub analytics_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(is_production),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            analytics_collector_url: std::env::var("ANALYTICS_COLLECTOR_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            analytics_tracking_id: std::env::var("ANALYTICS_TRACKING_ID")
                .ok()
                .filter(|s| !s.is_empty()),
            analytics_timeout_ms: std::env::var("ANALYTICS_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_and_paths() {
        let config = Config::with_overrides("/tmp/school", 8080);
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.database_dir(), PathBuf::from("/tmp/school/database"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/school/logs"));
    }
}
