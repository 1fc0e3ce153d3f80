use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::analytics::{HttpCollector, PageviewCollector};
use crate::auth::{JwtService, RoleRegistry};
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::db::repository::{CardViewRepository, SchedulerConfigRepository};

/// 服务器状态 - 持有所有服务的共享引用
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 令牌校验 |
/// | registry | Arc<RoleRegistry> | 角色权限表 (启动后只读) |
/// | pageview_collector | Option<Arc<dyn PageviewCollector>> | 页面浏览收集端，未配置时为 None |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub registry: Arc<RoleRegistry>,
    pub pageview_collector: Option<Arc<dyn PageviewCollector>>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("work_dir", &self.config.work_dir)
            .field("environment", &self.config.environment)
            .field("jwt_service", &self.jwt_service)
            .field("registry", &self.registry)
            .field("pageview_collector", &self.pageview_collector.is_some())
            .finish_non_exhaustive()
    }
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let pageview_collector = config.analytics_collector_url.as_ref().and_then(|url| {
            match HttpCollector::new(
                url.clone(),
                config.analytics_tracking_id.clone(),
                Duration::from_millis(config.analytics_timeout_ms),
            ) {
                Ok(collector) => Some(Arc::new(collector) as Arc<dyn PageviewCollector>),
                Err(e) => {
                    tracing::error!(error = %e, "Page view collector disabled");
                    None
                }
            }
        });

        Self {
            config,
            db,
            jwt_service,
            registry: Arc::new(RoleRegistry::default_table()),
            pageview_collector,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 工作目录 (database/、logs/)
    /// 2. 数据库 (work_dir/database/school.db)
    /// 3. JWT、权限表、统计收集端
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(config.database_dir())?;
        std::fs::create_dir_all(config.log_dir())?;

        let db_service = DbService::open(config.database_dir().join("school.db")).await?;
        Ok(Self::new(config.clone(), db_service.db))
    }

    /// 替换页面浏览收集端
    pub fn with_pageview_collector(mut self, collector: Arc<dyn PageviewCollector>) -> Self {
        self.pageview_collector = Some(collector);
        self
    }

    pub fn scheduler_configs(&self) -> SchedulerConfigRepository {
        SchedulerConfigRepository::new(self.db.clone())
    }

    pub fn card_views(&self) -> CardViewRepository {
        CardViewRepository::new(self.db.clone())
    }
}
