// ==========================================
// 农产品收银系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 说明: 行情缓存、通知发送、按养殖户锁均由此处显式构造并持有，无全局状态
// ==========================================

use std::sync::Arc;

use crate::api::{CollectionApi, ReportApi, RouteApi};
use crate::config::{CollectionConfigReader, ConfigManager};
use crate::engine::{
    CollectionRecorder, CollectionRepositories, CollectionValidator, MarketPriceProvider,
    NotificationSink, PersistentNotificationSink, ReportingEngine, RouteAdvisor,
};
use crate::repository::{open_shared_connection, NotificationRepository};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 收购登记API
    pub collection_api: Arc<CollectionApi>,

    /// 报表与结算API
    pub report_api: Arc<ReportApi>,

    /// 线路API
    pub route_api: Arc<RouteApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 仓储集合（供管理类操作直接使用）
    pub repos: CollectionRepositories,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（不存在时自动创建并建表）
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = open_shared_connection(&db_path).map_err(|e| e.to_string())?;

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let repos = CollectionRepositories::from_connection(conn.clone());
        let notification_repo = Arc::new(NotificationRepository::from_connection(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let config: Arc<dyn CollectionConfigReader> = config_manager.clone();

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let market_prices = Arc::new(MarketPriceProvider::new(config.clone()));
        let notifier: Arc<dyn NotificationSink> =
            Arc::new(PersistentNotificationSink::new(notification_repo.clone()));

        let validator = Arc::new(CollectionValidator::new(
            repos.clone(),
            config.clone(),
            market_prices.clone(),
        ));
        let recorder = Arc::new(CollectionRecorder::new(
            repos.clone(),
            validator.clone(),
            notifier,
            config.clone(),
        ));
        let reporting = Arc::new(ReportingEngine::new(repos.clone(), config));
        let advisor = Arc::new(RouteAdvisor::new(repos.clone()));

        // ==========================================
        // 初始化API层
        // ==========================================
        let collection_api = Arc::new(CollectionApi::new(
            recorder,
            validator,
            market_prices,
            notification_repo,
        ));
        let report_api = Arc::new(ReportApi::new(reporting));
        let route_api = Arc::new(RouteApi::new(advisor));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            collection_api,
            report_api,
            route_api,
            config_manager,
            repos,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 EGG_COLLECTION_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("EGG_COLLECTION_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./egg_collection.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("egg-collection-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("egg-collection");
        }

        // 目录创建失败时由打开数据库报错
        std::fs::create_dir_all(&path).ok();
        path = path.join("egg_collection.db");
    }

    path.to_string_lossy().to_string()
}
