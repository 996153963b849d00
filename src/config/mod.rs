// ==========================================
// 农产品收银系统 - 配置层
// ==========================================
// 职责: 系统配置管理
// 存储: config_kv 表
// ==========================================

pub mod collection_config_trait;
pub mod config_manager;

// 重导出核心配置管理器
pub use collection_config_trait::{
    AlertThresholds, CollectionConfigReader, ConfigResult, MarketPriceSettings, ValidationLimits,
};
pub use config_manager::{config_keys, ConfigManager, DEFAULT_STATS_WINDOW_DAYS};
