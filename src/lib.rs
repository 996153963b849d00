// ==========================================
// 农产品收银系统 - 鸡蛋收购核心库
// ==========================================
// 技术栈: Rust + SQLite + tokio
// 业务范围: 收购校验、登记、质量/产量告警、报表汇总、线路建议、行情
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CustomerType, NotificationType, PaymentMethod, Species};

// 领域实体
pub use domain::{
    BatchPaymentResult, CollectionRoute, Customer, DailyReport, DuckEggs, EggCollection,
    HenEggs, MarketPrices, NewCollectionRequest, OptimizedRoute, PeriodSummary, Staff,
};

// 引擎
pub use engine::{
    CollectionRecorder, CollectionValidator, MarketPriceProvider, QualityEngine,
    ReportingEngine, RouteAdvisor,
};

// API
pub use api::{CollectionApi, ReportApi, RouteApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "农产品收银系统 - 鸡蛋收购";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
