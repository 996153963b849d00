// ==========================================
// 农产品收银系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、推导规则
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod collection;
pub mod market;
pub mod notification;
pub mod party;
pub mod payment;
pub mod report;
pub mod types;

// 重导出核心类型
pub use collection::{
    collection_value, DuckEggs, EggCollection, HenEggs, NewCollectionRequest, EGGS_PER_DOZEN,
};
pub use market::{DuckEggPrices, HenEggPrices, MarketPrices};
pub use notification::{Notification, ProductionAlert, QualityAlert};
pub use party::{Customer, CollectionRoute, EggProduction, PerformanceMetrics, Staff};
pub use payment::{BatchPaymentResult, Payment, PaymentFailure, EGG_COLLECTION_PAYMENT_TYPE};
pub use report::{
    DailyReport, FarmerPerformance, OptimizedRoute, OutstandingBalance, PeriodSummary,
    QualityIssue, RoutePerformance, RouteStop, TopFarm,
};
pub use types::{CustomerType, NotificationType, PaymentMethod, Species, EGG_COLLECTION_PERMISSION};
