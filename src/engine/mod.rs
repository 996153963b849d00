// ==========================================
// 农产品收银系统 - 引擎层
// ==========================================
// 职责: 收蛋业务规则（校验、登记、告警、报表、线路建议、行情）
// 约束: 引擎不拼 SQL，数据访问全部经由 repository
// ==========================================

pub mod error;
pub mod market_price;
pub mod notifier;
pub mod quality;
pub mod recorder;
pub mod reporting;
pub mod repositories;
pub mod route_advisor;
pub mod validator;
pub mod window;

// 重导出核心引擎
pub use error::{CollectionRejection, EngineError, EngineResult};
pub use market_price::MarketPriceProvider;
pub use notifier::{
    NoOpNotificationSink, NotificationSink, NotifyResult, PersistentNotificationSink,
    TracingNotificationSink,
};
pub use quality::{average_quality, collection_quality_score, quality_score, QualityEngine};
pub use recorder::{
    CollectionRecorder, RecordOutcome, RouteDaySummary, SideEffectOutcome, SideEffectReport,
    SideEffectTask, PLACEHOLDER_ON_TIME_RATE,
};
pub use reporting::{ReportingEngine, EXPORT_HEADER, PLACEHOLDER_ROUTE_EFFICIENCY};
pub use repositories::CollectionRepositories;
pub use route_advisor::RouteAdvisor;
pub use validator::{CollectionValidator, ValidatedCollection, ValidationReport};
