// ==========================================
// 农产品收银系统 - API 层
// ==========================================
// 职责: 提供收蛋业务 API 接口，供界面/命令行调用
// ==========================================

pub mod collection_api;
pub mod error;
pub mod report_api;
pub mod route_api;

// 重导出核心类型
pub use collection_api::CollectionApi;
pub use error::{ApiError, ApiResult};
pub use report_api::{date_range, parse_date, ReportApi};
pub use route_api::RouteApi;
