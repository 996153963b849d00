// ==========================================
// 农产品收银系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 每个实体一个类型化仓储，屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod collection_repo;
pub mod connection;
pub mod customer_repo;
pub mod error;
pub mod notification_repo;
pub mod payment_repo;
pub mod route_repo;
pub mod staff_repo;

// 重导出核心仓储
pub use collection_repo::EggCollectionRepository;
pub use connection::open_shared_connection;
pub use customer_repo::CustomerRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use notification_repo::NotificationRepository;
pub use payment_repo::PaymentRepository;
pub use route_repo::RouteRepository;
pub use staff_repo::StaffRepository;
