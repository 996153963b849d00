// ==========================================
// 农产品收银系统 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合收蛋引擎所需的所有 Repository
// 目标: 减少各引擎构造函数参数数量
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::repository::{
    CustomerRepository, EggCollectionRepository, PaymentRepository, RouteRepository,
    StaffRepository,
};

/// 收蛋引擎仓储集合
///
/// # 包含的仓储
/// - `customer_repo`: 养殖户
/// - `staff_repo`: 收蛋员
/// - `route_repo`: 收蛋线路
/// - `collection_repo`: 收购记录
/// - `payment_repo`: 付款记录
#[derive(Clone)]
pub struct CollectionRepositories {
    pub customer_repo: Arc<CustomerRepository>,
    pub staff_repo: Arc<StaffRepository>,
    pub route_repo: Arc<RouteRepository>,
    pub collection_repo: Arc<EggCollectionRepository>,
    pub payment_repo: Arc<PaymentRepository>,
}

impl CollectionRepositories {
    pub fn new(
        customer_repo: Arc<CustomerRepository>,
        staff_repo: Arc<StaffRepository>,
        route_repo: Arc<RouteRepository>,
        collection_repo: Arc<EggCollectionRepository>,
        payment_repo: Arc<PaymentRepository>,
    ) -> Self {
        Self {
            customer_repo,
            staff_repo,
            route_repo,
            collection_repo,
            payment_repo,
        }
    }

    /// 所有仓储共享同一连接
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            customer_repo: Arc::new(CustomerRepository::from_connection(conn.clone())),
            staff_repo: Arc::new(StaffRepository::from_connection(conn.clone())),
            route_repo: Arc::new(RouteRepository::from_connection(conn.clone())),
            collection_repo: Arc::new(EggCollectionRepository::from_connection(conn.clone())),
            payment_repo: Arc::new(PaymentRepository::from_connection(conn)),
        }
    }
}
