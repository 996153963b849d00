// ==========================================
// 引擎集成测试环境
// ==========================================
// 职责: 临时数据库 + 仓储 + 引擎的一站式组装
// ==========================================

use std::sync::Arc;

use egg_collection::domain::collection::EggCollection;
use egg_collection::domain::party::{CollectionRoute, Customer, Staff};
use egg_collection::engine::{
    CollectionRecorder, CollectionRepositories, CollectionValidator, MarketPriceProvider,
    NoOpNotificationSink, NotificationSink, ReportingEngine, RouteAdvisor,
};
use egg_collection::repository::NotificationRepository;
use tempfile::NamedTempFile;

use super::mock_config::MockConfig;
use super::test_helpers::{create_test_db, open_shared_connection};

pub struct TestEnv {
    pub _temp_file: NamedTempFile,
    pub db_path: String,
    pub repos: CollectionRepositories,
    pub notification_repo: Arc<NotificationRepository>,
    pub market_prices: Arc<MarketPriceProvider>,
    pub validator: Arc<CollectionValidator>,
    pub recorder: CollectionRecorder,
    pub reporting: ReportingEngine,
    pub advisor: RouteAdvisor,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with(MockConfig::default(), Arc::new(NoOpNotificationSink))
    }

    pub fn with_sink(sink: Arc<dyn NotificationSink>) -> Self {
        Self::with(MockConfig::default(), sink)
    }

    pub fn with(config: MockConfig, sink: Arc<dyn NotificationSink>) -> Self {
        let (temp_file, db_path) = create_test_db().expect("无法创建测试数据库");
        let conn = open_shared_connection(&db_path).expect("无法打开测试数据库");

        let repos = CollectionRepositories::from_connection(conn.clone());
        let notification_repo = Arc::new(NotificationRepository::from_connection(conn));

        let config: Arc<dyn egg_collection::config::CollectionConfigReader> = Arc::new(config);
        let market_prices = Arc::new(MarketPriceProvider::new(config.clone()));
        let validator = Arc::new(CollectionValidator::new(
            repos.clone(),
            config.clone(),
            market_prices.clone(),
        ));
        let recorder =
            CollectionRecorder::new(repos.clone(), validator.clone(), sink, config.clone());
        let reporting = ReportingEngine::new(repos.clone(), config);
        let advisor = RouteAdvisor::new(repos.clone());

        Self {
            _temp_file: temp_file,
            db_path,
            repos,
            notification_repo,
            market_prices,
            validator,
            recorder,
            reporting,
            advisor,
        }
    }

    pub fn seed_farmer(&self, farmer: Customer) {
        self.repos.customer_repo.insert(&farmer).expect("插入养殖户失败");
    }

    pub fn seed_staff(&self, staff: Staff) {
        self.repos.staff_repo.insert(&staff).expect("插入员工失败");
    }

    pub fn seed_route(&self, route: CollectionRoute) {
        self.repos.route_repo.insert(&route).expect("插入线路失败");
    }

    /// 绕过校验直接落库（用于构造历史数据）
    pub fn seed_collection(&self, collection: &EggCollection) {
        self.repos
            .collection_repo
            .insert(collection)
            .expect("插入收购记录失败");
    }

    pub fn farmer(&self, id: &str) -> Customer {
        self.repos
            .customer_repo
            .find_by_id(id)
            .expect("查询养殖户失败")
            .expect("养殖户不存在")
    }

    pub fn staff(&self, id: &str) -> Staff {
        self.repos
            .staff_repo
            .find_by_id(id)
            .expect("查询员工失败")
            .expect("员工不存在")
    }

    pub fn collection_count(&self) -> usize {
        let conn = rusqlite::Connection::open(&self.db_path).expect("无法打开数据库");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM egg_collection", [], |row| row.get(0))
            .expect("计数失败");
        count as usize
    }

    /// 绕过仓储直接执行 SQL（用于构造异常数据）
    pub fn execute_raw(&self, sql: &str) {
        let conn = rusqlite::Connection::open(&self.db_path).expect("无法打开数据库");
        conn.execute_batch(sql).expect("执行SQL失败");
    }
}
