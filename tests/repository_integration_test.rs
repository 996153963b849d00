// ==========================================
// Repository 层集成测试
// ==========================================
// 测试目标: 验证各仓储的持久化、相对更新与事务行为
// ==========================================

mod helpers;

use std::sync::Arc;

use egg_collection::domain::collection::{EggCollection, HenEggs};
use egg_collection::domain::notification::QualityAlert;
use egg_collection::domain::party::{EggProduction, PerformanceMetrics};
use egg_collection::domain::payment::{Payment, EGG_COLLECTION_PAYMENT_TYPE};
use egg_collection::domain::types::{CustomerType, NotificationType, PaymentMethod, Species};
use egg_collection::engine::{NotificationSink, PersistentNotificationSink};
use egg_collection::logging;
use egg_collection::repository::RepositoryError;
use helpers::test_data_builder::*;
use helpers::test_env::TestEnv;

fn payment_for(collection: &EggCollection) -> Payment {
    Payment {
        id: format!("P-{}", collection.id),
        customer_id: collection.farmer_id.clone(),
        collection_id: Some(collection.id.clone()),
        amount: collection.total_value,
        payment_method: PaymentMethod::Cash,
        payment_type: EGG_COLLECTION_PAYMENT_TYPE.to_string(),
        staff_id: "S1".to_string(),
        payment_date: ts(2026, 5, 2, 10, 0),
        notes: Some("weekly settlement".to_string()),
    }
}

// ==========================================
// 客户 / 员工 / 线路
// ==========================================

#[test]
fn test_customer_roundtrip_and_relative_sale() {
    logging::init_test();
    let env = TestEnv::new();
    env.seed_farmer(
        FarmerBuilder::new("F1")
            .business_name("Green Acres")
            .credit_balance(100.0)
            .expected(80.0, 10.0)
            .build(),
    );

    let farmer = env.farmer("F1");
    assert_eq!(farmer.display_name(), "Green Acres");
    assert_eq!(farmer.customer_type, CustomerType::Farmer);
    assert_eq!(farmer.egg_production, EggProduction { hen_eggs: 80.0, duck_eggs: 10.0 });

    let customers = &env.repos.customer_repo;
    customers.apply_egg_sale("F1", 30.0).unwrap();
    customers.apply_egg_sale("F1", 12.5).unwrap();

    let farmer = env.farmer("F1");
    assert!((farmer.credit_balance - 57.5).abs() < 1e-9);
    assert!((farmer.total_egg_sales - 42.5).abs() < 1e-9);

    customers
        .update_egg_production("F1", &EggProduction { hen_eggs: 95.0, duck_eggs: 0.0 })
        .unwrap();
    assert_eq!(env.farmer("F1").egg_production.hen_eggs, 95.0);

    assert!(matches!(
        customers.apply_egg_sale("GHOST", 1.0),
        Err(RepositoryError::NotFound { .. })
    ));
}

#[test]
fn test_list_active_farmers_filters_type_and_status() {
    let env = TestEnv::new();
    env.seed_farmer(FarmerBuilder::new("F1").build());
    env.seed_farmer(FarmerBuilder::new("F2").inactive().build());
    env.seed_farmer(FarmerBuilder::new("W1").customer_type(CustomerType::Wholesale).build());

    let farmers = env.repos.customer_repo.list_active_farmers().unwrap();

    assert_eq!(farmers.len(), 1);
    assert_eq!(farmers[0].id, "F1");
}

#[test]
fn test_staff_permissions_and_metrics() {
    let env = TestEnv::new();
    env.seed_staff(StaffBuilder::new("S1").build());
    env.seed_staff(StaffBuilder::new("S2").without_collection_permission().build());

    assert!(env.staff("S1").can_collect_eggs());
    assert!(!env.staff("S2").can_collect_eggs());

    let metrics = PerformanceMetrics {
        total_collections: 12,
        average_quality: 4.25,
        on_time_rate: 95.0,
    };
    env.repos
        .staff_repo
        .update_performance_metrics("S1", &metrics)
        .unwrap();
    assert_eq!(env.staff("S1").performance_metrics, metrics);

    assert!(env.repos.staff_repo.find_by_id("NOBODY").unwrap().is_none());
}

#[test]
fn test_route_keeps_farmer_order() {
    let env = TestEnv::new();
    env.seed_route(route("R1", &["F3", "F1", "F2"]));
    let mut inactive = route("R2", &["F1"]);
    inactive.active = false;
    env.seed_route(inactive);

    let loaded = env.repos.route_repo.find_by_id("R1").unwrap().unwrap();
    assert_eq!(loaded.farmer_ids, vec!["F3", "F1", "F2"]);
    assert!(loaded.contains_farmer("F2"));

    let active = env.repos.route_repo.list_active().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, "R1");
}

// ==========================================
// 收购记录
// ==========================================

#[test]
fn test_collection_roundtrip_and_range_queries() {
    let env = TestEnv::new();
    env.seed_farmer(FarmerBuilder::new("F1").build());
    env.seed_staff(StaffBuilder::new("S1").build());
    env.seed_route(route("R1", &["F1"]));

    let (hen, duck) = sample_eggs();
    let request = RequestBuilder::new("F1", "S1")
        .route("R1")
        .hen(hen)
        .duck(duck)
        .prices(2.5, 4.0)
        .notes("dusty shells")
        .build();
    let created = ts(2026, 5, 1, 7, 45);
    let original = EggCollection::from_request("C1".to_string(), &request, created, created);
    env.seed_collection(&original);

    let loaded = env.repos.collection_repo.find_by_id("C1").unwrap().unwrap();
    assert_eq!(loaded.hen_eggs, hen);
    assert_eq!(loaded.duck_eggs, duck);
    assert_eq!(loaded.total_hen_eggs, 126);
    assert_eq!(loaded.total_duck_eggs, 38);
    assert!((loaded.total_value - original.total_value).abs() < 1e-9);
    assert_eq!(loaded.collection_date, created);
    assert_eq!(loaded.quality_notes.as_deref(), Some("dusty shells"));
    assert!(!loaded.paid && !loaded.synced);

    let repo = &env.repos.collection_repo;
    let day_start = ts(2026, 5, 1, 0, 0);
    let day_end = ts(2026, 5, 1, 23, 59);
    assert_eq!(repo.find_by_farmer_in_range("F1", day_start, day_end).unwrap().len(), 1);
    assert_eq!(repo.find_by_staff_in_range("S1", day_start, day_end).unwrap().len(), 1);
    assert_eq!(repo.find_by_route_in_range("R1", day_start, day_end).unwrap().len(), 1);
    assert!(repo
        .find_by_farmer_in_range("F1", ts(2026, 5, 2, 0, 0), ts(2026, 5, 3, 0, 0))
        .unwrap()
        .is_empty());
}

#[test]
fn test_collection_requires_known_farmer() {
    let env = TestEnv::new();
    env.seed_staff(StaffBuilder::new("S1").build());

    let request = RequestBuilder::new("GHOST", "S1").build();
    let at = ts(2026, 5, 1, 8, 0);
    let result = env
        .repos
        .collection_repo
        .insert(&EggCollection::from_request("C1".to_string(), &request, at, at));

    assert!(result.is_err());
    assert_eq!(env.collection_count(), 0);
}

// ==========================================
// 付款
// ==========================================

#[test]
fn test_collection_payment_is_transactional() {
    let env = TestEnv::new();
    env.seed_farmer(FarmerBuilder::new("F1").build());
    env.seed_staff(StaffBuilder::new("S1").build());
    let at = ts(2026, 5, 1, 8, 0);
    let collection = EggCollection::from_request(
        "C1".to_string(),
        &RequestBuilder::new("F1", "S1")
            .hen(HenEggs { large: 24, ..Default::default() })
            .build(),
        at,
        at,
    );
    env.seed_collection(&collection);

    let payments = &env.repos.payment_repo;
    payments.insert_collection_payment(&payment_for(&collection)).unwrap();

    let paid = env.repos.collection_repo.find_by_id("C1").unwrap().unwrap();
    assert!(paid.paid);
    assert_eq!(paid.payment_date, Some(ts(2026, 5, 2, 10, 0)));

    // 二次付款被拒绝，付款表不新增
    let mut again = payment_for(&collection);
    again.id = "P-C1-again".to_string();
    assert!(matches!(
        payments.insert_collection_payment(&again),
        Err(RepositoryError::NotFound { .. })
    ));

    let stored = payments.find_by_customer("F1").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].notes.as_deref(), Some("weekly settlement"));
    assert!((stored[0].amount - 6.0).abs() < 1e-9);

    let mut detached = payment_for(&collection);
    detached.collection_id = None;
    assert!(matches!(
        payments.insert_collection_payment(&detached),
        Err(RepositoryError::FieldValueError { .. })
    ));
}

// ==========================================
// 通知
// ==========================================

#[test]
fn test_persistent_sink_and_notification_repo() {
    let env = TestEnv::new();
    let sink = PersistentNotificationSink::new(Arc::clone(&env.notification_repo));

    let alert = QualityAlert {
        collection_id: "C1".to_string(),
        farmer_id: "F1".to_string(),
        farmer_name: "Green Acres".to_string(),
        species: Species::Duck,
        damage_rate: 0.25,
        threshold: 0.10,
        quality_notes: None,
    };
    sink.send_quality_alert(&alert).unwrap();

    let unread = env.notification_repo.list_unread().unwrap();
    assert_eq!(unread.len(), 1);
    let n = &unread[0];
    assert_eq!(n.notification_type, NotificationType::QualityAlert);
    assert_eq!(n.title, "Egg quality alert: Green Acres");
    assert!(n.message.contains("25.0%"));
    let payload = n.payload_json.as_ref().unwrap();
    assert_eq!(payload["collectionId"], "C1");
    assert_eq!(payload["species"], "DUCK");

    env.notification_repo.mark_read(&n.id).unwrap();
    assert!(env.notification_repo.list_unread().unwrap().is_empty());
    assert!(matches!(
        env.notification_repo.mark_read("missing"),
        Err(RepositoryError::NotFound { .. })
    ));
}

// ==========================================
// 异常数据
// ==========================================

fn assert_field_error<T: std::fmt::Debug>(result: Result<T, RepositoryError>, column: &str) {
    match result {
        Err(RepositoryError::FieldValueError { field, .. }) => assert_eq!(field, column),
        other => panic!("Expected FieldValueError on {}, got {:?}", column, other),
    }
}

#[test]
fn test_malformed_columns_surface_as_field_errors() {
    let env = TestEnv::new();
    env.seed_farmer(FarmerBuilder::new("F1").build());
    env.seed_staff(StaffBuilder::new("S1").build());
    env.seed_route(route("R1", &["F1"]));

    env.execute_raw(
        "UPDATE customer SET customer_type = 'VIP' WHERE id = 'F1';
         UPDATE staff SET permissions = 'collect_eggs' WHERE id = 'S1';
         UPDATE collection_route SET farmer_ids = '[\"F1\"' WHERE id = 'R1';",
    );

    assert_field_error(env.repos.customer_repo.find_by_id("F1"), "column 1");
    assert_field_error(env.repos.staff_repo.find_by_id("S1"), "column 3");
    assert_field_error(env.repos.route_repo.find_by_id("R1"), "column 2");
    assert_field_error(env.repos.route_repo.list_active(), "column 2");
}

#[test]
fn test_malformed_payment_and_notification_rows() {
    let env = TestEnv::new();
    env.seed_farmer(FarmerBuilder::new("F1").build());
    env.seed_staff(StaffBuilder::new("S1").build());
    let at = ts(2026, 5, 1, 8, 0);
    let collection =
        EggCollection::from_request("C1".to_string(), &RequestBuilder::new("F1", "S1").build(), at, at);
    env.seed_collection(&collection);
    env.repos
        .payment_repo
        .insert_collection_payment(&payment_for(&collection))
        .unwrap();

    let sink = PersistentNotificationSink::new(Arc::clone(&env.notification_repo));
    sink.send_quality_alert(&QualityAlert {
        collection_id: "C1".to_string(),
        farmer_id: "F1".to_string(),
        farmer_name: "Farmer F1".to_string(),
        species: Species::Hen,
        damage_rate: 0.2,
        threshold: 0.1,
        quality_notes: None,
    })
    .unwrap();

    env.execute_raw(
        "UPDATE payment SET payment_method = 'BARTER';
         UPDATE notification SET notification_type = 'SYNC_ALERT';",
    );

    assert_field_error(env.repos.payment_repo.find_by_customer("F1"), "column 4");
    assert_field_error(env.notification_repo.list_unread(), "column 1");
}
