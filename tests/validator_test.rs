// ==========================================
// CollectionValidator 集成测试
// ==========================================
// 测试范围:
// 1. validate: 硬校验顺序、超产软告警
// 2. validate_collection_data: 错误全收集、合理性告警
// ==========================================

mod helpers;

use egg_collection::domain::collection::{DuckEggs, EggCollection, HenEggs};
use egg_collection::engine::{CollectionRejection, EngineError};
use helpers::test_data_builder::*;
use helpers::test_env::TestEnv;

fn env() -> TestEnv {
    let env = TestEnv::new();
    env.seed_farmer(FarmerBuilder::new("F1").expected(100.0, 20.0).build());
    env.seed_staff(StaffBuilder::new("S1").build());
    env.seed_route(route("R1", &["F1"]));
    env
}

// ==========================================
// validate
// ==========================================

#[tokio::test]
async fn test_validate_returns_snapshot() {
    let env = env();
    let request = RequestBuilder::new("F1", "S1").route("R1").build();

    let validated = env.validator.validate(&request).await.expect("校验应通过");

    assert_eq!(validated.farmer.id, "F1");
    assert_eq!(validated.staff.id, "S1");
    assert_eq!(validated.route.map(|r| r.id).as_deref(), Some("R1"));
}

#[tokio::test]
async fn test_overproduction_is_warning_only() {
    let env = env();
    // 预期鸡蛋 100，实收 151 > 150
    let request = RequestBuilder::new("F1", "S1")
        .hen(HenEggs { large: 151, ..Default::default() })
        .build();

    let validated = env.validator.validate(&request).await.expect("超产不应阻断");

    assert_eq!(validated.warnings.len(), 1);
    assert!(validated.warnings[0].contains("Hen"));
}

#[tokio::test]
async fn test_duck_price_checked_even_without_duck_eggs() {
    let env = env();
    let request = RequestBuilder::new("F1", "S1").prices(3.0, 0.0).build();

    let result = env.validator.validate(&request).await;

    assert!(matches!(
        result,
        Err(EngineError::Validation(CollectionRejection::InvalidPrice { .. }))
    ));
}

#[tokio::test]
async fn test_staff_checked_before_route() {
    let env = env();
    let request = RequestBuilder::new("F1", "NOBODY").route("NOWHERE").build();

    let result = env.validator.validate(&request).await;

    assert!(matches!(
        result,
        Err(EngineError::Validation(CollectionRejection::UnauthorizedStaff { .. }))
    ));
}

// ==========================================
// validate_collection_data
// ==========================================

#[tokio::test]
async fn test_advisory_check_collects_all_errors() {
    let env = env();
    let request = RequestBuilder::new("NOBODY", "NOBODY")
        .route("NOWHERE")
        .hen(HenEggs::default())
        .prices(0.0, -1.0)
        .build();

    let report = env
        .validator
        .validate_collection_data(&request)
        .await
        .expect("预校验不应抛错");

    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 5);
}

#[tokio::test]
async fn test_advisory_check_clean_request() {
    let env = env();
    let request = RequestBuilder::new("F1", "S1")
        .hen(HenEggs { large: 100, ..Default::default() })
        .duck(DuckEggs { large: 20, ..Default::default() })
        .route("R1")
        .build();

    let report = env.validator.validate_collection_data(&request).await.unwrap();

    assert!(report.is_valid);
    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty(), "unexpected warnings: {:?}", report.warnings);
}

#[tokio::test]
async fn test_advisory_warnings() {
    let env = TestEnv::new();
    env.seed_farmer(FarmerBuilder::new("F1").build());
    env.seed_staff(StaffBuilder::new("S1").build());

    // 1001 枚；鸭蛋破损 25%；鸡蛋单价 1.00 < 3.00 × 0.5
    let request = RequestBuilder::new("F1", "S1")
        .hen(HenEggs { large: 981, ..Default::default() })
        .duck(DuckEggs { large: 15, damaged: 5, ..Default::default() })
        .prices(1.0, 4.0)
        .build();

    let report = env.validator.validate_collection_data(&request).await.unwrap();

    assert!(report.is_valid);
    assert_eq!(report.warnings.len(), 3, "warnings: {:?}", report.warnings);
    assert!(report.warnings.iter().any(|w| w.contains("1001")));
    assert!(report.warnings.iter().any(|w| w.contains("duck egg damage")));
    assert!(report.warnings.iter().any(|w| w.contains("Hen egg price")));
}

#[tokio::test]
async fn test_advisory_warns_on_same_day_duplicate() {
    let env = env();
    let date = ts(2026, 8, 3, 7, 30);
    let earlier = RequestBuilder::new("F1", "S1")
        .hen(HenEggs { large: 100, ..Default::default() })
        .build();
    env.seed_collection(&EggCollection::from_request(
        "C_EARLY".to_string(),
        &earlier,
        date,
        date,
    ));

    let request = RequestBuilder::new("F1", "S1")
        .hen(HenEggs { large: 100, ..Default::default() })
        .at(ts(2026, 8, 3, 16, 0))
        .build();
    let report = env.validator.validate_collection_data(&request).await.unwrap();

    assert!(report.is_valid);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("already has 1 collection"));

    // 次日不再告警
    let next_day = RequestBuilder::new("F1", "S1")
        .hen(HenEggs { large: 100, ..Default::default() })
        .at(ts(2026, 8, 4, 7, 30))
        .build();
    let report = env.validator.validate_collection_data(&next_day).await.unwrap();
    assert!(report.warnings.is_empty());
}
