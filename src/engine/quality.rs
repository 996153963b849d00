// ==========================================
// 农产品收银系统 - 质量与产量告警引擎
// ==========================================
// 职责: 收购质量分、破损率告警、产量不足告警
// 输入: 收购记录 + 养殖户快照 + 告警阈值
// 输出: 质量分 / 告警载荷（发送由调用方负责）
// ==========================================

use crate::config::AlertThresholds;
use crate::domain::collection::EggCollection;
use crate::domain::notification::{ProductionAlert, QualityAlert};
use crate::domain::party::Customer;
use crate::domain::types::Species;

/// 质量分档位: (破损率上限, 分数)，超出全部档位为 1 分
const QUALITY_BANDS: [(f64, u8); 4] = [(0.02, 5), (0.05, 4), (0.10, 3), (0.20, 2)];

/// 破损率 -> 质量分 (1-5)，随破损率单调不增
pub fn quality_score(damage_rate: f64) -> u8 {
    QUALITY_BANDS
        .iter()
        .find(|(limit, _)| damage_rate <= *limit)
        .map(|(_, score)| *score)
        .unwrap_or(1)
}

/// 单次收购质量分；0 枚时无定义
pub fn collection_quality_score(collection: &EggCollection) -> Option<u8> {
    collection.overall_damage_rate().map(quality_score)
}

/// 平均质量分（跳过无定义的记录；无记录时为 0）
pub fn average_quality(collections: &[EggCollection]) -> f64 {
    let scores: Vec<f64> = collections
        .iter()
        .filter_map(collection_quality_score)
        .map(f64::from)
        .collect();
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

// ==========================================
// QualityEngine - 告警判定
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityEngine {
    thresholds: AlertThresholds,
}

impl QualityEngine {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    /// 任一蛋种破损率超过阈值时生成质量告警，取较高破损率
    pub fn quality_alert(&self, collection: &EggCollection, farmer_name: &str) -> Option<QualityAlert> {
        let hen_rate = collection.hen_eggs.damage_rate();
        let duck_rate = collection.duck_eggs.damage_rate();
        let threshold = self.thresholds.damage_alert_threshold;

        if hen_rate <= threshold && duck_rate <= threshold {
            return None;
        }

        let (species, damage_rate) = if hen_rate >= duck_rate {
            (Species::Hen, hen_rate)
        } else {
            (Species::Duck, duck_rate)
        };

        Some(QualityAlert {
            collection_id: collection.id.clone(),
            farmer_id: collection.farmer_id.clone(),
            farmer_name: farmer_name.to_string(),
            species,
            damage_rate,
            threshold,
            quality_notes: collection.quality_notes.clone(),
        })
    }

    /// 预期产量已知且任一蛋种实收低于预期比例时生成产量告警
    ///
    /// `farmer` 为登记前的养殖户快照
    pub fn production_alert(
        &self,
        collection: &EggCollection,
        farmer: &Customer,
    ) -> Option<ProductionAlert> {
        let expected = farmer.egg_production;
        if !expected.is_known() {
            return None;
        }

        let ratio = self.thresholds.production_shortfall_ratio;
        let mut short_species = Vec::new();
        if (collection.total_hen_eggs as f64) < expected.hen_eggs * ratio {
            short_species.push(Species::Hen);
        }
        if (collection.total_duck_eggs as f64) < expected.duck_eggs * ratio {
            short_species.push(Species::Duck);
        }

        if short_species.is_empty() {
            return None;
        }

        Some(ProductionAlert {
            collection_id: collection.id.clone(),
            farmer_id: farmer.id.clone(),
            farmer_name: farmer.display_name().to_string(),
            expected,
            actual_hen_eggs: collection.total_hen_eggs,
            actual_duck_eggs: collection.total_duck_eggs,
            short_species,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collection::{DuckEggs, HenEggs, NewCollectionRequest};
    use crate::domain::party::EggProduction;
    use crate::domain::types::CustomerType;
    use chrono::NaiveDate;

    fn collection(hen: HenEggs, duck: DuckEggs) -> EggCollection {
        let ts = NaiveDate::from_ymd_opt(2026, 5, 4)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let request = NewCollectionRequest {
            farmer_id: "F1".to_string(),
            staff_id: "S1".to_string(),
            route_id: None,
            hen_eggs: hen,
            duck_eggs: duck,
            hen_egg_price: 2.5,
            duck_egg_price: 4.0,
            quality_notes: Some("cracked trays".to_string()),
            collection_date: Some(ts),
        };
        EggCollection::from_request("C1".to_string(), &request, ts, ts)
    }

    fn farmer(expected: EggProduction) -> Customer {
        let ts = NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Customer {
            id: "F1".to_string(),
            customer_type: CustomerType::Farmer,
            contact_person: "Kofi".to_string(),
            business_name: Some("Sunrise Farm".to_string()),
            phone: None,
            active: true,
            credit_limit: 0.0,
            credit_balance: 0.0,
            egg_production: expected,
            total_egg_sales: 0.0,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_quality_score_bands() {
        let scores: Vec<u8> = [0.01, 0.04, 0.08, 0.15, 0.5]
            .iter()
            .map(|r| quality_score(*r))
            .collect();
        assert_eq!(scores, vec![5, 4, 3, 2, 1]);

        // 边界值归入较高档
        assert_eq!(quality_score(0.02), 5);
        assert_eq!(quality_score(0.10), 3);
        assert_eq!(quality_score(0.20), 2);
    }

    #[test]
    fn test_average_quality_empty_is_zero() {
        assert_eq!(average_quality(&[]), 0.0);
    }

    #[test]
    fn test_average_quality_mean_of_scores() {
        let clean = collection(HenEggs { large: 100, ..Default::default() }, DuckEggs::default());
        let broken = collection(
            HenEggs { large: 70, damaged: 30, ..Default::default() },
            DuckEggs::default(),
        );
        assert!((average_quality(&[clean, broken]) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_quality_alert_uses_higher_species_rate() {
        let engine = QualityEngine::default();
        let c = collection(
            HenEggs { large: 88, damaged: 12, ..Default::default() },
            DuckEggs { large: 8, damaged: 2, ..Default::default() },
        );
        let alert = engine.quality_alert(&c, "Sunrise Farm").expect("should alert");
        assert_eq!(alert.species, Species::Duck);
        assert!((alert.damage_rate - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_no_quality_alert_at_threshold() {
        let engine = QualityEngine::default();
        let c = collection(
            HenEggs { large: 90, damaged: 10, ..Default::default() },
            DuckEggs::default(),
        );
        assert!(engine.quality_alert(&c, "x").is_none());
    }

    #[test]
    fn test_production_alert() {
        let engine = QualityEngine::default();
        let c = collection(HenEggs { large: 40, ..Default::default() }, DuckEggs { large: 30, ..Default::default() });

        let alert = engine
            .production_alert(&c, &farmer(EggProduction { hen_eggs: 100.0, duck_eggs: 40.0 }))
            .expect("hen shortfall");
        assert_eq!(alert.short_species, vec![Species::Hen]);
        assert_eq!(alert.actual_duck_eggs, 30);

        assert!(engine
            .production_alert(&c, &farmer(EggProduction::default()))
            .is_none());
    }
}
