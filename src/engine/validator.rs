// ==========================================
// 农产品收银系统 - 收购登记校验器
// ==========================================
// 职责:
// 1. 硬校验（按顺序，命中即终止）: 养殖户 → 收蛋员 → 线路 → 数量 → 单价
// 2. 软校验（仅告警）: 超预期产量
// 3. 预提交校验: 返回结构化 {is_valid, warnings, errors}，不抛错
// ==========================================

use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::config::{CollectionConfigReader, ValidationLimits};
use crate::domain::collection::NewCollectionRequest;
use crate::domain::party::{CollectionRoute, Customer, Staff};
use crate::engine::error::{CollectionRejection, EngineResult};
use crate::engine::market_price::MarketPriceProvider;
use crate::engine::repositories::CollectionRepositories;
use crate::engine::window::day_bounds;

/// 硬校验通过后的上下文（登记前快照）
#[derive(Debug, Clone)]
pub struct ValidatedCollection {
    pub farmer: Customer,
    pub staff: Staff,
    pub route: Option<CollectionRoute>,
    pub warnings: Vec<String>,
}

/// 预提交校验结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

// ==========================================
// CollectionValidator - 收购登记校验器
// ==========================================
pub struct CollectionValidator {
    repos: CollectionRepositories,
    config: Arc<dyn CollectionConfigReader>,
    market_prices: Arc<MarketPriceProvider>,
}

impl CollectionValidator {
    pub fn new(
        repos: CollectionRepositories,
        config: Arc<dyn CollectionConfigReader>,
        market_prices: Arc<MarketPriceProvider>,
    ) -> Self {
        Self {
            repos,
            config,
            market_prices,
        }
    }

    /// 硬校验
    ///
    /// # 返回
    /// - Ok(ValidatedCollection): 校验通过（附带软告警）
    /// - Err(EngineError::Validation): 第一条失败原因
    pub async fn validate(&self, request: &NewCollectionRequest) -> EngineResult<ValidatedCollection> {
        // 1. 养殖户
        let farmer = self
            .repos
            .customer_repo
            .find_by_id(&request.farmer_id)?
            .filter(Customer::is_active_farmer)
            .ok_or_else(|| CollectionRejection::InvalidFarmer {
                farmer_id: request.farmer_id.clone(),
            })?;

        // 2. 收蛋员
        let staff = self
            .repos
            .staff_repo
            .find_by_id(&request.staff_id)?
            .filter(Staff::can_collect_eggs)
            .ok_or_else(|| CollectionRejection::UnauthorizedStaff {
                staff_id: request.staff_id.clone(),
            })?;

        // 3. 线路
        let route = match request.route_id.as_deref() {
            Some(route_id) => Some(
                self.repos
                    .route_repo
                    .find_by_id(route_id)?
                    .filter(|r| r.active && r.contains_farmer(&request.farmer_id))
                    .ok_or_else(|| CollectionRejection::InvalidRoute {
                        route_id: route_id.to_string(),
                        farmer_id: request.farmer_id.clone(),
                    })?,
            ),
            None => None,
        };

        // 4. 数量
        if request.total_eggs() == 0 {
            return Err(CollectionRejection::EmptyCollection.into());
        }

        // 5. 单价
        check_prices(request)?;

        // 6. 超预期产量（仅告警）
        let limits = self.validation_limits().await;
        let warnings = overproduction_warnings(request, &farmer, &limits);
        for w in &warnings {
            tracing::warn!(farmer_id = %farmer.id, "{}", w);
        }

        Ok(ValidatedCollection {
            farmer,
            staff,
            route,
            warnings,
        })
    }

    /// 预提交校验（供界面即时反馈）
    ///
    /// 与硬校验规则一致，但收集全部错误而非首条即止，并附加合理性告警
    pub async fn validate_collection_data(
        &self,
        request: &NewCollectionRequest,
    ) -> EngineResult<ValidationReport> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let limits = self.validation_limits().await;

        let farmer = self
            .repos
            .customer_repo
            .find_by_id(&request.farmer_id)?
            .filter(Customer::is_active_farmer);
        match &farmer {
            Some(farmer) => warnings.extend(overproduction_warnings(request, farmer, &limits)),
            None => errors.push(
                CollectionRejection::InvalidFarmer {
                    farmer_id: request.farmer_id.clone(),
                }
                .to_string(),
            ),
        }

        let staff_ok = self
            .repos
            .staff_repo
            .find_by_id(&request.staff_id)?
            .map(|s| s.can_collect_eggs())
            .unwrap_or(false);
        if !staff_ok {
            errors.push(
                CollectionRejection::UnauthorizedStaff {
                    staff_id: request.staff_id.clone(),
                }
                .to_string(),
            );
        }

        if let Some(route_id) = request.route_id.as_deref() {
            let route_ok = self
                .repos
                .route_repo
                .find_by_id(route_id)?
                .map(|r| r.active && r.contains_farmer(&request.farmer_id))
                .unwrap_or(false);
            if !route_ok {
                errors.push(
                    CollectionRejection::InvalidRoute {
                        route_id: route_id.to_string(),
                        farmer_id: request.farmer_id.clone(),
                    }
                    .to_string(),
                );
            }
        }

        let total_eggs = request.total_eggs();
        if total_eggs == 0 {
            errors.push(CollectionRejection::EmptyCollection.to_string());
        }
        if let Err(rejection) = check_prices(request) {
            errors.push(rejection.to_string());
        }

        // ===== 合理性告警 =====
        if total_eggs > limits.max_plausible_eggs {
            warnings.push(format!(
                "Unusually large collection: {} eggs exceeds {}",
                total_eggs, limits.max_plausible_eggs
            ));
        }

        let hen_rate = request.hen_eggs.damage_rate();
        if hen_rate > limits.advisory_damage_threshold {
            warnings.push(format!("High hen egg damage rate: {:.1}%", hen_rate * 100.0));
        }
        let duck_rate = request.duck_eggs.damage_rate();
        if duck_rate > limits.advisory_damage_threshold {
            warnings.push(format!("High duck egg damage rate: {:.1}%", duck_rate * 100.0));
        }

        let market = self.market_prices.current_prices().await;
        let hen_floor = market.hen_eggs.large * limits.min_price_ratio;
        if request.hen_egg_price > 0.0 && request.hen_egg_price < hen_floor {
            warnings.push(format!(
                "Hen egg price {:.2} is well below market price {:.2}",
                request.hen_egg_price, market.hen_eggs.large
            ));
        }
        let duck_floor = market.duck_eggs.large * limits.min_price_ratio;
        if request.duck_egg_price > 0.0 && request.duck_egg_price < duck_floor {
            warnings.push(format!(
                "Duck egg price {:.2} is well below market price {:.2}",
                request.duck_egg_price, market.duck_eggs.large
            ));
        }

        // 同日重复收购
        let day = request
            .collection_date
            .unwrap_or_else(|| Local::now().naive_local())
            .date();
        let (start, end) = day_bounds(day);
        let same_day = self
            .repos
            .collection_repo
            .find_by_farmer_in_range(&request.farmer_id, start, end)?;
        if !same_day.is_empty() {
            warnings.push(format!(
                "Farmer already has {} collection(s) recorded on {}",
                same_day.len(),
                day
            ));
        }

        Ok(ValidationReport {
            is_valid: errors.is_empty(),
            warnings,
            errors,
        })
    }

    async fn validation_limits(&self) -> ValidationLimits {
        match self.config.get_validation_limits().await {
            Ok(limits) => limits,
            Err(e) => {
                tracing::warn!("读取校验配置失败，使用默认值: {}", e);
                ValidationLimits::default()
            }
        }
    }
}

/// 单价必须为正（NaN 视为无效）
fn check_prices(request: &NewCollectionRequest) -> Result<(), CollectionRejection> {
    let positive = |p: f64| p.is_finite() && p > 0.0;
    if positive(request.hen_egg_price) && positive(request.duck_egg_price) {
        Ok(())
    } else {
        Err(CollectionRejection::InvalidPrice {
            hen_egg_price: request.hen_egg_price,
            duck_egg_price: request.duck_egg_price,
        })
    }
}

/// 实收超过预期日产一定倍数时告警
fn overproduction_warnings(
    request: &NewCollectionRequest,
    farmer: &Customer,
    limits: &ValidationLimits,
) -> Vec<String> {
    let ratio = limits.overproduction_warning_ratio;
    let expected = farmer.egg_production;
    let mut warnings = Vec::new();

    let hen_total = request.hen_eggs.total() as f64;
    if expected.hen_eggs > 0.0 && hen_total > expected.hen_eggs * ratio {
        warnings.push(format!(
            "Hen egg count {} exceeds expected daily production {:.0}",
            hen_total, expected.hen_eggs
        ));
    }
    let duck_total = request.duck_eggs.total() as f64;
    if expected.duck_eggs > 0.0 && duck_total > expected.duck_eggs * ratio {
        warnings.push(format!(
            "Duck egg count {} exceeds expected daily production {:.0}",
            duck_total, expected.duck_eggs
        ));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collection::{DuckEggs, HenEggs};

    fn request(hen_price: f64, duck_price: f64) -> NewCollectionRequest {
        NewCollectionRequest {
            farmer_id: "F1".to_string(),
            staff_id: "S1".to_string(),
            route_id: None,
            hen_eggs: HenEggs { large: 12, ..Default::default() },
            duck_eggs: DuckEggs::default(),
            hen_egg_price: hen_price,
            duck_egg_price: duck_price,
            quality_notes: None,
            collection_date: None,
        }
    }

    #[test]
    fn test_check_prices() {
        assert!(check_prices(&request(2.5, 4.0)).is_ok());
        assert!(matches!(
            check_prices(&request(0.0, 4.0)),
            Err(CollectionRejection::InvalidPrice { .. })
        ));
        assert!(check_prices(&request(2.5, f64::NAN)).is_err());
    }
}
