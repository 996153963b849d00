// ==========================================
// 农产品收银系统 - 线路拜访顺序建议
// ==========================================
// 规则: 按养殖户预期日产量（鸡蛋+鸭蛋）降序排列拜访顺序
// 说明: 启发式排序，不做真实路径规划；时间/里程为每户固定常量
// ==========================================

use crate::domain::report::{OptimizedRoute, RouteStop};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::repositories::CollectionRepositories;

/// 每户估算耗时（分钟），占位常量
pub const MINUTES_PER_FARM: u32 = 20;
/// 每户估算里程（公里），占位常量
pub const KM_PER_FARM: f64 = 3.0;
/// 超过该户数时建议拆分线路
pub const ROUTE_SPLIT_THRESHOLD: usize = 8;

const STANDARD_SUGGESTIONS: [&str; 3] = [
    "Visit high-production farms first to maximize collection volume",
    "Consider time windows when farmers are available",
    "Group nearby farms together to reduce travel time",
];

pub struct RouteAdvisor {
    repos: CollectionRepositories,
}

impl RouteAdvisor {
    pub fn new(repos: CollectionRepositories) -> Self {
        Self { repos }
    }

    /// 线路拜访顺序建议
    ///
    /// 缺失或已停用的养殖户不参与排序
    pub fn optimize_route(&self, route_id: &str) -> EngineResult<OptimizedRoute> {
        let route = self
            .repos
            .route_repo
            .find_by_id(route_id)?
            .ok_or_else(|| EngineError::not_found("CollectionRoute", route_id))?;

        let mut stops = Vec::with_capacity(route.farmer_ids.len());
        for farmer_id in &route.farmer_ids {
            match self.repos.customer_repo.find_by_id(farmer_id)? {
                Some(farmer) if farmer.is_active_farmer() => stops.push(RouteStop {
                    farmer_id: farmer.id.clone(),
                    farmer_name: farmer.display_name().to_string(),
                    expected_daily_eggs: farmer.egg_production.total(),
                }),
                _ => tracing::debug!(route_id = %route_id, farmer_id = %farmer_id, "跳过缺失或停用的养殖户"),
            }
        }

        // 稳定排序: 预期产量相同者保持线路原顺序
        stops.sort_by(|a, b| b.expected_daily_eggs.total_cmp(&a.expected_daily_eggs));

        let farm_count = stops.len();
        let mut suggestions: Vec<String> =
            STANDARD_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
        if farm_count > ROUTE_SPLIT_THRESHOLD {
            suggestions.push(format!(
                "Route has {} farms; consider splitting it into multiple routes",
                farm_count
            ));
        }

        tracing::info!(route_id = %route_id, farms = farm_count, "线路顺序建议已生成");

        Ok(OptimizedRoute {
            route_id: route.id,
            optimized_order: stops,
            estimated_time_minutes: MINUTES_PER_FARM * farm_count as u32,
            estimated_distance_km: KM_PER_FARM * farm_count as f64,
            suggestions,
        })
    }
}
