// ==========================================
// 农产品收银系统 - 收蛋线路 API
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::report::OptimizedRoute;
use crate::engine::route_advisor::RouteAdvisor;

pub struct RouteApi {
    advisor: Arc<RouteAdvisor>,
}

impl RouteApi {
    pub fn new(advisor: Arc<RouteAdvisor>) -> Self {
        Self { advisor }
    }

    /// 线路拜访顺序建议
    pub fn optimize_route(&self, route_id: &str) -> ApiResult<OptimizedRoute> {
        if route_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("线路ID不能为空".to_string()));
        }
        Ok(self.advisor.optimize_route(route_id)?)
    }
}
