// ==========================================
// 农产品收银系统 - 收购登记引擎
// ==========================================
// 职责: 校验 → 计算合计/金额 → 落库 → 提交后任务
// 提交后任务（彼此独立，失败不回滚已落库记录）:
//   1. FarmerStats:   赊账余额/累计销售额 + 滚动日均产量
//   2. QualityAlerts: 破损率告警 + 产量不足告警
//   3. RouteMetrics:  线路当日汇总（仅日志）
//   4. StaffMetrics:  收蛋员窗口期绩效
// ==========================================

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Local, SubsecRound};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{AlertThresholds, CollectionConfigReader, DEFAULT_STATS_WINDOW_DAYS};
use crate::domain::collection::{EggCollection, NewCollectionRequest};
use crate::domain::notification::{ProductionAlert, QualityAlert};
use crate::domain::party::{EggProduction, PerformanceMetrics};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::notifier::NotificationSink;
use crate::engine::quality::{average_quality, QualityEngine};
use crate::engine::repositories::CollectionRepositories;
use crate::engine::validator::{CollectionValidator, ValidatedCollection};
use crate::engine::window::{day_bounds, trailing_window};

/// 收蛋员准时率占位值（无真实到达时间数据，非计算值）
pub const PLACEHOLDER_ON_TIME_RATE: f64 = 95.0;

// ==========================================
// 提交后任务报告
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideEffectTask {
    FarmerStats,
    QualityAlerts,
    RouteMetrics,
    StaffMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideEffectOutcome {
    pub task: SideEffectTask,
    /// None 表示成功
    pub error: Option<String>,
}

impl SideEffectOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// 线路当日汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDaySummary {
    pub route_id: String,
    pub collections: u32,
    pub total_value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideEffectReport {
    pub outcomes: Vec<SideEffectOutcome>,
    pub quality_alert: Option<QualityAlert>,
    pub production_alert: Option<ProductionAlert>,
    pub route_day: Option<RouteDaySummary>,
}

impl SideEffectReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(SideEffectOutcome::is_ok)
    }

    pub fn outcome(&self, task: SideEffectTask) -> Option<&SideEffectOutcome> {
        self.outcomes.iter().find(|o| o.task == task)
    }

    pub fn failed_tasks(&self) -> Vec<SideEffectTask> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_ok())
            .map(|o| o.task)
            .collect()
    }

    fn record(&mut self, task: SideEffectTask, result: EngineResult<()>) {
        let error = match result {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(task = ?task, "提交后任务失败（已忽略）: {}", e);
                Some(e.to_string())
            }
        };
        self.outcomes.push(SideEffectOutcome { task, error });
    }
}

/// 登记结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordOutcome {
    pub collection: EggCollection,
    /// 校验阶段的软告警
    pub warnings: Vec<String>,
    pub side_effects: SideEffectReport,
}

// ==========================================
// FarmerLocks - 按养殖户串行化读改写
// ==========================================
#[derive(Default)]
struct FarmerLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl FarmerLocks {
    fn lock_for(&self, farmer_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        // 持锁期间不会 panic，中毒时直接取回内部数据
        let mut locks = self.locks.lock().unwrap_or_else(|p| p.into_inner());
        locks
            .entry(farmer_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

// ==========================================
// CollectionRecorder - 收购登记
// ==========================================
pub struct CollectionRecorder {
    repos: CollectionRepositories,
    validator: Arc<CollectionValidator>,
    notifier: Arc<dyn NotificationSink>,
    config: Arc<dyn CollectionConfigReader>,
    farmer_locks: FarmerLocks,
}

impl CollectionRecorder {
    pub fn new(
        repos: CollectionRepositories,
        validator: Arc<CollectionValidator>,
        notifier: Arc<dyn NotificationSink>,
        config: Arc<dyn CollectionConfigReader>,
    ) -> Self {
        Self {
            repos,
            validator,
            notifier,
            config,
            farmer_locks: FarmerLocks::default(),
        }
    }

    /// 登记一次收购
    ///
    /// # 返回
    /// - Ok(RecordOutcome): 已落库（提交后任务的成败见 side_effects）
    /// - Err(EngineError::Validation): 校验失败，未落库
    pub async fn record_collection(
        &self,
        request: NewCollectionRequest,
    ) -> EngineResult<RecordOutcome> {
        let validated = self.validator.validate(&request).await?;

        // 与存储精度（毫秒）保持一致
        let now = Local::now().naive_local().trunc_subsecs(3);
        let collection_date = request.collection_date.unwrap_or(now);
        let collection = EggCollection::from_request(
            Uuid::new_v4().to_string(),
            &request,
            collection_date,
            now,
        );
        self.repos.collection_repo.insert(&collection)?;

        tracing::info!(
            collection_id = %collection.id,
            farmer_id = %collection.farmer_id,
            staff_id = %collection.staff_id,
            hen = collection.total_hen_eggs,
            duck = collection.total_duck_eggs,
            "收购已登记: value={:.2}",
            collection.total_value
        );

        let side_effects = self.run_side_effects(&collection, &validated).await;

        Ok(RecordOutcome {
            collection,
            warnings: validated.warnings,
            side_effects,
        })
    }

    async fn run_side_effects(
        &self,
        collection: &EggCollection,
        validated: &ValidatedCollection,
    ) -> SideEffectReport {
        let window_days = self.window_days().await;
        let mut report = SideEffectReport::default();

        let result = self.update_farmer_stats(collection, window_days).await;
        report.record(SideEffectTask::FarmerStats, result);

        let result = self.raise_alerts(collection, validated, &mut report).await;
        report.record(SideEffectTask::QualityAlerts, result);

        if let Some(route_id) = collection.route_id.as_deref() {
            let result = self.route_day_summary(route_id, collection).map(|summary| {
                report.route_day = Some(summary);
            });
            report.record(SideEffectTask::RouteMetrics, result);
        }

        let result = self.update_staff_metrics(collection, window_days);
        report.record(SideEffectTask::StaffMetrics, result);

        report
    }

    /// 赊账余额、累计销售额与滚动日均产量
    async fn update_farmer_stats(&self, collection: &EggCollection, window_days: i64) -> EngineResult<()> {
        let (start, end) = trailing_window(collection.collection_date, window_days)?;

        let lock = self.farmer_locks.lock_for(&collection.farmer_id);
        let _guard = lock.lock().await;

        let customer_repo = &self.repos.customer_repo;
        customer_repo.apply_egg_sale(&collection.farmer_id, collection.total_value)?;

        let window = self
            .repos
            .collection_repo
            .find_by_farmer_in_range(&collection.farmer_id, start, end)?;
        let production = rolling_production(&window);
        customer_repo.update_egg_production(&collection.farmer_id, &production)?;

        tracing::debug!(
            farmer_id = %collection.farmer_id,
            window = window.len(),
            "日均产量已更新: hen={:.1}, duck={:.1}",
            production.hen_eggs,
            production.duck_eggs
        );
        Ok(())
    }

    /// 两类告警各自判定、各自发送
    async fn raise_alerts(
        &self,
        collection: &EggCollection,
        validated: &ValidatedCollection,
        report: &mut SideEffectReport,
    ) -> EngineResult<()> {
        let thresholds = match self.config.get_alert_thresholds().await {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("读取告警阈值失败，使用默认值: {}", e);
                AlertThresholds::default()
            }
        };
        let engine = QualityEngine::new(thresholds);
        let farmer = &validated.farmer;
        let mut failures = Vec::new();

        if let Some(alert) = engine.quality_alert(collection, farmer.display_name()) {
            if let Err(e) = self.notifier.send_quality_alert(&alert) {
                failures.push(format!("quality alert: {}", e));
            }
            report.quality_alert = Some(alert);
        }

        // 以登记前的预期产量为基准
        if let Some(alert) = engine.production_alert(collection, farmer) {
            if let Err(e) = self.notifier.send_production_alert(&alert) {
                failures.push(format!("production alert: {}", e));
            }
            report.production_alert = Some(alert);
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Notification(failures.join("; ")))
        }
    }

    fn route_day_summary(&self, route_id: &str, collection: &EggCollection) -> EngineResult<RouteDaySummary> {
        let (start, end) = day_bounds(collection.collection_date.date());
        let today = self
            .repos
            .collection_repo
            .find_by_route_in_range(route_id, start, end)?;
        let summary = RouteDaySummary {
            route_id: route_id.to_string(),
            collections: today.len() as u32,
            total_value: today.iter().map(|c| c.total_value).sum(),
        };
        tracing::info!(
            route_id = %route_id,
            collections = summary.collections,
            "线路当日汇总: value={:.2}",
            summary.total_value
        );
        Ok(summary)
    }

    fn update_staff_metrics(&self, collection: &EggCollection, window_days: i64) -> EngineResult<()> {
        let (start, end) = trailing_window(collection.collection_date, window_days)?;
        let window = self
            .repos
            .collection_repo
            .find_by_staff_in_range(&collection.staff_id, start, end)?;
        let metrics = PerformanceMetrics {
            total_collections: window.len() as u32,
            average_quality: average_quality(&window),
            on_time_rate: PLACEHOLDER_ON_TIME_RATE,
        };
        self.repos
            .staff_repo
            .update_performance_metrics(&collection.staff_id, &metrics)?;
        Ok(())
    }

    async fn window_days(&self) -> i64 {
        match self.config.get_stats_window_days().await {
            Ok(days) => days,
            Err(e) => {
                tracing::warn!("读取统计窗口失败，使用默认值: {}", e);
                DEFAULT_STATS_WINDOW_DAYS
            }
        }
    }
}

/// 窗口内每次收购的平均蛋数（空窗口为 0）
fn rolling_production(window: &[EggCollection]) -> EggProduction {
    if window.is_empty() {
        return EggProduction::default();
    }
    let n = window.len() as f64;
    EggProduction {
        hen_eggs: window.iter().map(|c| c.total_hen_eggs as f64).sum::<f64>() / n,
        duck_eggs: window.iter().map(|c| c.total_duck_eggs as f64).sum::<f64>() / n,
    }
}
