// ==========================================
// 农产品收银系统 - 报表汇总引擎
// ==========================================
// 职责: 期间汇总 / 日报 / CSV 导出 / 批量付款 / 养殖户视图 / 同步标记
// 说明: 只读路径（批量付款与同步标记除外），与登记引擎互不依赖
// ==========================================

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::config::{AlertThresholds, CollectionConfigReader, DEFAULT_STATS_WINDOW_DAYS};
use crate::domain::collection::EggCollection;
use crate::domain::payment::{
    BatchPaymentResult, Payment, PaymentFailure, EGG_COLLECTION_PAYMENT_TYPE,
};
use crate::domain::report::{
    DailyReport, FarmerPerformance, OutstandingBalance, PeriodSummary, QualityIssue,
    RoutePerformance, TopFarm,
};
use crate::domain::types::PaymentMethod;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::quality::average_quality;
use crate::engine::repositories::CollectionRepositories;
use crate::engine::window::{day_bounds, trailing_window};

/// 线路效率占位值（无里程/时效数据，非计算值）
pub const PLACEHOLDER_ROUTE_EFFICIENCY: f64 = 85.0;

/// 日报排行榜条数
pub const TOP_FARMS_LIMIT: usize = 10;

/// 导出表头（列顺序固定）
pub const EXPORT_HEADER: [&str; 21] = [
    "Collection Date",
    "Farmer ID",
    "Farmer Name",
    "Route",
    "Collector",
    "Hen Eggs Small",
    "Hen Eggs Medium",
    "Hen Eggs Large",
    "Hen Eggs XL",
    "Hen Eggs Damaged",
    "Total Hen Eggs",
    "Duck Eggs Small",
    "Duck Eggs Medium",
    "Duck Eggs Large",
    "Duck Eggs Damaged",
    "Total Duck Eggs",
    "Hen Price/Dozen",
    "Duck Price/Dozen",
    "Total Value",
    "Quality Notes",
    "Paid Status",
];

const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

// ==========================================
// ReportingEngine - 报表汇总
// ==========================================
pub struct ReportingEngine {
    repos: CollectionRepositories,
    config: Arc<dyn CollectionConfigReader>,
}

impl ReportingEngine {
    pub fn new(repos: CollectionRepositories, config: Arc<dyn CollectionConfigReader>) -> Self {
        Self { repos, config }
    }

    // ==========================================
    // 期间汇总 / 日报
    // ==========================================

    /// 期间汇总，可按线路过滤
    pub fn summarize_period(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        route_id: Option<&str>,
    ) -> EngineResult<PeriodSummary> {
        let collections = self.repos.collection_repo.find_in_period(start, end, route_id)?;
        Ok(summarize(&collections))
    }

    /// 指定日期的日报
    pub async fn daily_report(&self, date: NaiveDate) -> EngineResult<DailyReport> {
        let (start, end) = day_bounds(date);
        let collections = self.repos.collection_repo.find_in_period(start, end, None)?;
        let threshold = self.alert_thresholds().await.damage_alert_threshold;

        let report = DailyReport {
            date,
            summary: summarize(&collections),
            top_farms: self.top_farms(&collections)?,
            quality_issues: quality_issues(&collections, threshold),
            route_performance: route_performance(&collections),
        };

        tracing::info!(
            date = %date,
            collections = report.summary.total_collections,
            "日报已生成: value={:.2}, quality_issues={}",
            report.summary.total_value,
            report.quality_issues.len()
        );
        Ok(report)
    }

    /// 按养殖户聚合，按金额降序取前 10
    fn top_farms(&self, collections: &[EggCollection]) -> EngineResult<Vec<TopFarm>> {
        let mut by_farmer: HashMap<&str, TopFarm> = HashMap::new();
        for c in collections {
            let entry = by_farmer.entry(c.farmer_id.as_str()).or_insert_with(|| TopFarm {
                farmer_id: c.farmer_id.clone(),
                farmer_name: String::new(),
                collections: 0,
                total_value: 0.0,
                total_eggs: 0,
            });
            entry.collections += 1;
            entry.total_value += c.total_value;
            entry.total_eggs += c.total_eggs();
        }

        let mut farms: Vec<TopFarm> = by_farmer.into_values().collect();
        farms.sort_by(|a, b| {
            b.total_value
                .total_cmp(&a.total_value)
                .then_with(|| a.farmer_id.cmp(&b.farmer_id))
        });
        farms.truncate(TOP_FARMS_LIMIT);

        for farm in &mut farms {
            farm.farmer_name = self.farmer_name(&farm.farmer_id)?;
        }
        Ok(farms)
    }

    // ==========================================
    // CSV 导出
    // ==========================================

    /// 导出期间收购明细（逗号分隔，含逗号的字段加引号）
    pub fn export_csv(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        route_id: Option<&str>,
    ) -> EngineResult<String> {
        let collections = self.repos.collection_repo.find_in_period(start, end, route_id)?;

        let mut farmer_names: HashMap<String, String> = HashMap::new();
        let mut staff_names: HashMap<String, String> = HashMap::new();
        let mut route_names: HashMap<String, String> = HashMap::new();

        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
        writer
            .write_record(EXPORT_HEADER)
            .map_err(|e| EngineError::Export(e.to_string()))?;

        for c in &collections {
            if !farmer_names.contains_key(&c.farmer_id) {
                let name = self.farmer_name(&c.farmer_id)?;
                farmer_names.insert(c.farmer_id.clone(), name);
            }
            if !staff_names.contains_key(&c.staff_id) {
                let name = self
                    .repos
                    .staff_repo
                    .find_by_id(&c.staff_id)?
                    .map(|s| s.name)
                    .unwrap_or_else(|| c.staff_id.clone());
                staff_names.insert(c.staff_id.clone(), name);
            }
            let route = match c.route_id.as_deref() {
                Some(route_id) => {
                    if !route_names.contains_key(route_id) {
                        let name = self
                            .repos
                            .route_repo
                            .find_by_id(route_id)?
                            .map(|r| r.name)
                            .unwrap_or_else(|| route_id.to_string());
                        route_names.insert(route_id.to_string(), name);
                    }
                    route_names.get(route_id).cloned().unwrap_or_default()
                }
                None => String::new(),
            };

            let row = vec![
                c.collection_date.format(EXPORT_DATE_FORMAT).to_string(),
                c.farmer_id.clone(),
                farmer_names.get(&c.farmer_id).cloned().unwrap_or_default(),
                route,
                staff_names.get(&c.staff_id).cloned().unwrap_or_default(),
                c.hen_eggs.small.to_string(),
                c.hen_eggs.medium.to_string(),
                c.hen_eggs.large.to_string(),
                c.hen_eggs.extra_large.to_string(),
                c.hen_eggs.damaged.to_string(),
                c.total_hen_eggs.to_string(),
                c.duck_eggs.small.to_string(),
                c.duck_eggs.medium.to_string(),
                c.duck_eggs.large.to_string(),
                c.duck_eggs.damaged.to_string(),
                c.total_duck_eggs.to_string(),
                format!("{:.2}", c.hen_egg_price),
                format!("{:.2}", c.duck_egg_price),
                format!("{:.2}", c.total_value),
                c.quality_notes.clone().unwrap_or_default(),
                if c.paid { "Paid" } else { "Unpaid" }.to_string(),
            ];
            writer
                .write_record(&row)
                .map_err(|e| EngineError::Export(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| EngineError::Export(e.to_string()))?;
        let text = String::from_utf8(bytes).map_err(|e| EngineError::Export(e.to_string()))?;

        tracing::info!(rows = collections.len(), "收购明细已导出");
        Ok(text)
    }

    // ==========================================
    // 批量付款
    // ==========================================

    /// 逐条付款，单条失败记入 failures 并继续
    pub fn process_batch_payment(
        &self,
        collection_ids: &[String],
        payment_method: PaymentMethod,
        staff_id: &str,
    ) -> BatchPaymentResult {
        let mut result = BatchPaymentResult::default();

        for collection_id in collection_ids {
            match self.pay_collection(collection_id, payment_method, staff_id) {
                Ok(amount) => {
                    result.processed += 1;
                    result.total_amount += amount;
                }
                Err(e) => {
                    tracing::warn!(collection_id = %collection_id, "付款失败: {}", e);
                    result.failures.push(PaymentFailure {
                        collection_id: collection_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            processed = result.processed,
            failed = result.failures.len(),
            method = %payment_method.to_db_str(),
            "批量付款完成: total={:.2}",
            result.total_amount
        );
        result
    }

    fn pay_collection(
        &self,
        collection_id: &str,
        payment_method: PaymentMethod,
        staff_id: &str,
    ) -> EngineResult<f64> {
        let collection = self
            .repos
            .collection_repo
            .find_by_id(collection_id)?
            .ok_or_else(|| EngineError::not_found("EggCollection", collection_id))?;

        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            customer_id: collection.farmer_id.clone(),
            collection_id: Some(collection.id.clone()),
            amount: collection.total_value,
            payment_method,
            payment_type: EGG_COLLECTION_PAYMENT_TYPE.to_string(),
            staff_id: staff_id.to_string(),
            payment_date: Local::now().naive_local(),
            notes: None,
        };
        // 已付款的记录在仓储层被拒绝（NotFound UnpaidEggCollection）
        self.repos.payment_repo.insert_collection_payment(&payment)?;
        Ok(collection.total_value)
    }

    // ==========================================
    // 养殖户视图
    // ==========================================

    /// 养殖户在区间内的收购记录
    pub fn farmer_collections(
        &self,
        farmer_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> EngineResult<Vec<EggCollection>> {
        Ok(self
            .repos
            .collection_repo
            .find_by_farmer_in_range(farmer_id, start, end)?)
    }

    /// 养殖户截至 `as_of` 的滚动窗口表现
    pub async fn farmer_performance(
        &self,
        farmer_id: &str,
        as_of: NaiveDateTime,
    ) -> EngineResult<FarmerPerformance> {
        if self.repos.customer_repo.find_by_id(farmer_id)?.is_none() {
            return Err(EngineError::not_found("Customer", farmer_id));
        }

        let window_days = match self.config.get_stats_window_days().await {
            Ok(days) => days,
            Err(e) => {
                tracing::warn!("读取统计窗口失败，使用默认值: {}", e);
                DEFAULT_STATS_WINDOW_DAYS
            }
        };
        let (start, end) = trailing_window(as_of, window_days)?;
        let window = self
            .repos
            .collection_repo
            .find_by_farmer_in_range(farmer_id, start, end)?;

        Ok(FarmerPerformance {
            farmer_id: farmer_id.to_string(),
            window_start: start,
            window_end: end,
            collections: window.len() as u32,
            total_hen_eggs: window.iter().map(|c| c.total_hen_eggs).sum(),
            total_duck_eggs: window.iter().map(|c| c.total_duck_eggs).sum(),
            total_value: window.iter().map(|c| c.total_value).sum(),
            average_quality: average_quality(&window),
        })
    }

    /// 养殖户未付款收购与待付金额
    pub fn outstanding_balance(&self, farmer_id: &str) -> EngineResult<OutstandingBalance> {
        let unpaid = self.repos.collection_repo.find_unpaid_by_farmer(farmer_id)?;
        Ok(OutstandingBalance {
            farmer_id: farmer_id.to_string(),
            unpaid_collections: unpaid.len() as u32,
            outstanding_amount: unpaid.iter().map(|c| c.total_value).sum(),
            collection_ids: unpaid.into_iter().map(|c| c.id).collect(),
        })
    }

    // ==========================================
    // 同步标记
    // ==========================================

    pub fn list_unsynced(&self) -> EngineResult<Vec<EggCollection>> {
        Ok(self.repos.collection_repo.find_unsynced()?)
    }

    /// 返回实际标记的条数（已同步或不存在的 id 不计数）
    pub fn mark_synced(&self, collection_ids: &[String]) -> EngineResult<usize> {
        let count = self.repos.collection_repo.mark_synced(collection_ids)?;
        tracing::info!(requested = collection_ids.len(), marked = count, "同步标记完成");
        Ok(count)
    }

    fn farmer_name(&self, farmer_id: &str) -> EngineResult<String> {
        Ok(self
            .repos
            .customer_repo
            .find_by_id(farmer_id)?
            .map(|f| f.display_name().to_string())
            .unwrap_or_else(|| farmer_id.to_string()))
    }

    async fn alert_thresholds(&self) -> AlertThresholds {
        match self.config.get_alert_thresholds().await {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("读取告警阈值失败，使用默认值: {}", e);
                AlertThresholds::default()
            }
        }
    }
}

// ==========================================
// 纯聚合函数
// ==========================================

fn summarize(collections: &[EggCollection]) -> PeriodSummary {
    if collections.is_empty() {
        return PeriodSummary::default();
    }
    let farms: HashSet<&str> = collections.iter().map(|c| c.farmer_id.as_str()).collect();
    PeriodSummary {
        total_collections: collections.len() as u32,
        total_hen_eggs: collections.iter().map(|c| c.total_hen_eggs).sum(),
        total_duck_eggs: collections.iter().map(|c| c.total_duck_eggs).sum(),
        total_value: collections.iter().map(|c| c.total_value).sum(),
        average_quality: average_quality(collections),
        farms_visited: farms.len() as u32,
        route_efficiency: PLACEHOLDER_ROUTE_EFFICIENCY,
    }
}

/// 任一蛋种破损率超过阈值的收购，每条一项
fn quality_issues(collections: &[EggCollection], threshold: f64) -> Vec<QualityIssue> {
    collections
        .iter()
        .filter(|c| c.max_species_damage_rate() > threshold)
        .map(|c| QualityIssue {
            collection_id: c.id.clone(),
            farmer_id: c.farmer_id.clone(),
            damage_rate: c.max_species_damage_rate(),
            quality_notes: c.quality_notes.clone(),
        })
        .collect()
}

/// 按线路计数（无线路的收购不计入），按线路 id 排序
fn route_performance(collections: &[EggCollection]) -> Vec<RoutePerformance> {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for route_id in collections.iter().filter_map(|c| c.route_id.as_deref()) {
        *counts.entry(route_id).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(route_id, collections)| RoutePerformance {
            route_id: route_id.to_string(),
            collections,
            efficiency: PLACEHOLDER_ROUTE_EFFICIENCY,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collection::{DuckEggs, HenEggs, NewCollectionRequest};

    fn collection(id: &str, farmer_id: &str, route_id: Option<&str>, hen: HenEggs) -> EggCollection {
        let ts = NaiveDate::from_ymd_opt(2026, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let request = NewCollectionRequest {
            farmer_id: farmer_id.to_string(),
            staff_id: "S1".to_string(),
            route_id: route_id.map(str::to_string),
            hen_eggs: hen,
            duck_eggs: DuckEggs::default(),
            hen_egg_price: 3.0,
            duck_egg_price: 4.0,
            quality_notes: None,
            collection_date: Some(ts),
        };
        EggCollection::from_request(id.to_string(), &request, ts, ts)
    }

    #[test]
    fn test_summarize_empty_is_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary, PeriodSummary::default());
        assert_eq!(summary.route_efficiency, 0.0);
    }

    #[test]
    fn test_summarize_counts_distinct_farms() {
        let hen = HenEggs { large: 24, ..Default::default() };
        let collections = vec![
            collection("C1", "F1", None, hen),
            collection("C2", "F1", None, hen),
            collection("C3", "F2", None, hen),
        ];
        let summary = summarize(&collections);
        assert_eq!(summary.total_collections, 3);
        assert_eq!(summary.farms_visited, 2);
        assert_eq!(summary.total_hen_eggs, 72);
        assert!((summary.total_value - 18.0).abs() < 1e-9);
        assert_eq!(summary.average_quality, 5.0);
        assert_eq!(summary.route_efficiency, PLACEHOLDER_ROUTE_EFFICIENCY);
    }

    #[test]
    fn test_quality_issues_use_max_species_rate() {
        let clean = HenEggs { large: 100, ..Default::default() };
        let damaged = HenEggs { large: 80, damaged: 20, ..Default::default() };
        let collections = vec![
            collection("C1", "F1", None, clean),
            collection("C2", "F2", None, damaged),
        ];
        let issues = quality_issues(&collections, 0.10);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].collection_id, "C2");
        assert!((issues[0].damage_rate - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_route_performance_groups_by_route() {
        let hen = HenEggs { small: 12, ..Default::default() };
        let collections = vec![
            collection("C1", "F1", Some("R2"), hen),
            collection("C2", "F2", Some("R1"), hen),
            collection("C3", "F3", Some("R2"), hen),
            collection("C4", "F4", None, hen),
        ];
        let routes = route_performance(&collections);
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].route_id, "R1");
        assert_eq!(routes[0].collections, 1);
        assert_eq!(routes[1].route_id, "R2");
        assert_eq!(routes[1].collections, 2);
    }
}
