// ==========================================
// 农产品收银系统 - 报表领域模型
// ==========================================
// 职责: 期间汇总、日报、线路建议等只读输出
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// PeriodSummary - 期间汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub total_collections: u32,
    pub total_hen_eggs: u64,
    pub total_duck_eggs: u64,
    pub total_value: f64,
    pub average_quality: f64,
    pub farms_visited: u32,
    /// 占位指标，非计算值
    pub route_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopFarm {
    pub farmer_id: String,
    pub farmer_name: String,
    pub collections: u32,
    pub total_value: f64,
    pub total_eggs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityIssue {
    pub collection_id: String,
    pub farmer_id: String,
    pub damage_rate: f64,
    pub quality_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePerformance {
    pub route_id: String,
    pub collections: u32,
    /// 占位指标，非计算值
    pub efficiency: f64,
}

// ==========================================
// DailyReport - 日报
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub date: NaiveDate,
    pub summary: PeriodSummary,
    pub top_farms: Vec<TopFarm>,
    pub quality_issues: Vec<QualityIssue>,
    pub route_performance: Vec<RoutePerformance>,
}

// ==========================================
// FarmerPerformance - 养殖户窗口期表现
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerPerformance {
    pub farmer_id: String,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub collections: u32,
    pub total_hen_eggs: u64,
    pub total_duck_eggs: u64,
    pub total_value: f64,
    pub average_quality: f64,
}

/// 养殖户未结算收购
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutstandingBalance {
    pub farmer_id: String,
    pub unpaid_collections: u32,
    pub outstanding_amount: f64,
    pub collection_ids: Vec<String>,
}

// ==========================================
// OptimizedRoute - 线路拜访顺序建议
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    pub farmer_id: String,
    pub farmer_name: String,
    pub expected_daily_eggs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedRoute {
    pub route_id: String,
    pub optimized_order: Vec<RouteStop>,
    pub estimated_time_minutes: u32,
    pub estimated_distance_km: f64,
    pub suggestions: Vec<String>,
}
