// ==========================================
// 农产品收银系统 - 客户/员工/线路领域模型
// ==========================================
// 职责: 收蛋核心所读写的养殖户、收蛋员、收蛋线路视图
// 说明: 这些实体由客户/员工/线路管理子系统拥有，收蛋核心仅作副作用更新
// ==========================================

use crate::domain::types::{CustomerType, EGG_COLLECTION_PERMISSION};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// EggProduction - 日均产蛋量
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EggProduction {
    pub hen_eggs: f64,
    pub duck_eggs: f64,
}

impl EggProduction {
    pub fn total(&self) -> f64 {
        self.hen_eggs + self.duck_eggs
    }

    /// 是否有可用的预期产量
    pub fn is_known(&self) -> bool {
        self.hen_eggs > 0.0 || self.duck_eggs > 0.0
    }
}

// ==========================================
// Customer - 客户（养殖户视图）
// ==========================================
// 对齐: customer 表
// 符号约定: credit_balance 为欠养殖户的金额，收蛋金额会“减少”该值
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub customer_type: CustomerType,
    pub contact_person: String,
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub active: bool,
    pub credit_limit: f64,
    pub credit_balance: f64,
    pub egg_production: EggProduction,
    pub total_egg_sales: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Customer {
    pub fn is_active_farmer(&self) -> bool {
        self.active && self.customer_type == CustomerType::Farmer
    }

    /// 展示名称：优先商号，其次联系人
    pub fn display_name(&self) -> &str {
        match self.business_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.contact_person,
        }
    }
}

// ==========================================
// PerformanceMetrics - 收蛋员绩效
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub total_collections: u32,
    /// 1-5 分
    pub average_quality: f64,
    pub on_time_rate: f64,
}

// ==========================================
// Staff - 员工（收蛋员视图）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub permissions: Vec<String>,
    pub performance_metrics: PerformanceMetrics,
    pub updated_at: NaiveDateTime,
}

impl Staff {
    pub fn can_collect_eggs(&self) -> bool {
        self.active
            && self
                .permissions
                .iter()
                .any(|p| p == EGG_COLLECTION_PERMISSION)
    }
}

// ==========================================
// CollectionRoute - 收蛋线路
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRoute {
    pub id: String,
    pub name: String,
    pub farmer_ids: Vec<String>,
    pub assigned_staff_id: Option<String>,
    pub active: bool,
}

impl CollectionRoute {
    pub fn contains_farmer(&self, farmer_id: &str) -> bool {
        self.farmer_ids.iter().any(|id| id == farmer_id)
    }
}
