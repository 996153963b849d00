// ==========================================
// 农产品收银系统 - 告警通知领域模型
// ==========================================
// 职责: 质量告警、产量不足告警载荷，以及落库后的通知记录
// ==========================================

use crate::domain::party::EggProduction;
use crate::domain::types::{NotificationType, Species};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// QualityAlert - 破损率告警
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAlert {
    pub collection_id: String,
    pub farmer_id: String,
    pub farmer_name: String,
    /// 触发告警的蛋种（取破损率较高者）
    pub species: Species,
    /// 两个蛋种中较高的破损率
    pub damage_rate: f64,
    pub threshold: f64,
    pub quality_notes: Option<String>,
}

impl QualityAlert {
    pub fn title(&self) -> String {
        format!("Egg quality alert: {}", self.farmer_name)
    }

    pub fn message(&self) -> String {
        format!(
            "High damage rate of {:.1}% ({}) in collection {} from {}",
            self.damage_rate * 100.0,
            self.species,
            self.collection_id,
            self.farmer_name
        )
    }
}

// ==========================================
// ProductionAlert - 产量不足告警
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionAlert {
    pub collection_id: String,
    pub farmer_id: String,
    pub farmer_name: String,
    pub expected: EggProduction,
    pub actual_hen_eggs: u64,
    pub actual_duck_eggs: u64,
    /// 低于预期比例的蛋种
    pub short_species: Vec<Species>,
}

impl ProductionAlert {
    pub fn title(&self) -> String {
        format!("Production shortfall: {}", self.farmer_name)
    }

    pub fn message(&self) -> String {
        format!(
            "Collected hen {} / expected {:.0}, duck {} / expected {:.0} from {}",
            self.actual_hen_eggs,
            self.expected.hen_eggs,
            self.actual_duck_eggs,
            self.expected.duck_eggs,
            self.farmer_name
        )
    }
}

// ==========================================
// Notification - 通知记录
// ==========================================
// 对齐: notification 表
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub payload_json: Option<serde_json::Value>,
    pub read: bool,
    pub created_at: NaiveDateTime,
}
