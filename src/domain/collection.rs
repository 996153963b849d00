// ==========================================
// 农产品收银系统 - 鸡蛋收购领域模型
// ==========================================
// 职责: 收购记录、分级计数、金额推导
// 红线: total_* 与 total_value 只能由分级计数和单价推导，不得单独写入
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 一打 = 12 枚
pub const EGGS_PER_DOZEN: f64 = 12.0;

// ==========================================
// HenEggs - 鸡蛋分级计数
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HenEggs {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
    pub extra_large: u32,
    pub damaged: u32,
}

impl HenEggs {
    /// 总数（含破损）；按 u64 累加，分级计数取任意 u32 均不溢出
    pub fn total(&self) -> u64 {
        [self.small, self.medium, self.large, self.extra_large, self.damaged]
            .iter()
            .map(|&n| u64::from(n))
            .sum()
    }

    /// 破损率，总数为 0 时返回 0
    pub fn damage_rate(&self) -> f64 {
        damage_rate(u64::from(self.damaged), self.total())
    }
}

// ==========================================
// DuckEggs - 鸭蛋分级计数（无特大号）
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuckEggs {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
    pub damaged: u32,
}

impl DuckEggs {
    pub fn total(&self) -> u64 {
        [self.small, self.medium, self.large, self.damaged]
            .iter()
            .map(|&n| u64::from(n))
            .sum()
    }

    pub fn damage_rate(&self) -> f64 {
        damage_rate(u64::from(self.damaged), self.total())
    }
}

fn damage_rate(damaged: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    damaged as f64 / total as f64
}

/// 按打计价: (鸡蛋数/12)×鸡蛋单价 + (鸭蛋数/12)×鸭蛋单价
///
/// 不做取整，显示层负责格式化
pub fn collection_value(
    total_hen_eggs: u64,
    total_duck_eggs: u64,
    hen_egg_price: f64,
    duck_egg_price: f64,
) -> f64 {
    (total_hen_eggs as f64 / EGGS_PER_DOZEN) * hen_egg_price
        + (total_duck_eggs as f64 / EGGS_PER_DOZEN) * duck_egg_price
}

// ==========================================
// NewCollectionRequest - 收购登记请求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollectionRequest {
    pub farmer_id: String,
    pub staff_id: String,
    pub route_id: Option<String>,
    pub hen_eggs: HenEggs,
    pub duck_eggs: DuckEggs,
    pub hen_egg_price: f64,
    pub duck_egg_price: f64,
    pub quality_notes: Option<String>,
    /// 缺省为当前时间
    pub collection_date: Option<NaiveDateTime>,
}

impl NewCollectionRequest {
    /// 鸡蛋+鸭蛋总数（含破损）
    pub fn total_eggs(&self) -> u64 {
        self.hen_eggs.total() + self.duck_eggs.total()
    }
}

// ==========================================
// EggCollection - 单次上门收购记录
// ==========================================
// 对齐: egg_collection 表
// 单价为收购时快照，记录后不可变
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EggCollection {
    // ===== 标识 =====
    pub id: String,
    pub farmer_id: String,
    pub staff_id: String,
    pub route_id: Option<String>,
    pub collection_date: NaiveDateTime,

    // ===== 分级计数 =====
    pub hen_eggs: HenEggs,
    pub duck_eggs: DuckEggs,

    // ===== 价格快照 (每打) =====
    pub hen_egg_price: f64,
    pub duck_egg_price: f64,

    // ===== 推导字段 =====
    pub total_hen_eggs: u64,
    pub total_duck_eggs: u64,
    pub total_value: f64,

    pub quality_notes: Option<String>,

    // ===== 状态 =====
    pub paid: bool,
    pub payment_date: Option<NaiveDateTime>,
    pub synced: bool,
    pub created_at: NaiveDateTime,
}

impl EggCollection {
    /// 由请求构造新记录（推导合计与金额，paid/synced 均为 false）
    pub fn from_request(
        id: String,
        request: &NewCollectionRequest,
        collection_date: NaiveDateTime,
        created_at: NaiveDateTime,
    ) -> Self {
        let total_hen_eggs = request.hen_eggs.total();
        let total_duck_eggs = request.duck_eggs.total();
        let total_value = collection_value(
            total_hen_eggs,
            total_duck_eggs,
            request.hen_egg_price,
            request.duck_egg_price,
        );

        Self {
            id,
            farmer_id: request.farmer_id.clone(),
            staff_id: request.staff_id.clone(),
            route_id: request.route_id.clone(),
            collection_date,
            hen_eggs: request.hen_eggs,
            duck_eggs: request.duck_eggs,
            hen_egg_price: request.hen_egg_price,
            duck_egg_price: request.duck_egg_price,
            total_hen_eggs,
            total_duck_eggs,
            total_value,
            quality_notes: request.quality_notes.clone(),
            paid: false,
            payment_date: None,
            synced: false,
            created_at,
        }
    }

    pub fn total_eggs(&self) -> u64 {
        self.total_hen_eggs + self.total_duck_eggs
    }

    pub fn total_damaged(&self) -> u64 {
        u64::from(self.hen_eggs.damaged) + u64::from(self.duck_eggs.damaged)
    }

    /// 整体破损率；0 枚时返回 None（质量分无定义）
    pub fn overall_damage_rate(&self) -> Option<f64> {
        let total = self.total_eggs();
        if total == 0 {
            return None;
        }
        Some(self.total_damaged() as f64 / total as f64)
    }

    /// 两个蛋种中较高的破损率
    pub fn max_species_damage_rate(&self) -> f64 {
        self.hen_eggs.damage_rate().max(self.duck_eggs.damage_rate())
    }
}
