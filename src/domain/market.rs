// ==========================================
// 农产品收银系统 - 市场行情领域模型
// ==========================================
// 说明: 行情为 1 小时缓存，不作为记录实体持久化
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 鸡蛋每打行情（按规格）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HenEggPrices {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
    pub extra_large: f64,
}

/// 鸭蛋每打行情（按规格）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuckEggPrices {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPrices {
    pub hen_eggs: HenEggPrices,
    pub duck_eggs: DuckEggPrices,
    pub last_updated: NaiveDateTime,
}

impl MarketPrices {
    /// 兜底行情表（无外部行情源时使用）
    pub fn fallback(last_updated: NaiveDateTime) -> Self {
        Self {
            hen_eggs: HenEggPrices {
                small: 2.00,
                medium: 2.50,
                large: 3.00,
                extra_large: 3.50,
            },
            duck_eggs: DuckEggPrices {
                small: 3.00,
                medium: 3.50,
                large: 4.00,
            },
            last_updated,
        }
    }
}
