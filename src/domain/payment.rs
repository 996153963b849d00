// ==========================================
// 农产品收银系统 - 付款领域模型
// ==========================================

use crate::domain::types::PaymentMethod;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 收蛋付款记录类型
pub const EGG_COLLECTION_PAYMENT_TYPE: &str = "EGG_COLLECTION";

// ==========================================
// Payment - 付款记录
// ==========================================
// 对齐: payment 表
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub customer_id: String,
    pub collection_id: Option<String>,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_type: String,
    pub staff_id: String,
    pub payment_date: NaiveDateTime,
    pub notes: Option<String>,
}

/// 批量付款单项失败
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFailure {
    pub collection_id: String,
    pub error: String,
}

/// 批量付款结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPaymentResult {
    pub processed: u32,
    pub total_amount: f64,
    pub failures: Vec<PaymentFailure>,
}
