// ==========================================
// 农产品收银系统 - 领域类型定义
// ==========================================
// 职责: 客户类型、蛋种、付款方式、通知类型等枚举
// 存储格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 员工收蛋权限标识（存储于 staff.permissions JSON 数组）
pub const EGG_COLLECTION_PERMISSION: &str = "egg_collection";

// ==========================================
// 客户类型 (Customer Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerType {
    Farmer,    // 养殖户（供蛋方）
    Regular,   // 零售客户
    Wholesale, // 批发客户
}

impl CustomerType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            CustomerType::Farmer => "FARMER",
            CustomerType::Regular => "REGULAR",
            CustomerType::Wholesale => "WHOLESALE",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "FARMER" => Some(CustomerType::Farmer),
            "REGULAR" => Some(CustomerType::Regular),
            "WHOLESALE" => Some(CustomerType::Wholesale),
            _ => None,
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 蛋种 (Species)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Species {
    Hen,  // 鸡蛋
    Duck, // 鸭蛋
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Hen => write!(f, "HEN"),
            Species::Duck => write!(f, "DUCK"),
        }
    }
}

// ==========================================
// 付款方式 (Payment Method)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    MobileMoney,
    Check,
}

impl PaymentMethod {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::MobileMoney => "MOBILE_MONEY",
            PaymentMethod::Check => "CHECK",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CASH" => Some(PaymentMethod::Cash),
            "BANK_TRANSFER" => Some(PaymentMethod::BankTransfer),
            "MOBILE_MONEY" => Some(PaymentMethod::MobileMoney),
            "CHECK" => Some(PaymentMethod::Check),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 通知类型 (Notification Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    QualityAlert,    // 破损率告警
    ProductionAlert, // 产量不足告警
}

impl NotificationType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            NotificationType::QualityAlert => "QUALITY_ALERT",
            NotificationType::ProductionAlert => "PRODUCTION_ALERT",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "QUALITY_ALERT" => Some(NotificationType::QualityAlert),
            "PRODUCTION_ALERT" => Some(NotificationType::ProductionAlert),
            _ => None,
        }
    }
}
