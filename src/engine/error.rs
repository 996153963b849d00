// ==========================================
// 农产品收银系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==========================================
// CollectionRejection - 收购登记硬校验失败原因
// ==========================================
// 按校验顺序排列，命中第一条即终止
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CollectionRejection {
    #[error("养殖户无效或已停用: farmer_id={farmer_id}")]
    InvalidFarmer { farmer_id: String },

    #[error("员工无收蛋权限或已停用: staff_id={staff_id}")]
    UnauthorizedStaff { staff_id: String },

    #[error("线路无效或养殖户不在线路内: route_id={route_id}, farmer_id={farmer_id}")]
    InvalidRoute { route_id: String, farmer_id: String },

    #[error("收购数量为 0")]
    EmptyCollection,

    #[error("单价必须大于 0: hen={hen_egg_price}, duck={duck_egg_price}")]
    InvalidPrice {
        hen_egg_price: f64,
        duck_egg_price: f64,
    },
}

impl CollectionRejection {
    /// 错误类别标识
    pub fn kind(&self) -> &'static str {
        match self {
            CollectionRejection::InvalidFarmer { .. } => "InvalidFarmer",
            CollectionRejection::UnauthorizedStaff { .. } => "UnauthorizedStaff",
            CollectionRejection::InvalidRoute { .. } => "InvalidRoute",
            CollectionRejection::EmptyCollection => "EmptyCollection",
            CollectionRejection::InvalidPrice { .. } => "InvalidPrice",
        }
    }
}

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("收购校验失败: {0}")]
    Validation(#[from] CollectionRejection),

    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("配置读取失败: {0}")]
    Config(String),

    #[error("通知发送失败: {0}")]
    Notification(String),

    #[error("导出失败: {0}")]
    Export(String),
}

impl EngineError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        EngineError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
