// ==========================================
// 农产品收银系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，将仓储/引擎错误转换为面向调用方的错误消息
// ==========================================

use crate::engine::error::{CollectionRejection, EngineError};
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 收购登记校验失败（kind 为 InvalidFarmer / UnauthorizedStaff / ...）
    #[error("收购校验失败[{kind}]: {reason}")]
    ValidationFailed { kind: String, reason: String },

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 导出/配置错误
    // ==========================================
    #[error("导出失败: {0}")]
    ExportError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<CollectionRejection> for ApiError {
    fn from(rejection: CollectionRejection) -> Self {
        ApiError::ValidationFailed {
            kind: rejection.kind().to_string(),
            reason: rejection.to_string(),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(rejection) => rejection.into(),
            EngineError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            EngineError::Repository(e) => e.into(),
            EngineError::Config(msg) => ApiError::ConfigError(msg),
            EngineError::Notification(msg) => ApiError::InternalError(msg),
            EngineError::Export(msg) => ApiError::ExportError(msg),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "EggCollection".to_string(),
            id: "C001".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("EggCollection"));
                assert!(msg.contains("C001"));
            }
            _ => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn test_validation_error_keeps_kind() {
        let engine_err = EngineError::from(CollectionRejection::EmptyCollection);
        let api_err: ApiError = engine_err.into();
        match api_err {
            ApiError::ValidationFailed { kind, .. } => assert_eq!(kind, "EmptyCollection"),
            _ => panic!("Expected ValidationFailed"),
        }
    }

    #[test]
    fn test_engine_repository_error_is_unwrapped() {
        let engine_err = EngineError::Repository(RepositoryError::LockError("poisoned".to_string()));
        let api_err: ApiError = engine_err.into();
        assert!(matches!(api_err, ApiError::DatabaseConnectionError(_)));
    }
}
