// ==========================================
// 农产品收银系统 - 共享连接
// ==========================================
// 职责: 打开数据库、建表，并包装为各仓储共享的连接
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// 打开（必要时创建）数据库并建表
///
/// 打开或建表失败统一归为连接错误
pub fn open_shared_connection(db_path: &str) -> RepositoryResult<Arc<Mutex<Connection>>> {
    let conn = open_sqlite_connection(db_path).map_err(|e| {
        RepositoryError::DatabaseConnectionError(format!("无法打开数据库 {}: {}", db_path, e))
    })?;
    init_schema(&conn).map_err(|e| {
        RepositoryError::DatabaseConnectionError(format!("无法初始化数据库结构: {}", e))
    })?;
    Ok(Arc::new(Mutex::new(conn)))
}
