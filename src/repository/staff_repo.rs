// ==========================================
// 农产品收银系统 - 员工数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::format_ts;
use crate::domain::party::{PerformanceMetrics, Staff};
use crate::repository::customer_repo::{json_column, ts_column};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// StaffRepository - 员工仓储
// ==========================================
pub struct StaffRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StaffRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增员工
    pub fn insert(&self, staff: &Staff) -> RepositoryResult<()> {
        let permissions = serde_json::to_string(&staff.permissions)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO staff (
                id, name, active, permissions,
                total_collections, average_quality, on_time_rate, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                staff.id,
                staff.name,
                staff.active,
                permissions,
                staff.performance_metrics.total_collections,
                staff.performance_metrics.average_quality,
                staff.performance_metrics.on_time_rate,
                format_ts(&staff.updated_at),
            ],
        )?;
        Ok(())
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Staff>> {
        let conn = self.get_conn()?;
        let staff = conn
            .query_row(
                r#"
                SELECT id, name, active, permissions,
                       total_collections, average_quality, on_time_rate, updated_at
                FROM staff
                WHERE id = ?1
                "#,
                params![id],
                map_staff_row,
            )
            .optional()?;
        Ok(staff)
    }

    /// 覆写绩效指标
    pub fn update_performance_metrics(
        &self,
        staff_id: &str,
        metrics: &PerformanceMetrics,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE staff
            SET total_collections = ?2, average_quality = ?3, on_time_rate = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
            params![
                staff_id,
                metrics.total_collections,
                metrics.average_quality,
                metrics.on_time_rate,
                format_ts(&Local::now().naive_local()),
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Staff".to_string(),
                id: staff_id.to_string(),
            });
        }
        Ok(())
    }
}

fn map_staff_row(row: &Row<'_>) -> SqliteResult<Staff> {
    let permissions: Vec<String> = json_column(row, 3)?;
    Ok(Staff {
        id: row.get(0)?,
        name: row.get(1)?,
        active: row.get(2)?,
        permissions,
        performance_metrics: PerformanceMetrics {
            total_collections: row.get(4)?,
            average_quality: row.get(5)?,
            on_time_rate: row.get(6)?,
        },
        updated_at: ts_column(row, 7)?,
    })
}
