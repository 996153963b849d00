// ==========================================
// 农产品收银系统 - 通知数据仓储
// ==========================================

use crate::db::format_ts;
use crate::domain::notification::Notification;
use crate::domain::types::NotificationType;
use crate::repository::customer_repo::{text_conversion_error, ts_column};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// NotificationRepository - 通知仓储
// ==========================================
pub struct NotificationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl NotificationRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, n: &Notification) -> RepositoryResult<()> {
        let payload = n
            .payload_json
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO notification (id, notification_type, title, message, payload_json, is_read, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                n.id,
                n.notification_type.to_db_str(),
                n.title,
                n.message,
                payload,
                n.read,
                format_ts(&n.created_at),
            ],
        )?;
        Ok(())
    }

    /// 未读通知（按创建时间倒序）
    pub fn list_unread(&self) -> RepositoryResult<Vec<Notification>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, notification_type, title, message, payload_json, is_read, created_at
            FROM notification
            WHERE is_read = 0
            ORDER BY created_at DESC, id ASC
            "#,
        )?;
        let list = stmt
            .query_map([], map_notification_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(list)
    }

    pub fn mark_read(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("UPDATE notification SET is_read = 1 WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Notification".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

fn map_notification_row(row: &Row<'_>) -> SqliteResult<Notification> {
    let kind: String = row.get(1)?;
    let notification_type = NotificationType::from_db_str(&kind)
        .ok_or_else(|| text_conversion_error(1, format!("未知通知类型: {}", kind)))?;
    let payload: Option<String> = row.get(4)?;
    let payload_json = payload
        .map(|s| serde_json::from_str(&s))
        .transpose()
        .map_err(|e| text_conversion_error(4, format!("无效JSON: {}", e)))?;
    Ok(Notification {
        id: row.get(0)?,
        notification_type,
        title: row.get(2)?,
        message: row.get(3)?,
        payload_json,
        read: row.get(5)?,
        created_at: ts_column(row, 6)?,
    })
}
