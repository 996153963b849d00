// ==========================================
// 农产品收银系统 - 收蛋线路数据仓储
// ==========================================
// 说明: 线路归线路管理子系统所有，收蛋核心只读
// ==========================================

use crate::domain::party::CollectionRoute;
use crate::repository::customer_repo::json_column;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// RouteRepository - 线路仓储
// ==========================================
pub struct RouteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RouteRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增线路（养殖户列表按 JSON 数组保存，保留顺序）
    pub fn insert(&self, route: &CollectionRoute) -> RepositoryResult<()> {
        let farmer_ids = serde_json::to_string(&route.farmer_ids)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO collection_route (id, name, farmer_ids, assigned_staff_id, active)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                route.id,
                route.name,
                farmer_ids,
                route.assigned_staff_id,
                route.active,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<CollectionRoute>> {
        let conn = self.get_conn()?;
        let route = conn
            .query_row(
                r#"
                SELECT id, name, farmer_ids, assigned_staff_id, active
                FROM collection_route
                WHERE id = ?1
                "#,
                params![id],
                map_route_row,
            )
            .optional()?;
        Ok(route)
    }

    pub fn list_active(&self) -> RepositoryResult<Vec<CollectionRoute>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, farmer_ids, assigned_staff_id, active
            FROM collection_route
            WHERE active = 1
            ORDER BY name ASC
            "#,
        )?;
        let routes = stmt
            .query_map([], map_route_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(routes)
    }
}

fn map_route_row(row: &Row<'_>) -> SqliteResult<CollectionRoute> {
    Ok(CollectionRoute {
        id: row.get(0)?,
        name: row.get(1)?,
        farmer_ids: json_column(row, 2)?,
        assigned_staff_id: row.get(3)?,
        active: row.get(4)?,
    })
}
