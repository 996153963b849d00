// ==========================================
// 农产品收银系统 - 鸡蛋收购数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: 只暴露实际用到的查询形态（按ID / 养殖户+日期区间 / 员工+日期区间 / 线路+日期区间）
// ==========================================

use crate::db::format_ts;
use crate::domain::collection::{DuckEggs, EggCollection, HenEggs};
use crate::repository::customer_repo::{opt_ts_column, ts_column};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const COLLECTION_COLUMNS: &str = r#"
    id, farmer_id, staff_id, route_id, collection_date,
    hen_small, hen_medium, hen_large, hen_extra_large, hen_damaged,
    duck_small, duck_medium, duck_large, duck_damaged,
    hen_egg_price, duck_egg_price,
    total_hen_eggs, total_duck_eggs, total_value,
    quality_notes, paid, payment_date, synced, created_at
"#;

// ==========================================
// EggCollectionRepository - 收购记录仓储
// ==========================================
pub struct EggCollectionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EggCollectionRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增收购记录
    pub fn insert(&self, c: &EggCollection) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO egg_collection (
                id, farmer_id, staff_id, route_id, collection_date,
                hen_small, hen_medium, hen_large, hen_extra_large, hen_damaged,
                duck_small, duck_medium, duck_large, duck_damaged,
                hen_egg_price, duck_egg_price,
                total_hen_eggs, total_duck_eggs, total_value,
                quality_notes, paid, payment_date, synced, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14,
                ?15, ?16,
                ?17, ?18, ?19,
                ?20, ?21, ?22, ?23, ?24
            )
            "#,
            params![
                c.id,
                c.farmer_id,
                c.staff_id,
                c.route_id,
                format_ts(&c.collection_date),
                c.hen_eggs.small,
                c.hen_eggs.medium,
                c.hen_eggs.large,
                c.hen_eggs.extra_large,
                c.hen_eggs.damaged,
                c.duck_eggs.small,
                c.duck_eggs.medium,
                c.duck_eggs.large,
                c.duck_eggs.damaged,
                c.hen_egg_price,
                c.duck_egg_price,
                count_param(c.total_hen_eggs)?,
                count_param(c.total_duck_eggs)?,
                c.total_value,
                c.quality_notes,
                c.paid,
                c.payment_date.as_ref().map(format_ts),
                c.synced,
                format_ts(&c.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<EggCollection>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM egg_collection WHERE id = ?1", COLLECTION_COLUMNS);
        let collection = conn
            .query_row(&sql, params![id], map_collection_row)
            .optional()?;
        Ok(collection)
    }

    /// 养殖户在 [start, end] 区间内的收购记录（按收购时间升序）
    pub fn find_by_farmer_in_range(
        &self,
        farmer_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepositoryResult<Vec<EggCollection>> {
        self.query_list(
            "farmer_id = ?1 AND collection_date >= ?2 AND collection_date <= ?3",
            vec![farmer_id.to_string(), format_ts(&start), format_ts(&end)],
        )
    }

    /// 收蛋员在 [start, end] 区间内的收购记录
    pub fn find_by_staff_in_range(
        &self,
        staff_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepositoryResult<Vec<EggCollection>> {
        self.query_list(
            "staff_id = ?1 AND collection_date >= ?2 AND collection_date <= ?3",
            vec![staff_id.to_string(), format_ts(&start), format_ts(&end)],
        )
    }

    /// 线路在 [start, end] 区间内的收购记录
    pub fn find_by_route_in_range(
        &self,
        route_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepositoryResult<Vec<EggCollection>> {
        self.query_list(
            "route_id = ?1 AND collection_date >= ?2 AND collection_date <= ?3",
            vec![route_id.to_string(), format_ts(&start), format_ts(&end)],
        )
    }

    /// 期间内全部收购记录，可按线路过滤
    pub fn find_in_period(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        route_id: Option<&str>,
    ) -> RepositoryResult<Vec<EggCollection>> {
        match route_id {
            Some(route_id) => self.find_by_route_in_range(route_id, start, end),
            None => self.query_list(
                "collection_date >= ?1 AND collection_date <= ?2",
                vec![format_ts(&start), format_ts(&end)],
            ),
        }
    }

    /// 养殖户未付款收购记录
    pub fn find_unpaid_by_farmer(&self, farmer_id: &str) -> RepositoryResult<Vec<EggCollection>> {
        self.query_list("farmer_id = ?1 AND paid = 0", vec![farmer_id.to_string()])
    }

    /// 未同步收购记录
    pub fn find_unsynced(&self) -> RepositoryResult<Vec<EggCollection>> {
        self.query_list("synced = 0", Vec::new())
    }

    /// 批量标记已同步
    ///
    /// # 返回
    /// 实际更新的记录数
    pub fn mark_synced(&self, ids: &[String]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let mut count = 0;
        for id in ids {
            count += tx.execute(
                "UPDATE egg_collection SET synced = 1 WHERE id = ?1 AND synced = 0",
                params![id],
            )?;
        }
        tx.commit()?;
        Ok(count)
    }

    fn query_list(
        &self,
        where_clause: &str,
        args: Vec<String>,
    ) -> RepositoryResult<Vec<EggCollection>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM egg_collection WHERE {} ORDER BY collection_date ASC, id ASC",
            COLLECTION_COLUMNS, where_clause
        );
        let mut stmt = conn.prepare(&sql)?;
        let collections = stmt
            .query_map(params_from_iter(args.iter()), map_collection_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(collections)
    }
}

pub(crate) fn map_collection_row(row: &Row<'_>) -> SqliteResult<EggCollection> {
    Ok(EggCollection {
        id: row.get(0)?,
        farmer_id: row.get(1)?,
        staff_id: row.get(2)?,
        route_id: row.get(3)?,
        collection_date: ts_column(row, 4)?,
        hen_eggs: HenEggs {
            small: row.get(5)?,
            medium: row.get(6)?,
            large: row.get(7)?,
            extra_large: row.get(8)?,
            damaged: row.get(9)?,
        },
        duck_eggs: DuckEggs {
            small: row.get(10)?,
            medium: row.get(11)?,
            large: row.get(12)?,
            damaged: row.get(13)?,
        },
        hen_egg_price: row.get(14)?,
        duck_egg_price: row.get(15)?,
        total_hen_eggs: count_column(row, 16)?,
        total_duck_eggs: count_column(row, 17)?,
        total_value: row.get(18)?,
        quality_notes: row.get(19)?,
        paid: row.get(20)?,
        payment_date: opt_ts_column(row, 21)?,
        synced: row.get(22)?,
        created_at: ts_column(row, 23)?,
    })
}

/// 合计列以 INTEGER (i64) 存储
fn count_param(count: u64) -> RepositoryResult<i64> {
    i64::try_from(count).map_err(|_| RepositoryError::FieldValueError {
        field: "total_eggs".to_string(),
        message: format!("合计超出存储范围: {}", count),
    })
}

fn count_column(row: &Row<'_>, idx: usize) -> SqliteResult<u64> {
    let raw: i64 = row.get(idx)?;
    u64::try_from(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Integer, Box::new(e))
    })
}
