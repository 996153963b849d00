// ==========================================
// 农产品收银系统 - 客户数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::{format_ts, parse_ts};
use crate::domain::party::{Customer, EggProduction};
use crate::domain::types::CustomerType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{Local, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex};

const CUSTOMER_COLUMNS: &str = r#"
    id, customer_type, contact_person, business_name, phone, active,
    credit_limit, credit_balance, expected_hen_eggs, expected_duck_eggs,
    total_egg_sales, created_at, updated_at
"#;

// ==========================================
// CustomerRepository - 客户仓储
// ==========================================
/// 客户仓储
/// 职责: 管理 customer 表的读写
pub struct CustomerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CustomerRepository {
    /// 创建新的 CustomerRepository 实例
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增客户
    pub fn insert(&self, customer: &Customer) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO customer (
                id, customer_type, contact_person, business_name, phone, active,
                credit_limit, credit_balance, expected_hen_eggs, expected_duck_eggs,
                total_egg_sales, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                customer.id,
                customer.customer_type.to_db_str(),
                customer.contact_person,
                customer.business_name,
                customer.phone,
                customer.active,
                customer.credit_limit,
                customer.credit_balance,
                customer.egg_production.hen_eggs,
                customer.egg_production.duck_eggs,
                customer.total_egg_sales,
                format_ts(&customer.created_at),
                format_ts(&customer.updated_at),
            ],
        )?;
        Ok(())
    }

    /// 按主键查询
    ///
    /// # 返回
    /// - Ok(Some(Customer)): 找到客户
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Customer>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM customer WHERE id = ?1", CUSTOMER_COLUMNS);
        let customer = conn
            .query_row(&sql, params![id], map_customer_row)
            .optional()?;
        Ok(customer)
    }

    /// 查询所有在用养殖户
    pub fn list_active_farmers(&self) -> RepositoryResult<Vec<Customer>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM customer WHERE customer_type = ?1 AND active = 1 ORDER BY contact_person ASC",
            CUSTOMER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let customers = stmt
            .query_map(params![CustomerType::Farmer.to_db_str()], map_customer_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(customers)
    }

    /// 记录一次收蛋入账（相对更新，避免读改写覆盖）
    ///
    /// - credit_balance -= value
    /// - total_egg_sales += value
    pub fn apply_egg_sale(&self, farmer_id: &str, value: f64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE customer
            SET credit_balance = credit_balance - ?2,
                total_egg_sales = total_egg_sales + ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
            params![farmer_id, value, format_ts(&Local::now().naive_local())],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Customer".to_string(),
                id: farmer_id.to_string(),
            });
        }
        Ok(())
    }

    /// 更新日均产蛋量
    pub fn update_egg_production(
        &self,
        farmer_id: &str,
        production: &EggProduction,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE customer
            SET expected_hen_eggs = ?2, expected_duck_eggs = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
            params![
                farmer_id,
                production.hen_eggs,
                production.duck_eggs,
                format_ts(&Local::now().naive_local())
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Customer".to_string(),
                id: farmer_id.to_string(),
            });
        }
        Ok(())
    }
}

fn map_customer_row(row: &Row<'_>) -> SqliteResult<Customer> {
    let raw_type: String = row.get(1)?;
    let customer_type = CustomerType::from_db_str(&raw_type)
        .ok_or_else(|| text_conversion_error(1, format!("未知客户类型: {}", raw_type)))?;
    Ok(Customer {
        id: row.get(0)?,
        customer_type,
        contact_person: row.get(2)?,
        business_name: row.get(3)?,
        phone: row.get(4)?,
        active: row.get(5)?,
        credit_limit: row.get(6)?,
        credit_balance: row.get(7)?,
        egg_production: EggProduction {
            hen_eggs: row.get(8)?,
            duck_eggs: row.get(9)?,
        },
        total_egg_sales: row.get(10)?,
        created_at: ts_column(row, 11)?,
        updated_at: ts_column(row, 12)?,
    })
}

// ==========================================
// 列解析辅助（各仓储共用）
// ==========================================
// 格式异常一律返回列转换错误，由 RepositoryError 归为 FieldValueError

/// 文本列内容无法解析
pub(crate) fn text_conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

/// 读取时间戳列
pub(crate) fn ts_column(row: &Row<'_>, idx: usize) -> SqliteResult<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    parse_ts(&raw).ok_or_else(|| text_conversion_error(idx, format!("无效时间戳: {}", raw)))
}

/// 读取可空时间戳列
pub(crate) fn opt_ts_column(row: &Row<'_>, idx: usize) -> SqliteResult<Option<NaiveDateTime>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(s) => parse_ts(&s)
            .map(Some)
            .ok_or_else(|| text_conversion_error(idx, format!("无效时间戳: {}", s))),
        None => Ok(None),
    }
}

/// 读取 JSON 文本列
pub(crate) fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> SqliteResult<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| text_conversion_error(idx, format!("无效JSON: {}", e)))
}
