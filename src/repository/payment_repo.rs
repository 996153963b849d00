// ==========================================
// 农产品收银系统 - 付款数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::format_ts;
use crate::domain::payment::Payment;
use crate::domain::types::PaymentMethod;
use crate::repository::customer_repo::{text_conversion_error, ts_column};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// PaymentRepository - 付款仓储
// ==========================================
pub struct PaymentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PaymentRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 收蛋付款：写入付款记录并将对应收购标记为已付（同一事务）
    ///
    /// 收购不存在或已付款时回滚并返回错误
    pub fn insert_collection_payment(&self, payment: &Payment) -> RepositoryResult<()> {
        let collection_id = payment.collection_id.as_deref().ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "collection_id".to_string(),
                message: "收蛋付款必须关联收购记录".to_string(),
            }
        })?;

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let affected = tx.execute(
            r#"
            UPDATE egg_collection
            SET paid = 1, payment_date = ?2
            WHERE id = ?1 AND paid = 0
            "#,
            params![collection_id, format_ts(&payment.payment_date)],
        )?;
        if affected == 0 {
            // 事务随 tx drop 回滚
            return Err(RepositoryError::NotFound {
                entity: "UnpaidEggCollection".to_string(),
                id: collection_id.to_string(),
            });
        }

        tx.execute(
            r#"
            INSERT INTO payment (
                id, customer_id, collection_id, amount, payment_method,
                payment_type, staff_id, payment_date, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                payment.id,
                payment.customer_id,
                payment.collection_id,
                payment.amount,
                payment.payment_method.to_db_str(),
                payment.payment_type,
                payment.staff_id,
                format_ts(&payment.payment_date),
                payment.notes,
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// 查询客户付款记录（按付款时间倒序）
    pub fn find_by_customer(&self, customer_id: &str) -> RepositoryResult<Vec<Payment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, customer_id, collection_id, amount, payment_method,
                   payment_type, staff_id, payment_date, notes
            FROM payment
            WHERE customer_id = ?1
            ORDER BY payment_date DESC
            "#,
        )?;
        let payments = stmt
            .query_map(params![customer_id], map_payment_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(payments)
    }
}

fn map_payment_row(row: &Row<'_>) -> SqliteResult<Payment> {
    let raw_method: String = row.get(4)?;
    let payment_method = PaymentMethod::from_db_str(&raw_method)
        .ok_or_else(|| text_conversion_error(4, format!("未知付款方式: {}", raw_method)))?;
    Ok(Payment {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        collection_id: row.get(2)?,
        amount: row.get(3)?,
        payment_method,
        payment_type: row.get(5)?,
        staff_id: row.get(6)?,
        payment_date: ts_column(row, 7)?,
        notes: row.get(8)?,
    })
}
