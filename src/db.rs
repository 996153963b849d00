// ==========================================
// 农产品收银系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 幂等建表（不做自动迁移）
// ==========================================

use chrono::NaiveDateTime;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 时间戳存储格式
///
/// 说明：定长 ISO-8601 文本，区间过滤可直接按字符串比较
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 格式化时间戳
pub fn format_ts(ts: &NaiveDateTime) -> String {
    ts.format(DATETIME_FORMAT).to_string()
}

/// 解析时间戳（兼容无毫秒/空格分隔的旧数据）
pub fn parse_ts(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// 建表（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_scope (
            scope_id TEXT PRIMARY KEY,
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(scope_type, scope_key)
        );

        INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
        VALUES ('global', 'GLOBAL', 'global');

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS customer (
            id TEXT PRIMARY KEY,
            customer_type TEXT NOT NULL,
            contact_person TEXT NOT NULL,
            business_name TEXT,
            phone TEXT,
            active INTEGER NOT NULL DEFAULT 1,
            credit_limit REAL NOT NULL DEFAULT 0,
            credit_balance REAL NOT NULL DEFAULT 0,
            expected_hen_eggs REAL NOT NULL DEFAULT 0,
            expected_duck_eggs REAL NOT NULL DEFAULT 0,
            total_egg_sales REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS staff (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1,
            permissions TEXT NOT NULL DEFAULT '[]',
            total_collections INTEGER NOT NULL DEFAULT 0,
            average_quality REAL NOT NULL DEFAULT 0,
            on_time_rate REAL NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS collection_route (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            farmer_ids TEXT NOT NULL DEFAULT '[]',
            assigned_staff_id TEXT,
            active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS egg_collection (
            id TEXT PRIMARY KEY,
            farmer_id TEXT NOT NULL REFERENCES customer(id),
            staff_id TEXT NOT NULL REFERENCES staff(id),
            route_id TEXT REFERENCES collection_route(id),
            collection_date TEXT NOT NULL,
            hen_small INTEGER NOT NULL DEFAULT 0,
            hen_medium INTEGER NOT NULL DEFAULT 0,
            hen_large INTEGER NOT NULL DEFAULT 0,
            hen_extra_large INTEGER NOT NULL DEFAULT 0,
            hen_damaged INTEGER NOT NULL DEFAULT 0,
            duck_small INTEGER NOT NULL DEFAULT 0,
            duck_medium INTEGER NOT NULL DEFAULT 0,
            duck_large INTEGER NOT NULL DEFAULT 0,
            duck_damaged INTEGER NOT NULL DEFAULT 0,
            hen_egg_price REAL NOT NULL,
            duck_egg_price REAL NOT NULL,
            total_hen_eggs INTEGER NOT NULL,
            total_duck_eggs INTEGER NOT NULL,
            total_value REAL NOT NULL,
            quality_notes TEXT,
            paid INTEGER NOT NULL DEFAULT 0,
            payment_date TEXT,
            synced INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_egg_collection_farmer_date
            ON egg_collection(farmer_id, collection_date);
        CREATE INDEX IF NOT EXISTS idx_egg_collection_staff_date
            ON egg_collection(staff_id, collection_date);
        CREATE INDEX IF NOT EXISTS idx_egg_collection_route_date
            ON egg_collection(route_id, collection_date);
        CREATE INDEX IF NOT EXISTS idx_egg_collection_date
            ON egg_collection(collection_date);

        CREATE TABLE IF NOT EXISTS payment (
            id TEXT PRIMARY KEY,
            customer_id TEXT NOT NULL REFERENCES customer(id),
            collection_id TEXT REFERENCES egg_collection(id),
            amount REAL NOT NULL,
            payment_method TEXT NOT NULL,
            payment_type TEXT NOT NULL,
            staff_id TEXT NOT NULL,
            payment_date TEXT NOT NULL,
            notes TEXT
        );

        CREATE TABLE IF NOT EXISTS notification (
            id TEXT PRIMARY KEY,
            notification_type TEXT NOT NULL,
            title TEXT NOT NULL,
            message TEXT NOT NULL,
            payload_json TEXT,
            is_read INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
