// ==========================================
// 农产品收银系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::collection_config_trait::{
    AlertThresholds, CollectionConfigReader, ConfigResult, MarketPriceSettings, ValidationLimits,
};
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// 配置键
pub mod config_keys {
    pub const STATS_WINDOW_DAYS: &str = "stats_window_days";
    pub const DAMAGE_ALERT_THRESHOLD: &str = "damage_alert_threshold";
    pub const PRODUCTION_SHORTFALL_RATIO: &str = "production_shortfall_ratio";
    pub const OVERPRODUCTION_WARNING_RATIO: &str = "overproduction_warning_ratio";
    pub const MAX_PLAUSIBLE_EGGS: &str = "max_plausible_eggs";
    pub const ADVISORY_DAMAGE_THRESHOLD: &str = "advisory_damage_threshold";
    pub const MIN_PRICE_RATIO: &str = "min_price_ratio";
    pub const MARKET_PRICE_TTL_SECS: &str = "market_price_ttl_secs";
    pub const MARKET_PRICE_JITTER: &str = "market_price_jitter";
}

/// 默认滚动窗口天数
pub const DEFAULT_STATS_WINDOW_DAYS: i64 = 30;

/// 滚动窗口天数上限（约 10 年）
pub const MAX_STATS_WINDOW_DAYS: i64 = 3650;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取并解析配置值；缺失或格式错误时回退默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr + Copy,
    {
        match self.get_config_value(key)? {
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    tracing::warn!("配置值格式错误，使用默认值: key={}, value={}", key, raw);
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
            ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        tracing::info!("配置已更新: {}={}", key, value);
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

#[async_trait]
impl CollectionConfigReader for ConfigManager {
    async fn get_stats_window_days(&self) -> ConfigResult<i64> {
        let days =
            self.get_parsed_or_default(config_keys::STATS_WINDOW_DAYS, DEFAULT_STATS_WINDOW_DAYS)?;
        if days <= 0 || days > MAX_STATS_WINDOW_DAYS {
            tracing::warn!("stats_window_days 越界({})，使用默认值", days);
            return Ok(DEFAULT_STATS_WINDOW_DAYS);
        }
        Ok(days)
    }

    async fn get_alert_thresholds(&self) -> ConfigResult<AlertThresholds> {
        let d = AlertThresholds::default();
        Ok(AlertThresholds {
            damage_alert_threshold: self.get_parsed_or_default(
                config_keys::DAMAGE_ALERT_THRESHOLD,
                d.damage_alert_threshold,
            )?,
            production_shortfall_ratio: self.get_parsed_or_default(
                config_keys::PRODUCTION_SHORTFALL_RATIO,
                d.production_shortfall_ratio,
            )?,
        })
    }

    async fn get_validation_limits(&self) -> ConfigResult<ValidationLimits> {
        let d = ValidationLimits::default();
        Ok(ValidationLimits {
            overproduction_warning_ratio: self.get_parsed_or_default(
                config_keys::OVERPRODUCTION_WARNING_RATIO,
                d.overproduction_warning_ratio,
            )?,
            max_plausible_eggs: self
                .get_parsed_or_default(config_keys::MAX_PLAUSIBLE_EGGS, d.max_plausible_eggs)?,
            advisory_damage_threshold: self.get_parsed_or_default(
                config_keys::ADVISORY_DAMAGE_THRESHOLD,
                d.advisory_damage_threshold,
            )?,
            min_price_ratio: self
                .get_parsed_or_default(config_keys::MIN_PRICE_RATIO, d.min_price_ratio)?,
        })
    }

    async fn get_market_price_settings(&self) -> ConfigResult<MarketPriceSettings> {
        let d = MarketPriceSettings::default();
        Ok(MarketPriceSettings {
            ttl_secs: self.get_parsed_or_default(config_keys::MARKET_PRICE_TTL_SECS, d.ttl_secs)?,
            jitter: self.get_parsed_or_default(config_keys::MARKET_PRICE_JITTER, d.jitter)?,
        }
        .validated())
    }
}
