// ==========================================
// 农产品收银系统 - 收蛋配置读取 Trait
// ==========================================
// 职责: 定义收蛋引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;

pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// 配置分组
// ==========================================

/// 告警阈值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// 单蛋种破损率超过该值触发质量告警
    pub damage_alert_threshold: f64,
    /// 实收低于预期产量的该比例触发产量告警
    pub production_shortfall_ratio: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            damage_alert_threshold: 0.10,
            production_shortfall_ratio: 0.50,
        }
    }
}

/// 登记校验限值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationLimits {
    /// 超过预期日产该倍数时仅告警
    pub overproduction_warning_ratio: f64,
    /// 单次收购合理上限
    pub max_plausible_eggs: u64,
    /// 预校验破损率告警线
    pub advisory_damage_threshold: f64,
    /// 单价低于行情大号蛋价格的该比例时告警
    pub min_price_ratio: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            overproduction_warning_ratio: 1.5,
            max_plausible_eggs: 1000,
            advisory_damage_threshold: 0.20,
            min_price_ratio: 0.50,
        }
    }
}

/// 行情缓存参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketPriceSettings {
    pub ttl_secs: i64,
    /// 刷新时随机抖动幅度（0.10 = ±10%）
    pub jitter: f64,
}

impl Default for MarketPriceSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            jitter: 0.10,
        }
    }
}

/// 行情缓存 TTL 上限（7 天）
pub const MAX_MARKET_PRICE_TTL_SECS: i64 = 7 * 24 * 3600;

impl MarketPriceSettings {
    /// 逐字段校正越界参数，越界项回退默认值
    ///
    /// - ttl_secs: (0, MAX_MARKET_PRICE_TTL_SECS]
    /// - jitter: 有限值且 0 <= jitter < 1，保证抖动后价格为正
    pub fn validated(self) -> Self {
        let d = Self::default();
        let ttl_secs = if self.ttl_secs > 0 && self.ttl_secs <= MAX_MARKET_PRICE_TTL_SECS {
            self.ttl_secs
        } else {
            tracing::warn!("market_price_ttl_secs 越界({})，使用默认值", self.ttl_secs);
            d.ttl_secs
        };
        let jitter = if self.jitter.is_finite() && (0.0..1.0).contains(&self.jitter) {
            self.jitter
        } else {
            tracing::warn!("market_price_jitter 越界({})，使用默认值", self.jitter);
            d.jitter
        };
        Self { ttl_secs, jitter }
    }
}

// ==========================================
// CollectionConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait CollectionConfigReader: Send + Sync {
    /// 滚动统计窗口天数
    ///
    /// # 默认值
    /// - 30
    async fn get_stats_window_days(&self) -> ConfigResult<i64>;

    /// 告警阈值
    async fn get_alert_thresholds(&self) -> ConfigResult<AlertThresholds>;

    /// 登记校验限值
    async fn get_validation_limits(&self) -> ConfigResult<ValidationLimits>;

    /// 行情缓存参数
    async fn get_market_price_settings(&self) -> ConfigResult<MarketPriceSettings>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(ttl_secs: i64, jitter: f64) -> MarketPriceSettings {
        MarketPriceSettings { ttl_secs, jitter }.validated()
    }

    #[test]
    fn test_validated_keeps_sane_values() {
        assert_eq!(settings(600, 0.0), MarketPriceSettings { ttl_secs: 600, jitter: 0.0 });
        assert_eq!(settings(600, 0.5).jitter, 0.5);
    }

    #[test]
    fn test_validated_rejects_bad_jitter() {
        let d = MarketPriceSettings::default();
        assert_eq!(settings(600, f64::NAN).jitter, d.jitter);
        assert_eq!(settings(600, f64::INFINITY).jitter, d.jitter);
        assert_eq!(settings(600, 1.0).jitter, d.jitter);
        assert_eq!(settings(600, -0.2).jitter, d.jitter);
    }

    #[test]
    fn test_validated_rejects_bad_ttl() {
        let d = MarketPriceSettings::default();
        assert_eq!(settings(0, 0.1).ttl_secs, d.ttl_secs);
        assert_eq!(settings(-5, 0.1).ttl_secs, d.ttl_secs);
        assert_eq!(settings(i64::MAX, 0.1).ttl_secs, d.ttl_secs);
        assert_eq!(settings(MAX_MARKET_PRICE_TTL_SECS, 0.1).ttl_secs, MAX_MARKET_PRICE_TTL_SECS);
    }
}
