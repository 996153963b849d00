// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use egg_collection::config::{
    AlertThresholds, CollectionConfigReader, ConfigResult, MarketPriceSettings, ValidationLimits,
};

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub stats_window_days: i64,
    pub alert_thresholds: AlertThresholds,
    pub validation_limits: ValidationLimits,
    pub market_price_settings: MarketPriceSettings,
    /// 为 true 时所有读取均返回错误
    pub fail: bool,
}

impl MockConfig {
    /// 默认配置（行情无抖动，便于断言）
    pub fn default() -> Self {
        Self {
            stats_window_days: 30,
            alert_thresholds: AlertThresholds::default(),
            validation_limits: ValidationLimits::default(),
            market_price_settings: MarketPriceSettings {
                ttl_secs: 3600,
                jitter: 0.0,
            },
            fail: false,
        }
    }

    pub fn with_window_days(days: i64) -> Self {
        let mut config = Self::default();
        config.stats_window_days = days;
        config
    }

    /// 所有读取失败（引擎应回退到默认值）
    pub fn failing() -> Self {
        let mut config = Self::default();
        config.fail = true;
        config
    }

    fn check(&self) -> ConfigResult<()> {
        if self.fail {
            return Err("mock config unavailable".into());
        }
        Ok(())
    }
}

#[async_trait]
impl CollectionConfigReader for MockConfig {
    async fn get_stats_window_days(&self) -> ConfigResult<i64> {
        self.check()?;
        Ok(self.stats_window_days)
    }

    async fn get_alert_thresholds(&self) -> ConfigResult<AlertThresholds> {
        self.check()?;
        Ok(self.alert_thresholds)
    }

    async fn get_validation_limits(&self) -> ConfigResult<ValidationLimits> {
        self.check()?;
        Ok(self.validation_limits)
    }

    async fn get_market_price_settings(&self) -> ConfigResult<MarketPriceSettings> {
        self.check()?;
        Ok(self.market_price_settings)
    }
}
