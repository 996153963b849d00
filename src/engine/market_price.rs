// ==========================================
// 农产品收银系统 - 市场行情提供者
// ==========================================
// 职责: 提供当前每打蛋价
// 规则: 缓存缺失或超过 TTL 时，基于兜底行情表加随机抖动重新生成
// 说明: 实例由 AppState 显式持有，无全局状态；并发刷新不加锁保护（结果同形）
// ==========================================

use crate::config::{CollectionConfigReader, MarketPriceSettings};
use crate::domain::market::{DuckEggPrices, HenEggPrices, MarketPrices};
use chrono::{Duration, Local, NaiveDateTime};
use rand::Rng;
use std::sync::Arc;
use tokio::sync::RwLock;

// ==========================================
// MarketPriceProvider - 行情提供者
// ==========================================
pub struct MarketPriceProvider {
    config: Arc<dyn CollectionConfigReader>,
    cache: RwLock<Option<MarketPrices>>,
}

impl MarketPriceProvider {
    pub fn new(config: Arc<dyn CollectionConfigReader>) -> Self {
        Self {
            config,
            cache: RwLock::new(None),
        }
    }

    /// 当前行情（命中缓存直接返回）
    pub async fn current_prices(&self) -> MarketPrices {
        let settings = match self.config.get_market_price_settings().await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("读取行情配置失败，使用默认值: {}", e);
                MarketPriceSettings::default()
            }
        }
        .validated();
        let now = Local::now().naive_local();

        {
            let cache = self.cache.read().await;
            if let Some(prices) = cache.as_ref() {
                if is_fresh(prices, now, settings.ttl_secs) {
                    return *prices;
                }
            }
        }

        let prices = generate_prices(settings.jitter, now);
        *self.cache.write().await = Some(prices);
        tracing::info!(
            "行情已刷新: hen_large={:.2}, duck_large={:.2}",
            prices.hen_eggs.large,
            prices.duck_eggs.large
        );
        prices
    }
}

fn is_fresh(prices: &MarketPrices, now: NaiveDateTime, ttl_secs: i64) -> bool {
    match Duration::try_seconds(ttl_secs) {
        Some(ttl) => now.signed_duration_since(prices.last_updated) < ttl,
        None => false,
    }
}

/// 兜底行情 × (1 ± jitter)，每个价格独立抖动
///
/// jitter 须已经过 `MarketPriceSettings::validated`；非正或 NaN 时不抖动
fn generate_prices(jitter: f64, now: NaiveDateTime) -> MarketPrices {
    let base = MarketPrices::fallback(now);
    let mut rng = rand::thread_rng();
    let mut j = |price: f64| {
        if !(jitter > 0.0) {
            price
        } else {
            price * (1.0 + rng.gen_range(-jitter..=jitter))
        }
    };

    MarketPrices {
        hen_eggs: HenEggPrices {
            small: j(base.hen_eggs.small),
            medium: j(base.hen_eggs.medium),
            large: j(base.hen_eggs.large),
            extra_large: j(base.hen_eggs.extra_large),
        },
        duck_eggs: DuckEggPrices {
            small: j(base.duck_eggs.small),
            medium: j(base.duck_eggs.medium),
            large: j(base.duck_eggs.large),
        },
        last_updated: now,
    }
}
