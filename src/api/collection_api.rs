// ==========================================
// 农产品收银系统 - 收购登记 API
// ==========================================
// 职责: 收购登记、预提交校验、当前行情、告警通知查询
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::collection::NewCollectionRequest;
use crate::domain::market::MarketPrices;
use crate::domain::notification::Notification;
use crate::engine::market_price::MarketPriceProvider;
use crate::engine::recorder::{CollectionRecorder, RecordOutcome};
use crate::engine::validator::{CollectionValidator, ValidationReport};
use crate::repository::NotificationRepository;

// ==========================================
// CollectionApi - 收购登记 API
// ==========================================

/// 收购登记API
///
/// 职责：
/// 1. 收购登记（校验 → 落库 → 提交后任务）
/// 2. 预提交校验（界面即时反馈）
/// 3. 行情查询
/// 4. 告警通知查询与已读
pub struct CollectionApi {
    recorder: Arc<CollectionRecorder>,
    validator: Arc<CollectionValidator>,
    market_prices: Arc<MarketPriceProvider>,
    notification_repo: Arc<NotificationRepository>,
}

impl CollectionApi {
    pub fn new(
        recorder: Arc<CollectionRecorder>,
        validator: Arc<CollectionValidator>,
        market_prices: Arc<MarketPriceProvider>,
        notification_repo: Arc<NotificationRepository>,
    ) -> Self {
        Self {
            recorder,
            validator,
            market_prices,
            notification_repo,
        }
    }

    /// 登记一次收购
    ///
    /// # 返回
    /// - Ok(RecordOutcome): 已落库的收购记录 + 提交后任务报告
    /// - Err(ApiError::ValidationFailed): 校验失败，未落库
    pub async fn record_collection(&self, request: NewCollectionRequest) -> ApiResult<RecordOutcome> {
        let request = normalize_request(request);
        let outcome = self.recorder.record_collection(request).await?;
        Ok(outcome)
    }

    /// 预提交校验（不落库、不抛业务错误）
    pub async fn validate_collection_data(
        &self,
        request: NewCollectionRequest,
    ) -> ApiResult<ValidationReport> {
        let request = normalize_request(request);
        Ok(self.validator.validate_collection_data(&request).await?)
    }

    /// 当前每打行情
    pub async fn current_market_prices(&self) -> MarketPrices {
        self.market_prices.current_prices().await
    }

    /// 未读告警通知（按时间倒序）
    pub fn list_unread_notifications(&self) -> ApiResult<Vec<Notification>> {
        Ok(self.notification_repo.list_unread()?)
    }

    pub fn mark_notification_read(&self, notification_id: &str) -> ApiResult<()> {
        if notification_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("通知ID不能为空".to_string()));
        }
        self.notification_repo.mark_read(notification_id)?;
        Ok(())
    }
}

/// 空白线路ID视为未指定线路
///
/// 空白养殖户/收蛋员ID原样交给校验器，由其判为 InvalidFarmer / UnauthorizedStaff
fn normalize_request(mut request: NewCollectionRequest) -> NewCollectionRequest {
    if request
        .route_id
        .as_deref()
        .map(|r| r.trim().is_empty())
        .unwrap_or(false)
    {
        request.route_id = None;
    }
    request
}
