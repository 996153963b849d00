// ==========================================
// 农产品收银系统 - 告警通知发送
// ==========================================
// 职责: 定义通知发送 trait，引擎层只依赖 trait
// 说明: 发送失败不得影响收购登记结果
// ==========================================

use crate::domain::notification::{Notification, ProductionAlert, QualityAlert};
use crate::domain::types::NotificationType;
use crate::repository::NotificationRepository;
use chrono::Local;
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;

pub type NotifyResult = Result<(), Box<dyn Error + Send + Sync>>;

// ==========================================
// NotificationSink Trait
// ==========================================

/// 告警通知接收方
///
/// # 实现说明
/// - `PersistentNotificationSink`: 写入 notification 表
/// - `TracingNotificationSink`: 仅输出日志
/// - `NoOpNotificationSink`: 单元测试使用
pub trait NotificationSink: Send + Sync {
    fn send_quality_alert(&self, alert: &QualityAlert) -> NotifyResult;

    fn send_production_alert(&self, alert: &ProductionAlert) -> NotifyResult;
}

/// 空操作通知
#[derive(Debug, Clone, Default)]
pub struct NoOpNotificationSink;

impl NotificationSink for NoOpNotificationSink {
    fn send_quality_alert(&self, alert: &QualityAlert) -> NotifyResult {
        tracing::debug!("NoOpNotificationSink: 跳过质量告警 collection_id={}", alert.collection_id);
        Ok(())
    }

    fn send_production_alert(&self, alert: &ProductionAlert) -> NotifyResult {
        tracing::debug!("NoOpNotificationSink: 跳过产量告警 collection_id={}", alert.collection_id);
        Ok(())
    }
}

/// 仅记录日志的通知
#[derive(Debug, Clone, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn send_quality_alert(&self, alert: &QualityAlert) -> NotifyResult {
        tracing::warn!(
            farmer_id = %alert.farmer_id,
            collection_id = %alert.collection_id,
            damage_rate = alert.damage_rate,
            "{}",
            alert.message()
        );
        Ok(())
    }

    fn send_production_alert(&self, alert: &ProductionAlert) -> NotifyResult {
        tracing::warn!(
            farmer_id = %alert.farmer_id,
            collection_id = %alert.collection_id,
            "{}",
            alert.message()
        );
        Ok(())
    }
}

// ==========================================
// PersistentNotificationSink - 落库通知
// ==========================================
pub struct PersistentNotificationSink {
    notification_repo: Arc<NotificationRepository>,
}

impl PersistentNotificationSink {
    pub fn new(notification_repo: Arc<NotificationRepository>) -> Self {
        Self { notification_repo }
    }

    fn store(
        &self,
        notification_type: NotificationType,
        title: String,
        message: String,
        payload: serde_json::Value,
    ) -> NotifyResult {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            notification_type,
            title,
            message,
            payload_json: Some(payload),
            read: false,
            created_at: Local::now().naive_local(),
        };
        self.notification_repo.insert(&notification)?;
        Ok(())
    }
}

impl NotificationSink for PersistentNotificationSink {
    fn send_quality_alert(&self, alert: &QualityAlert) -> NotifyResult {
        self.store(
            NotificationType::QualityAlert,
            alert.title(),
            alert.message(),
            serde_json::to_value(alert)?,
        )
    }

    fn send_production_alert(&self, alert: &ProductionAlert) -> NotifyResult {
        self.store(
            NotificationType::ProductionAlert,
            alert.title(),
            alert.message(),
            serde_json::to_value(alert)?,
        )
    }
}
