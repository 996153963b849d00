// ==========================================
// 测试用通知接收方
// ==========================================

use egg_collection::domain::notification::{ProductionAlert, QualityAlert};
use egg_collection::engine::{NotificationSink, NotifyResult};
use std::sync::Mutex;

/// 记录所有收到的告警
#[derive(Default)]
pub struct CapturingSink {
    pub quality: Mutex<Vec<QualityAlert>>,
    pub production: Mutex<Vec<ProductionAlert>>,
}

impl CapturingSink {
    pub fn quality_alerts(&self) -> Vec<QualityAlert> {
        self.quality.lock().unwrap().clone()
    }

    pub fn production_alerts(&self) -> Vec<ProductionAlert> {
        self.production.lock().unwrap().clone()
    }
}

impl NotificationSink for CapturingSink {
    fn send_quality_alert(&self, alert: &QualityAlert) -> NotifyResult {
        self.quality.lock().unwrap().push(alert.clone());
        Ok(())
    }

    fn send_production_alert(&self, alert: &ProductionAlert) -> NotifyResult {
        self.production.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

/// 发送总是失败
#[derive(Default)]
pub struct FailingSink;

impl NotificationSink for FailingSink {
    fn send_quality_alert(&self, _alert: &QualityAlert) -> NotifyResult {
        Err("notification service down".into())
    }

    fn send_production_alert(&self, _alert: &ProductionAlert) -> NotifyResult {
        Err("notification service down".into())
    }
}
