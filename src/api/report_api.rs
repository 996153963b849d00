// ==========================================
// 农产品收银系统 - 报表与结算 API
// ==========================================
// 职责: 期间汇总、日报、CSV 导出、批量付款、养殖户视图、同步标记
// ==========================================

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::collection::EggCollection;
use crate::domain::payment::BatchPaymentResult;
use crate::domain::report::{DailyReport, FarmerPerformance, OutstandingBalance, PeriodSummary};
use crate::domain::types::PaymentMethod;
use crate::engine::reporting::ReportingEngine;
use crate::engine::window::day_bounds;

/// 解析 YYYY-MM-DD
pub fn parse_date(raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| ApiError::InvalidInput(format!("日期格式错误({}): {}", raw, e)))
}

/// 日期区间转换为 [起始日 00:00:00.000, 结束日 23:59:59.999]
pub fn date_range(start: NaiveDate, end: NaiveDate) -> ApiResult<(NaiveDateTime, NaiveDateTime)> {
    if start > end {
        return Err(ApiError::InvalidInput(format!(
            "开始日期({})不能晚于结束日期({})",
            start, end
        )));
    }
    Ok((day_bounds(start).0, day_bounds(end).1))
}

fn check_period(start: NaiveDateTime, end: NaiveDateTime) -> ApiResult<()> {
    if start > end {
        return Err(ApiError::InvalidInput(format!(
            "开始时间({})不能晚于结束时间({})",
            start, end
        )));
    }
    Ok(())
}

fn non_blank(value: &str, label: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{}不能为空", label)));
    }
    Ok(())
}

// ==========================================
// ReportApi - 报表与结算 API
// ==========================================
pub struct ReportApi {
    reporting: Arc<ReportingEngine>,
}

impl ReportApi {
    pub fn new(reporting: Arc<ReportingEngine>) -> Self {
        Self { reporting }
    }

    pub fn summarize_period(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        route_id: Option<&str>,
    ) -> ApiResult<PeriodSummary> {
        check_period(start, end)?;
        Ok(self.reporting.summarize_period(start, end, route_id)?)
    }

    pub async fn daily_report(&self, date: NaiveDate) -> ApiResult<DailyReport> {
        Ok(self.reporting.daily_report(date).await?)
    }

    /// 导出 CSV 文本
    pub fn export_csv(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        route_id: Option<&str>,
    ) -> ApiResult<String> {
        check_period(start, end)?;
        Ok(self.reporting.export_csv(start, end, route_id)?)
    }

    /// 批量付款
    ///
    /// # 返回
    /// 单条失败不影响其他条目，失败明细见 `failures`
    pub fn process_batch_payment(
        &self,
        collection_ids: &[String],
        payment_method: PaymentMethod,
        staff_id: &str,
    ) -> ApiResult<BatchPaymentResult> {
        if collection_ids.is_empty() {
            return Err(ApiError::InvalidInput("收购记录ID列表不能为空".to_string()));
        }
        non_blank(staff_id, "经办人ID")?;
        Ok(self
            .reporting
            .process_batch_payment(collection_ids, payment_method, staff_id))
    }

    pub fn farmer_collections(
        &self,
        farmer_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ApiResult<Vec<EggCollection>> {
        non_blank(farmer_id, "养殖户ID")?;
        check_period(start, end)?;
        Ok(self.reporting.farmer_collections(farmer_id, start, end)?)
    }

    pub async fn farmer_performance(
        &self,
        farmer_id: &str,
        as_of: NaiveDateTime,
    ) -> ApiResult<FarmerPerformance> {
        non_blank(farmer_id, "养殖户ID")?;
        Ok(self.reporting.farmer_performance(farmer_id, as_of).await?)
    }

    pub fn outstanding_balance(&self, farmer_id: &str) -> ApiResult<OutstandingBalance> {
        non_blank(farmer_id, "养殖户ID")?;
        Ok(self.reporting.outstanding_balance(farmer_id)?)
    }

    pub fn list_unsynced(&self) -> ApiResult<Vec<EggCollection>> {
        Ok(self.reporting.list_unsynced()?)
    }

    pub fn mark_synced(&self, collection_ids: &[String]) -> ApiResult<usize> {
        Ok(self.reporting.mark_synced(collection_ids)?)
    }
}
