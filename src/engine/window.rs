// ==========================================
// 农产品收银系统 - 统计时间窗口
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// 自然日区间 [00:00:00.000, 23:59:59.999]
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = start + Duration::days(1) - Duration::milliseconds(1);
    (start, end)
}

/// 以 `end` 为终点、向前 `days` 天的滚动窗口
///
/// 天数超出日期可表示范围时返回配置错误
pub fn trailing_window(end: NaiveDateTime, days: i64) -> EngineResult<(NaiveDateTime, NaiveDateTime)> {
    let start = Duration::try_days(days)
        .and_then(|span| end.checked_sub_signed(span))
        .ok_or_else(|| EngineError::Config(format!("统计窗口超出日期范围: {} 天", days)))?;
    Ok((start, end))
}
