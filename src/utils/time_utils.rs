// time_utils.rs
//
// 資料庫以 Unix 秒儲存時間，這裡提供與 chrono 之間的轉換。

use chrono::{DateTime, TimeZone, Utc};

/// 當前 Unix 秒
pub fn current_timestamp_secs() -> i64 {
    Utc::now().timestamp()
}

/// Unix 秒轉為 DateTime<Utc>，超出範圍時回傳 None
pub fn timestamp_secs_to_datetime(ts: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(ts, 0).single()
}

/// 供命令列輸出使用的時間字串
pub fn format_timestamp_secs(ts: i64) -> String {
    timestamp_secs_to_datetime(ts)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}
