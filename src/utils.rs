// utils.rs - 公共工具模組

pub mod time_utils;

// 重新導出時間工具函數，使其可以通過 utils::function_name 直接訪問
pub use time_utils::{current_timestamp_secs, format_timestamp_secs, timestamp_secs_to_datetime};
