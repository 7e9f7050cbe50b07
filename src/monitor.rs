//! 日誌輸出設定

pub mod logger;

pub use logger::init_logging;

/// 日誌系統錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// 配置內容無法轉成訂閱器設定
    #[error("日誌配置錯誤: {0}")]
    LoggerError(String),

    /// 全域訂閱器已存在或輸出目錄無法建立
    #[error("日誌初始化失敗: {0}")]
    InitializationError(String),
}

pub type MonitorResult<T> = Result<T, MonitorError>;
