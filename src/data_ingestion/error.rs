//! 匯入處理錯誤定義

use thiserror::Error;

/// 匯入處理錯誤類型
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("檔案讀取錯誤: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 解析錯誤: {0}")]
    Csv(#[from] csv::Error),

    #[error("缺少必要欄位: {0}")]
    MissingColumn(String),

    #[error("無效的欄位格式: 第 {line} 行, 欄位 {column}, 值 {value}")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },
}

/// 匯入處理結果類型
pub type IngestResult<T> = Result<T, IngestError>;
