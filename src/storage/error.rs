//! 儲存層錯誤定義

use thiserror::Error;

/// 儲存層錯誤類型
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("資料庫錯誤: {0}")]
    Database(#[from] sqlx::Error),

    #[error("檔案錯誤: {0}")]
    Io(#[from] std::io::Error),
}

/// 儲存層結果類型
pub type StorageResult<T> = Result<T, StorageError>;
