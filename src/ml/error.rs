use crate::storage::StorageError;
use polars::error::PolarsError;
use thiserror::Error;

/// 訓練與推論錯誤類型
#[derive(Error, Debug)]
pub enum PipelineError {
    /// 缺少必要欄位、資料集為空或數值無效
    #[error("資料格式錯誤: {0}")]
    DataFormat(String),

    /// 模型檔不存在、損毀或版本不支援
    #[error("模型載入失敗: {0}")]
    ModelLoad(String),

    /// 輸入特徵與訓練時的欄位不一致
    #[error("特徵欄位不一致: 缺少 {missing:?}, 多出 {unexpected:?}")]
    SchemaMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("IO 錯誤: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars 錯誤: {0}")]
    Polars(#[from] PolarsError),

    #[error("序列化錯誤: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("儲存錯誤: {0}")]
    Storage(#[from] StorageError),
}

/// 管線結果類型別名
pub type PipelineResult<T> = Result<T, PipelineError>;
