//! 價格預測模組
//!
//! 訓練：CSV → 預處理 → 最小平方法線性迴歸 → 模型檔。
//! 推論：模型檔 → 依訓練欄位順序組成特徵向量 → 預測值（可選擇寫回資料庫）。

pub mod artifact;
pub mod error;
pub mod predictor;
pub mod regression;
pub mod trainer;

pub use artifact::{ModelArtifact, ARTIFACT_FORMAT_VERSION};
pub use error::{PipelineError, PipelineResult};
pub use predictor::{predict, predict_and_record, Predictor};
pub use regression::LinearModel;
pub use trainer::{fit_frame, read_dataset, train_model, TrainingSummary, TARGET_COLUMN};
