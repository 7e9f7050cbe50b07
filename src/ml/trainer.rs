use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};
use polars::prelude::*;
use tracing::info;

use super::artifact::ModelArtifact;
use super::error::{PipelineError, PipelineResult};
use super::regression::LinearModel;
use crate::data_ingestion::{clean_frame, MISSING_VALUE_TOKENS};

/// 標籤欄位名稱
pub const TARGET_COLUMN: &str = "target";

/// 訓練結果摘要
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub model_path: PathBuf,
    pub feature_columns: Vec<String>,
    pub rows: usize,
    pub dropped_rows: usize,
    pub r_squared: f64,
}

/// 讀取 CSV 資料集，訓練並寫出模型檔
pub fn train_model<P, Q>(input_path: P, model_output_path: Q) -> PipelineResult<TrainingSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let input_path = input_path.as_ref();
    let model_output_path = model_output_path.as_ref();
    info!("開始訓練模型，資料來源 {}", input_path.display());

    let dataset = read_dataset(input_path)?;
    let artifact = fit_frame(&dataset)?;
    artifact.save(model_output_path)?;

    let summary = TrainingSummary {
        model_path: model_output_path.to_path_buf(),
        feature_columns: artifact.feature_columns.clone(),
        rows: artifact.trained_rows,
        dropped_rows: dataset.height() - artifact.trained_rows,
        r_squared: artifact.r_squared,
    };
    info!(
        "模型已儲存至 {} (rows={}, features={}, r2={:.4})",
        summary.model_path.display(),
        summary.rows,
        summary.feature_columns.len(),
        summary.r_squared
    );

    Ok(summary)
}

/// 讀取含標題列的 CSV 資料集
///
/// 空白與 `MISSING_VALUE_TOKENS` 中的寫法讀成 null。
pub fn read_dataset<P: AsRef<Path>>(path: P) -> PipelineResult<DataFrame> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PipelineError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("檔案不存在: {}", path.display()),
        )));
    }

    let null_values = NullValues::AllColumns(
        MISSING_VALUE_TOKENS
            .iter()
            .map(|token| PlSmallStr::from(*token))
            .collect(),
    );

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_null_values(Some(null_values)))
        .with_infer_schema_length(Some(1000))
        .try_into_reader_with_file_path(Some(path.into()))?
        .finish()?;

    Ok(df)
}

/// 以資料框擬合模型
///
/// `target` 以外的欄位依出現順序作為特徵。
pub fn fit_frame(df: &DataFrame) -> PipelineResult<ModelArtifact> {
    if df.column(TARGET_COLUMN).is_err() {
        return Err(PipelineError::DataFormat(format!(
            "資料集缺少 {} 欄位",
            TARGET_COLUMN
        )));
    }

    let cleaned = clean_frame(df)?;
    let rows = cleaned.height();
    if rows == 0 {
        return Err(PipelineError::DataFormat("預處理後資料集為空".to_string()));
    }

    let feature_columns: Vec<String> = cleaned
        .get_column_names()
        .into_iter()
        .filter(|name| name.as_str() != TARGET_COLUMN)
        .map(|name| name.to_string())
        .collect();

    let target = numeric_column(&cleaned, TARGET_COLUMN)?;
    let mut features = Array2::<f64>::zeros((rows, feature_columns.len()));
    for (index, name) in feature_columns.iter().enumerate() {
        let values = numeric_column(&cleaned, name)?;
        features.column_mut(index).assign(&values);
    }

    let model = LinearModel::fit(&features, &target)?;
    let r_squared = model.r_squared(&features, &target);

    Ok(ModelArtifact::new(feature_columns, &model, r_squared, rows))
}

/// 取出欄位並轉成 f64 向量
fn numeric_column(df: &DataFrame, name: &str) -> PipelineResult<Array1<f64>> {
    let column = df.column(name)?;
    let casted = column
        .as_materialized_series()
        .strict_cast(&DataType::Float64)
        .map_err(|err| {
            PipelineError::DataFormat(format!("欄位 {} 不是數值欄位: {}", name, err))
        })?;

    let values: Vec<f64> = casted
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or(f64::NAN))
        .collect();

    if values.iter().any(|value| !value.is_finite()) {
        return Err(PipelineError::DataFormat(format!(
            "欄位 {} 含有非有限數值",
            name
        )));
    }

    Ok(Array1::from(values))
}
