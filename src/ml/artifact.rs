//! 模型檔
//!
//! JSON 格式，記錄訓練時的特徵欄位順序，推論時據此檢查輸入。

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{PipelineError, PipelineResult};
use super::regression::LinearModel;
use crate::utils::current_timestamp_secs;

/// 目前的模型檔格式版本
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// 序列化後的已訓練模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    /// 訓練時的特徵欄位，順序即係數順序
    pub feature_columns: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// 訓練集上的決定係數
    pub r_squared: f64,
    pub trained_rows: usize,
    /// Unix 秒
    pub trained_at: i64,
}

impl ModelArtifact {
    /// 由擬合結果建立
    pub fn new(
        feature_columns: Vec<String>,
        model: &LinearModel,
        r_squared: f64,
        trained_rows: usize,
    ) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            feature_columns,
            coefficients: model.coefficients.to_vec(),
            intercept: model.intercept,
            r_squared,
            trained_rows,
            trained_at: current_timestamp_secs(),
        }
    }

    /// 還原為線性模型
    pub fn model(&self) -> LinearModel {
        LinearModel::new(Array1::from(self.coefficients.clone()), self.intercept)
    }

    /// 寫入模型檔，必要時建立上層目錄
    pub fn save<P: AsRef<Path>>(&self, path: P) -> PipelineResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let payload = serde_json::to_vec_pretty(self)?;
        fs::write(path, payload)?;
        debug!("模型檔已寫入 {}", path.display());
        Ok(())
    }

    /// 讀取並檢查模型檔
    pub fn load<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let payload = fs::read(path).map_err(|err| {
            PipelineError::ModelLoad(format!("無法讀取 {}: {}", path.display(), err))
        })?;
        let artifact: ModelArtifact = serde_json::from_slice(&payload).map_err(|err| {
            PipelineError::ModelLoad(format!("{} 不是有效的模型檔: {}", path.display(), err))
        })?;

        artifact.check_integrity()?;
        Ok(artifact)
    }

    fn check_integrity(&self) -> PipelineResult<()> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(PipelineError::ModelLoad(format!(
                "不支援的模型檔版本 {}",
                self.format_version
            )));
        }
        if self.coefficients.len() != self.feature_columns.len() {
            return Err(PipelineError::ModelLoad(format!(
                "係數數量 {} 與特徵欄位數量 {} 不一致",
                self.coefficients.len(),
                self.feature_columns.len()
            )));
        }
        let unique: BTreeSet<&String> = self.feature_columns.iter().collect();
        if unique.len() != self.feature_columns.len() {
            return Err(PipelineError::ModelLoad("特徵欄位名稱重複".to_string()));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(PipelineError::ModelLoad("模型參數含有非有限數值".to_string()));
        }
        Ok(())
    }

    /// 依訓練欄位順序組成特徵向量
    ///
    /// 輸入必須剛好包含所有訓練欄位，缺少或多出都視為錯誤。
    pub fn feature_vector(&self, input: &HashMap<String, f64>) -> PipelineResult<Array1<f64>> {
        let mut missing: Vec<String> = self
            .feature_columns
            .iter()
            .filter(|column| !input.contains_key(*column))
            .cloned()
            .collect();
        let mut unexpected: Vec<String> = input
            .keys()
            .filter(|key| !self.feature_columns.contains(*key))
            .cloned()
            .collect();

        if !missing.is_empty() || !unexpected.is_empty() {
            missing.sort();
            unexpected.sort();
            return Err(PipelineError::SchemaMismatch {
                missing,
                unexpected,
            });
        }

        let mut values = Vec::with_capacity(self.feature_columns.len());
        for column in &self.feature_columns {
            let value = input[column];
            if !value.is_finite() {
                return Err(PipelineError::DataFormat(format!(
                    "特徵 {} 的值 {} 不是有限數值",
                    column, value
                )));
            }
            values.push(value);
        }

        Ok(Array1::from(values))
    }

    /// 單筆預測
    pub fn predict(&self, input: &HashMap<String, f64>) -> PipelineResult<f64> {
        let features = self.feature_vector(input)?;
        Ok(self.model().predict_one(features.view()))
    }

    /// 以訓練 R² 作為預測信心，限制在 [0, 1]
    pub fn confidence(&self) -> f64 {
        self.r_squared.clamp(0.0, 1.0)
    }
}
