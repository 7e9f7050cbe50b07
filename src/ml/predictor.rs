use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use super::artifact::ModelArtifact;
use super::error::{PipelineError, PipelineResult};
use crate::storage::{Prediction, PriceStore};
use crate::utils::current_timestamp_secs;

/// 已載入模型的預測器
#[derive(Debug, Clone)]
pub struct Predictor {
    artifact: ModelArtifact,
}

impl Predictor {
    /// 從模型檔載入
    pub fn load<P: AsRef<Path>>(model_path: P) -> PipelineResult<Self> {
        let model_path = model_path.as_ref();
        let artifact = ModelArtifact::load(model_path)?;
        debug!(
            "已載入模型 {} (features={:?})",
            model_path.display(),
            artifact.feature_columns
        );
        Ok(Self { artifact })
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// 訓練時的特徵欄位
    pub fn feature_columns(&self) -> &[String] {
        &self.artifact.feature_columns
    }

    /// 單筆預測
    pub fn predict(&self, input: &HashMap<String, f64>) -> PipelineResult<f64> {
        self.artifact.predict(input)
    }

    pub fn confidence(&self) -> f64 {
        self.artifact.confidence()
    }
}

/// 載入模型檔並對單筆輸入預測
pub fn predict<P: AsRef<Path>>(model_path: P, input: &HashMap<String, f64>) -> PipelineResult<f64> {
    info!("執行預測...");
    Predictor::load(model_path)?.predict(input)
}

/// 預測並把結果寫入 predictions 表
///
/// 預測值四捨五入到最小貨幣單位；寫入失敗直接回傳錯誤。
pub async fn predict_and_record<P: AsRef<Path>>(
    store: &PriceStore,
    model_path: P,
    item_id: i64,
    input: &HashMap<String, f64>,
    target_date: i64,
) -> PipelineResult<Prediction> {
    let predictor = Predictor::load(model_path)?;
    let value = predictor.predict(input)?;
    let rounded = value.round();
    if !rounded.is_finite() || rounded.abs() >= i64::MAX as f64 {
        return Err(PipelineError::DataFormat(format!(
            "預測值 {} 超出可儲存範圍",
            value
        )));
    }

    let prediction = Prediction {
        item_id,
        predicted_price: rounded as i64,
        confidence: predictor.confidence(),
        timestamp: current_timestamp_secs(),
        target_date,
    };
    store
        .append_predictions(std::slice::from_ref(&prediction))
        .await?;

    info!(
        "物品 {} 的預測價格 {} 已寫入 (target_date={})",
        item_id, prediction.predicted_price, target_date
    );
    Ok(prediction)
}
