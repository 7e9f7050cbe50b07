use serde::{Deserialize, Serialize};

/// 價格預測（插入模型）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub item_id: i64,
    pub predicted_price: i64,
    /// 儲存層不檢查範圍
    pub confidence: f64,
    /// 產生預測的時間（Unix 秒）
    pub timestamp: i64,
    /// 預測所針對的時間（Unix 秒）
    pub target_date: i64,
}

/// 已寫入 predictions 的預測
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredPrediction {
    pub id: i64,
    pub item_id: i64,
    pub predicted_price: i64,
    pub confidence: f64,
    pub timestamp: i64,
    pub target_date: i64,
}
