use sqlx::SqlitePool;

use crate::storage::{
    error::StorageResult,
    models::prediction::{Prediction, StoredPrediction},
    repository::DbExecutor,
};

/// 預測結果存取接口
#[async_trait::async_trait]
pub trait PredictionRepository: Send + Sync + DbExecutor {
    /// 在單一交易內寫入整批預測
    async fn insert_predictions(&self, predictions: &[Prediction]) -> StorageResult<usize>;

    /// 取某物品最新的 `limit` 筆預測
    async fn get_predictions(
        &self,
        item_id: i64,
        limit: u32,
    ) -> StorageResult<Vec<StoredPrediction>>;
}

/// SQLite 預測結果存取實現
pub struct SqlitePredictionRepository {
    pool: SqlitePool,
}

impl SqlitePredictionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DbExecutor for SqlitePredictionRepository {
    fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl PredictionRepository for SqlitePredictionRepository {
    async fn insert_predictions(&self, predictions: &[Prediction]) -> StorageResult<usize> {
        if predictions.is_empty() {
            return Ok(0);
        }

        let mut tx = self.get_pool().begin().await?;

        for prediction in predictions {
            sqlx::query(
                "INSERT INTO predictions
                     (item_id, predicted_price, confidence, timestamp, target_date)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(prediction.item_id)
            .bind(prediction.predicted_price)
            .bind(prediction.confidence)
            .bind(prediction.timestamp)
            .bind(prediction.target_date)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(predictions.len())
    }

    async fn get_predictions(
        &self,
        item_id: i64,
        limit: u32,
    ) -> StorageResult<Vec<StoredPrediction>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, StoredPrediction>(
            "SELECT id, item_id, predicted_price, confidence, timestamp, target_date
             FROM predictions
             WHERE item_id = ?
             ORDER BY timestamp DESC, id DESC
             LIMIT ?",
        )
        .bind(item_id)
        .bind(i64::from(limit))
        .fetch_all(self.get_pool())
        .await?;

        Ok(rows)
    }
}
