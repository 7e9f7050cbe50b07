use sqlx::SqlitePool;

use crate::storage::{
    error::StorageResult,
    models::price_history::{PriceObservation, StoredObservation},
    repository::DbExecutor,
};

/// 價格歷史存取接口
#[async_trait::async_trait]
pub trait PriceHistoryRepository: Send + Sync + DbExecutor {
    /// 在單一交易內寫入整批觀測，失敗時整批回滾
    async fn insert_observations(&self, observations: &[PriceObservation]) -> StorageResult<usize>;

    /// 取最新的 `limit` 筆觀測，時間新到舊，同時間以後寫入者優先
    async fn get_history(&self, item_id: i64, limit: u32) -> StorageResult<Vec<StoredObservation>>;

    /// 統計觀測筆數，`item_id` 為 None 時統計全部
    async fn count_observations(&self, item_id: Option<i64>) -> StorageResult<i64>;
}

/// SQLite 價格歷史存取實現
pub struct SqlitePriceHistoryRepository {
    pool: SqlitePool,
}

impl SqlitePriceHistoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DbExecutor for SqlitePriceHistoryRepository {
    fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl PriceHistoryRepository for SqlitePriceHistoryRepository {
    async fn insert_observations(&self, observations: &[PriceObservation]) -> StorageResult<usize> {
        if observations.is_empty() {
            return Ok(0);
        }

        let mut tx = self.get_pool().begin().await?;

        for observation in observations {
            sqlx::query(
                "INSERT INTO price_history (item_id, price, quantity, timestamp)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(observation.item_id)
            .bind(observation.price)
            .bind(observation.quantity)
            .bind(observation.timestamp)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(observations.len())
    }

    async fn get_history(&self, item_id: i64, limit: u32) -> StorageResult<Vec<StoredObservation>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, StoredObservation>(
            "SELECT id, item_id, price, quantity, timestamp
             FROM price_history
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

    async fn count_observations(&self, item_id: Option<i64>) -> StorageResult<i64> {
        let count = match item_id {
            Some(item_id) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM price_history WHERE item_id = ?")
                    .bind(item_id)
                    .fetch_one(self.get_pool())
                    .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM price_history")
                    .fetch_one(self.get_pool())
                    .await?
            }
        };

        Ok(count)
    }
}
