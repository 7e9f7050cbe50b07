//! 價格資料儲存
//!
//! `PriceStore` 在程序啟動時建立一次，以參考傳給所有使用者。
//! 每個操作只在自身期間持有連線或交易，離開時（包含錯誤路徑）自動釋放。

use std::path::Path;

use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::config::DatabaseConfig;
use crate::data_ingestion::{clean_observations, LegacyCsvReader};
use crate::storage::{
    database::{self, HealthCheckResult},
    error::StorageResult,
    migrations,
    models::{Prediction, PriceObservation, StoredObservation, StoredPrediction},
    repository::{
        PredictionRepository, PriceHistoryRepository, SqlitePredictionRepository,
        SqlitePriceHistoryRepository,
    },
};

/// 歷史查詢預設筆數
pub const DEFAULT_HISTORY_LIMIT: u32 = 100;

/// 價格歷史與預測的持久化入口
pub struct PriceStore {
    pool: SqlitePool,
    price_history: SqlitePriceHistoryRepository,
    predictions: SqlitePredictionRepository,
}

impl PriceStore {
    /// 以既有連接池建立
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            price_history: SqlitePriceHistoryRepository::new(pool.clone()),
            predictions: SqlitePredictionRepository::new(pool.clone()),
            pool,
        }
    }

    /// 建立連接池，不觸碰資料表
    pub async fn connect(config: &DatabaseConfig) -> StorageResult<Self> {
        let pool = database::init_db_pool(config).await?;
        Ok(Self::from_pool(pool))
    }

    /// 建立連接池並確保資料表存在
    pub async fn open(config: &DatabaseConfig) -> StorageResult<Self> {
        let store = Self::connect(config).await?;
        store.init_schema().await?;
        info!("資料庫已初始化於 {}", config.path);
        Ok(store)
    }

    /// 獲取連接池
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 確保三張資料表存在，已存在時不做任何事
    pub async fn init_schema(&self) -> StorageResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// 寫入一批觀測
    ///
    /// 整批在同一交易中寫入。失敗時只記錄錯誤並丟棄該批，回傳 0。
    pub async fn append_observations(&self, batch: &[PriceObservation]) -> usize {
        match self.try_append_observations(batch).await {
            Ok(written) => written,
            Err(err) => {
                error!("寫入 {} 筆掃描資料失敗，已丟棄: {}", batch.len(), err);
                0
            }
        }
    }

    /// 寫入一批觀測，錯誤交由呼叫者處理
    pub async fn try_append_observations(
        &self,
        batch: &[PriceObservation],
    ) -> StorageResult<usize> {
        let written = self.price_history.insert_observations(batch).await?;
        if written > 0 {
            info!("已寫入 {} 筆記錄到 price_history", written);
        }
        Ok(written)
    }

    /// 查詢某物品最新的 `limit` 筆觀測
    ///
    /// 依時間新到舊排序，同時間以後寫入者優先；未知物品回傳空集合。
    pub async fn query_history(
        &self,
        item_id: i64,
        limit: u32,
    ) -> StorageResult<Vec<StoredObservation>> {
        self.price_history.get_history(item_id, limit).await
    }

    /// 以預設筆數查詢歷史
    pub async fn query_recent_history(
        &self,
        item_id: i64,
    ) -> StorageResult<Vec<StoredObservation>> {
        self.query_history(item_id, DEFAULT_HISTORY_LIMIT).await
    }

    /// 統計觀測筆數
    pub async fn count_observations(&self, item_id: Option<i64>) -> StorageResult<i64> {
        self.price_history.count_observations(item_id).await
    }

    /// 寫入一批預測，任何一筆失敗則整批回滾並回傳錯誤
    pub async fn append_predictions(&self, batch: &[Prediction]) -> StorageResult<usize> {
        let written = self.predictions.insert_predictions(batch).await.map_err(|err| {
            error!("寫入 {} 筆預測失敗: {}", batch.len(), err);
            err
        })?;
        info!("已寫入 {} 筆預測", written);
        Ok(written)
    }

    /// 查詢某物品最新的 `limit` 筆預測
    pub async fn query_predictions(
        &self,
        item_id: i64,
        limit: u32,
    ) -> StorageResult<Vec<StoredPrediction>> {
        self.predictions.get_predictions(item_id, limit).await
    }

    /// 一次性把舊版 CSV 掃描資料匯入 price_history
    ///
    /// 與 `append_observations` 相同，失敗只記錄不回傳錯誤。
    /// 檔案不存在、缺少必要欄位或寫入失敗時回傳 0；不完整的列會被清除。
    pub async fn migrate_from_legacy_file(&self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        if !path.exists() {
            warn!("找不到舊版資料 {}，略過遷移", path.display());
            return 0;
        }

        info!("開始遷移 {} 到資料庫...", path.display());
        let raw = match LegacyCsvReader::default().read_file(path) {
            Ok(raw) => raw,
            Err(err) => {
                error!("無法讀取舊版資料 {}，略過遷移: {}", path.display(), err);
                return 0;
            }
        };

        let observations = clean_observations(raw);
        let written = self.append_observations(&observations).await;
        info!("遷移完成，共 {} 筆", written);
        written
    }

    /// 健康檢查
    pub async fn health_check(&self) -> HealthCheckResult {
        database::health_check(&self.pool).await
    }

    /// 關閉連接池
    pub async fn close(self) {
        self.pool.close().await;
    }
}
