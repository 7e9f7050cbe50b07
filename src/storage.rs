pub mod database;
pub mod error;
pub mod migrations;
pub mod models;
pub mod repository;
pub mod store;

// 只匯出必要的數據庫功能
pub use database::{health_check, init_db_pool, DatabasePool, HealthCheckResult};
pub use error::{StorageError, StorageResult};

// 匯出主要的模型
pub use models::{Prediction, PriceObservation, StoredObservation, StoredPrediction};

// 匯出主要的倉儲接口和實現
pub use repository::{
    DbExecutor, PredictionRepository, PriceHistoryRepository, SqlitePredictionRepository,
    SqlitePriceHistoryRepository,
};

// 匯出遷移功能
pub use migrations::{list_tables, run_migrations};

pub use store::{PriceStore, DEFAULT_HISTORY_LIMIT};
