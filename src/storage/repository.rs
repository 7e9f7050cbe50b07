use sqlx::SqlitePool;

// 重新導出子模塊
pub mod prediction;
pub mod price_history;

// 重新導出常用類型
pub use prediction::{PredictionRepository, SqlitePredictionRepository};
pub use price_history::{PriceHistoryRepository, SqlitePriceHistoryRepository};

/// 通用的數據庫操作特性
pub trait DbExecutor {
    fn get_pool(&self) -> &SqlitePool;
}
