use crate::config::DatabaseConfig;
use crate::storage::error::StorageResult;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::path::Path;
use tracing::debug;

/// 資料庫池類型
pub type DatabasePool = SqlitePool;

/// 初始化 SQLite 連接池
///
/// 檔案不存在時依 `create_if_missing` 建立，並先建立上層目錄。
pub async fn init_db_pool(config: &DatabaseConfig) -> StorageResult<SqlitePool> {
    if config.create_if_missing {
        if let Some(parent) = Path::new(&config.path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(config.create_if_missing)
        .busy_timeout(config.busy_timeout())
        .disable_statement_logging();

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    // 測試連接
    sqlx::query("SELECT 1").execute(&pool).await?;
    debug!("SQLite 連接池已建立: {}", config.path);

    Ok(pool)
}

/// 健康檢查
pub async fn health_check(pool: &SqlitePool) -> HealthCheckResult {
    let healthy = sqlx::query("SELECT 1").fetch_one(pool).await.is_ok();
    let tables = if healthy {
        crate::storage::migrations::list_tables(pool)
            .await
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    HealthCheckResult { healthy, tables }
}

/// 健康檢查結果
#[derive(Debug, Clone)]
pub struct HealthCheckResult {
    pub healthy: bool,
    pub tables: Vec<String>,
}
