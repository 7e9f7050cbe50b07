use crate::storage::error::StorageResult;
use sqlx::SqlitePool;
use tracing::info;

/// 建表語句，全部使用 IF NOT EXISTS，可重複執行
const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS price_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        item_id INTEGER NOT NULL,
        price INTEGER NOT NULL,
        quantity INTEGER NOT NULL,
        timestamp INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_price_history_item_time
        ON price_history (item_id, timestamp)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS predictions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        item_id INTEGER NOT NULL,
        predicted_price INTEGER NOT NULL,
        confidence REAL NOT NULL,
        timestamp INTEGER NOT NULL,
        target_date INTEGER NOT NULL
    )
    "#,
    // 交易記帳表，目前沒有任何寫入路徑
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        item_id INTEGER,
        type TEXT CHECK (type IN ('BUY', 'SELL')),
        price INTEGER,
        quantity INTEGER,
        timestamp INTEGER,
        character TEXT
    )
    "#,
];

/// 執行建表（冪等）
pub async fn run_migrations(pool: &SqlitePool) -> StorageResult<()> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("資料庫結構已就緒");
    Ok(())
}

/// 列出使用者資料表（排除 sqlite 內部表）
pub async fn list_tables(pool: &SqlitePool) -> StorageResult<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(tables)
}
