#![allow(dead_code)]

use goblin_pipeline::config::DatabaseConfig;
use goblin_pipeline::storage::PriceStore;
use tempfile::TempDir;

/// 建立暫存目錄中的測試資料庫，TempDir 必須與 store 同生命週期
pub async fn setup_test_store() -> (PriceStore, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let config = DatabaseConfig::with_path(db_path.to_string_lossy().to_string());

    let store = PriceStore::open(&config)
        .await
        .expect("Failed to open test database");
    (store, dir)
}

/// 寫入暫存 CSV 檔
pub fn write_csv(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write csv fixture");
    path
}
