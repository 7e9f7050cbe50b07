// 模組定義
pub mod characters;
pub mod config;
pub mod data_ingestion;
pub mod ml;
pub mod monitor;
pub mod storage;
pub mod utils;
