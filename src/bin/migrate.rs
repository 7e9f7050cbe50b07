use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use goblin_pipeline::config;
use goblin_pipeline::monitor;
use goblin_pipeline::storage::PriceStore;
use tracing::info;

#[derive(Parser)]
#[command(name = "migrate", about = "goblin 資料庫遷移工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 建立所有資料表（可重複執行）
    Schema,

    /// 匯入舊版 CSV 價格紀錄
    Legacy {
        /// CSV 檔路徑，預設為 pipeline.legacy_csv_path
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行參數
    let cli = Cli::parse();

    let app_config = config::load_config().context("無法載入配置")?;
    let _log_guard = monitor::init_logging(&app_config.log).context("無法初始化日誌系統")?;

    // open 會先建立資料表
    info!("開始運行資料庫遷移 ({})...", app_config.database.path);
    let store = PriceStore::open(&app_config.database)
        .await
        .context("資料庫遷移執行失敗")?;

    match cli.command {
        Commands::Schema => {
            let health = store.health_check().await;
            info!("資料庫遷移完成！現有資料表: {}", health.tables.join(", "));
        }
        Commands::Legacy { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(&app_config.pipeline.legacy_csv_path));
            info!("開始匯入舊版價格紀錄 {}...", path.display());
            let inserted = store.migrate_from_legacy_file(&path).await;
            info!("舊版價格紀錄匯入完成，共 {} 筆", inserted);
        }
    }

    store.close().await;
    Ok(())
}
