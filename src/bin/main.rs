use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use goblin_pipeline::characters::{Character, CharacterStore, CharacterUpdate, Profession};
use goblin_pipeline::config::{self, ApplicationConfig};
use goblin_pipeline::ml;
use goblin_pipeline::monitor;
use goblin_pipeline::storage::PriceStore;
use goblin_pipeline::utils::{current_timestamp_secs, format_timestamp_secs};
use tracing::{error, info};

/// 預設預測目標：一天後
const DEFAULT_PREDICTION_HORIZON_SECS: i64 = 24 * 60 * 60;

#[derive(Parser)]
#[command(name = "goblin", about = "拍賣行價格紀錄與預測工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 建立資料表並檢查資料庫狀態
    Init,

    /// 查詢物品價格紀錄（新到舊）
    History {
        #[arg(short, long)]
        item: i64,
        /// 預設使用 pipeline.history_limit
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// 查詢物品的預測紀錄
    Predictions {
        #[arg(short, long)]
        item: i64,
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// 以 CSV 資料集訓練模型
    Train {
        /// 含 target 欄位的 CSV 檔
        #[arg(short, long)]
        input: PathBuf,
        /// 預設使用 pipeline.model_path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 以已訓練模型預測價格
    Predict {
        /// 特徵值，格式 name=value，可重複
        #[arg(short, long = "feature", value_parser = parse_feature)]
        features: Vec<(String, f64)>,
        #[arg(short, long)]
        model: Option<PathBuf>,
        /// 將預測結果寫入資料庫
        #[arg(long, requires = "item")]
        record: bool,
        #[arg(long)]
        item: Option<i64>,
        /// 預測目標時間（Unix 秒），預設為一天後
        #[arg(long)]
        target_date: Option<i64>,
    },

    /// 角色名冊
    Characters {
        #[command(subcommand)]
        command: CharacterCommands,
    },
}

#[derive(Subcommand)]
enum CharacterCommands {
    /// 列出所有角色
    List,

    /// 顯示單一角色
    Show {
        name: String,
        realm: String,
        /// 只顯示指定專業
        #[arg(short, long)]
        profession: Option<String>,
    },

    /// 新增角色
    Add {
        name: String,
        realm: String,
        #[arg(short, long)]
        faction: String,
        #[arg(short, long, default_value_t = 1)]
        level: u32,
        #[arg(short, long, default_value_t = 0)]
        gold: u64,
        /// 專業，格式 name:skill，可重複
        #[arg(short, long = "profession", value_parser = parse_profession)]
        professions: Vec<Profession>,
    },

    /// 以 JSON 部分更新角色，例如 '{"gold": 5000}'
    Update {
        name: String,
        realm: String,
        changes: String,
    },
}

fn parse_feature(raw: &str) -> Result<(String, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("特徵格式應為 name=value: {}", raw))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("特徵 {} 的值無效: {}", name, e))?;
    Ok((name.trim().to_string(), value))
}

fn parse_profession(raw: &str) -> Result<Profession, String> {
    let (name, skill) = raw
        .split_once(':')
        .ok_or_else(|| format!("專業格式應為 name:skill: {}", raw))?;
    let skill: u32 = skill
        .trim()
        .parse()
        .map_err(|e| format!("專業 {} 的技能等級無效: {}", name, e))?;
    Ok(Profession::new(name.trim(), skill))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化配置
    let app_config = config::load_config().context("無法載入配置")?;

    // 初始化日誌系統
    let _log_guard = monitor::init_logging(&app_config.log).context("無法初始化日誌系統")?;

    if let Err(e) = run(cli.command, &app_config).await {
        error!("執行失敗: {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(command: Commands, app_config: &ApplicationConfig) -> Result<()> {
    let pipeline = &app_config.pipeline;

    match command {
        Commands::Init => {
            let store = PriceStore::open(&app_config.database)
                .await
                .context("無法初始化資料庫")?;
            let health = store.health_check().await;
            if !health.healthy {
                return Err(anyhow!("資料庫健康檢查失敗"));
            }
            info!("資料庫 {} 已就緒", app_config.database.path);
            println!("tables: {}", health.tables.join(", "));
            store.close().await;
        }
        Commands::History { item, limit } => {
            let store = PriceStore::open(&app_config.database).await?;
            let rows = store
                .query_history(item, limit.unwrap_or(pipeline.history_limit))
                .await
                .context("查詢價格紀錄失敗")?;
            for row in &rows {
                println!(
                    "{}\t{}\tprice={}\tquantity={}",
                    row.id,
                    format_timestamp_secs(row.timestamp),
                    row.price,
                    row.quantity
                );
            }
            println!("{} rows", rows.len());
            store.close().await;
        }
        Commands::Predictions { item, limit } => {
            let store = PriceStore::open(&app_config.database).await?;
            let rows = store
                .query_predictions(item, limit.unwrap_or(pipeline.history_limit))
                .await
                .context("查詢預測紀錄失敗")?;
            for row in &rows {
                println!(
                    "{}\t{}\tpredicted={}\tconfidence={:.3}\ttarget={}",
                    row.id,
                    format_timestamp_secs(row.timestamp),
                    row.predicted_price,
                    row.confidence,
                    format_timestamp_secs(row.target_date)
                );
            }
            println!("{} rows", rows.len());
            store.close().await;
        }
        Commands::Train { input, output } => {
            let output = output.unwrap_or_else(|| PathBuf::from(&pipeline.model_path));
            let summary = ml::train_model(&input, &output)
                .with_context(|| format!("訓練失敗: {}", input.display()))?;
            println!(
                "model={} rows={} dropped={} features=[{}] r2={:.4}",
                summary.model_path.display(),
                summary.rows,
                summary.dropped_rows,
                summary.feature_columns.join(", "),
                summary.r_squared
            );
        }
        Commands::Predict {
            features,
            model,
            record,
            item,
            target_date,
        } => {
            let model = model.unwrap_or_else(|| PathBuf::from(&pipeline.model_path));
            let input: HashMap<String, f64> = features.into_iter().collect();

            if record {
                let item = item.ok_or_else(|| anyhow!("--record 需要 --item"))?;
                let target_date = target_date
                    .unwrap_or_else(|| current_timestamp_secs() + DEFAULT_PREDICTION_HORIZON_SECS);
                let store = PriceStore::open(&app_config.database).await?;
                let prediction =
                    ml::predict_and_record(&store, &model, item, &input, target_date)
                        .await
                        .context("預測寫入失敗")?;
                println!(
                    "item={} predicted={} confidence={:.3}",
                    prediction.item_id, prediction.predicted_price, prediction.confidence
                );
                store.close().await;
            } else {
                let value = ml::predict(&model, &input).context("預測失敗")?;
                println!("{}", value);
            }
        }
        Commands::Characters { command } => {
            run_characters(command, &pipeline.characters_path)?;
        }
    }

    Ok(())
}

fn run_characters(command: CharacterCommands, path: &str) -> Result<()> {
    let mut roster =
        CharacterStore::open(path).with_context(|| format!("無法開啟角色名冊 {}", path))?;

    match command {
        CharacterCommands::List => {
            for character in roster.list_all() {
                println!(
                    "{}\t{}\tlevel={}\tgold={}\tprofessions={}",
                    character.key(),
                    character.faction,
                    character.level,
                    character.gold,
                    character.professions.len()
                );
            }
        }
        CharacterCommands::Show {
            name,
            realm,
            profession,
        } => match profession {
            Some(profession) => {
                let found = roster.find_profession(&name, &realm, &profession)?;
                println!("{}", serde_json::to_string_pretty(found)?);
            }
            None => {
                let character = roster
                    .get(&name, &realm)
                    .ok_or_else(|| anyhow!("找不到角色: {}-{}", name, realm))?;
                println!("{}", serde_json::to_string_pretty(character)?);
            }
        },
        CharacterCommands::Add {
            name,
            realm,
            faction,
            level,
            gold,
            professions,
        } => {
            let added = roster.add(Character {
                name,
                realm,
                faction,
                level,
                gold,
                professions,
            })?;
            println!("已新增 {}", added.key());
        }
        CharacterCommands::Update {
            name,
            realm,
            changes,
        } => {
            let update: CharacterUpdate =
                serde_json::from_str(&changes).context("更新內容不是有效的 JSON")?;
            if update.is_empty() {
                return Err(anyhow!("沒有任何可更新的欄位"));
            }
            let updated = roster.update(&name, &realm, &update)?;
            println!("{}", serde_json::to_string_pretty(updated)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feature() {
        assert_eq!(parse_feature("quantity=3").unwrap(), ("quantity".to_string(), 3.0));
        assert!(parse_feature("quantity").is_err());
        assert!(parse_feature("quantity=abc").is_err());
    }

    #[test]
    fn test_parse_profession() {
        let profession = parse_profession("Tailoring:75").unwrap();
        assert_eq!(profession.name, "Tailoring");
        assert_eq!(profession.skill_level, 75);
        assert!(parse_profession("Tailoring").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
