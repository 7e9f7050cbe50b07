// monitor/logger.rs - tracing 訂閱器初始化

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::LogConfig;
use crate::monitor::{MonitorError, MonitorResult};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// 建立日誌過濾器，`RUST_LOG` 優先於配置中的級別
fn build_filter(config: &LogConfig) -> MonitorResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.level)
        .map_err(|e| MonitorError::LoggerError(format!("無效的日誌級別 {}: {}", config.level, e)))
}

/// 依配置組合輸出層
///
/// 終端輸出一定存在；設定 `directory` 時再加一層每日輪替的檔案輸出。
fn build_layers(config: &LogConfig) -> MonitorResult<(Vec<BoxedLayer>, Option<WorkerGuard>)> {
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    let json = config.format.eq_ignore_ascii_case("json");

    let console: BoxedLayer = match config.format.to_lowercase().as_str() {
        "json" => fmt::layer().json().with_target(true).boxed(),
        "pretty" => fmt::layer().with_target(true).boxed(),
        other => {
            return Err(MonitorError::LoggerError(format!("不支援的日誌格式: {}", other)));
        }
    };
    layers.push(console);

    let guard = match &config.directory {
        Some(directory) => {
            std::fs::create_dir_all(Path::new(directory)).map_err(|e| {
                MonitorError::InitializationError(format!("無法建立日誌目錄 {}: {}", directory, e))
            })?;

            let appender = tracing_appender::rolling::daily(directory, &config.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer: BoxedLayer = if json {
                fmt::layer().json().with_writer(writer).with_ansi(false).boxed()
            } else {
                fmt::layer().with_writer(writer).with_ansi(false).boxed()
            };
            layers.push(file_layer);
            Some(guard)
        }
        None => None,
    };

    Ok((layers, guard))
}

/// 初始化全域日誌系統
///
/// 回傳的 guard 必須存活到程式結束，否則檔案輸出的緩衝內容會遺失。
pub fn init_logging(config: &LogConfig) -> MonitorResult<Option<WorkerGuard>> {
    let filter = build_filter(config)?;
    let (layers, guard) = build_layers(config)?;

    Registry::default()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| MonitorError::InitializationError(format!("設置日誌系統失敗: {}", e)))?;

    tracing::info!("日誌系統初始化完成 (level={}, format={})", config.level, config.format);
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_only_by_default() {
        let config = LogConfig::default();
        let (layers, guard) = build_layers(&config).unwrap();
        assert_eq!(layers.len(), 1);
        assert!(guard.is_none());
    }

    #[test]
    fn test_file_output_when_directory_set() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            format: "json".to_string(),
            directory: Some(dir.path().join("logs").to_string_lossy().to_string()),
            ..LogConfig::default()
        };

        let (layers, guard) = build_layers(&config).unwrap();
        assert_eq!(layers.len(), 2);
        assert!(guard.is_some());
        assert!(dir.path().join("logs").is_dir());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let config = LogConfig {
            format: "xml".to_string(),
            ..LogConfig::default()
        };
        assert!(matches!(
            build_layers(&config),
            Err(MonitorError::LoggerError(_))
        ));
    }
}
