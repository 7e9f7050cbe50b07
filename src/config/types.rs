use crate::config::validation::{ValidationError, ValidationUtils, Validator};
use serde::{Deserialize, Serialize};

/// 預設資料庫檔案
pub const DEFAULT_DATABASE_PATH: &str = "goblin_ai.db";

/// 應用程序配置結構
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub database: DatabaseConfig,
    pub log: LogConfig,
    pub pipeline: PipelineConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證各個部分的配置
        self.database.validate()?;
        self.log.validate()?;
        self.pipeline.validate()?;

        Ok(())
    }
}

/// 數據庫配置（SQLite 檔案）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
    pub create_if_missing: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATABASE_PATH.to_string(),
            max_connections: 4,
            busy_timeout_secs: 5,
            create_if_missing: true,
        }
    }
}

impl Validator for DatabaseConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::file_path(&self.path, "database.path")?;
        ValidationUtils::in_range(self.max_connections, 1, 64, "database.max_connections")?;
        ValidationUtils::in_range(self.busy_timeout_secs, 0, 300, "database.busy_timeout_secs")?;

        Ok(())
    }
}

impl DatabaseConfig {
    /// 指向指定檔案的配置，其餘欄位使用預設值
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// 獲取 SQLite 忙碌等待時間
    pub fn busy_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.busy_timeout_secs)
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
    /// 設定後額外輸出每日輪替的日誌檔
    #[serde(default)]
    pub directory: Option<String>,
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
            file_prefix: "goblin".to_string(),
        }
    }
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證日誌級別
        ValidationUtils::one_of(
            &self.level,
            &["trace", "debug", "info", "warn", "error"],
            "log.level",
        )?;

        // 驗證日誌格式
        ValidationUtils::one_of(&self.format, &["pretty", "json"], "log.format")?;

        if let Some(directory) = &self.directory {
            ValidationUtils::not_empty(directory, "log.directory")?;
            ValidationUtils::not_empty(&self.file_prefix, "log.file_prefix")?;
        }

        Ok(())
    }
}

/// 價格管線配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 模型檔輸出與讀取位置
    pub model_path: String,
    /// 舊版掃描 CSV 的位置
    pub legacy_csv_path: String,
    /// 角色名冊 JSON 的位置
    pub characters_path: String,
    /// 歷史查詢預設筆數
    pub history_limit: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_path: "models/price_model.json".to_string(),
            legacy_csv_path: "data/scan_history.csv".to_string(),
            characters_path: "data/characters.json".to_string(),
            history_limit: crate::storage::DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Validator for PipelineConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::file_path(&self.model_path, "pipeline.model_path")?;
        ValidationUtils::file_path(&self.legacy_csv_path, "pipeline.legacy_csv_path")?;
        ValidationUtils::file_path(&self.characters_path, "pipeline.characters_path")?;
        ValidationUtils::in_range(self.history_limit, 1, 100_000, "pipeline.history_limit")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ApplicationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.path, "goblin_ai.db");
        assert_eq!(config.pipeline.history_limit, 100);
    }

    #[test]
    fn test_invalid_log_format_rejected() {
        let log = LogConfig {
            format: "xml".to_string(),
            ..LogConfig::default()
        };
        assert!(matches!(log.validate(), Err(ValidationError::InvalidValue { .. })));
    }

    #[test]
    fn test_database_pool_range() {
        let mut database = DatabaseConfig::with_path("prices.db");
        database.max_connections = 0;
        assert!(matches!(
            database.validate(),
            Err(ValidationError::RangeError { .. })
        ));
    }
}
