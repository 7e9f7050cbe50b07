use crate::config::types::ApplicationConfig;
use config::{Config, ConfigError, Environment as ConfigEnvironment, File};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// 選擇環境的變數名稱
pub const ENV_VAR: &str = "GOBLIN_ENV";
/// 覆寫配置目錄的變數名稱
pub const CONFIG_DIR_VAR: &str = "CONFIG_DIR";
/// 環境變數覆寫的前綴，例如 `GOBLIN__DATABASE__PATH`
pub const ENV_PREFIX: &str = "GOBLIN";

/// 執行環境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// 解析環境名稱，無法辨識時視為開發環境
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// 讀取 `GOBLIN_ENV`
    pub fn from_env() -> Self {
        env::var(ENV_VAR)
            .map(|name| Self::parse(&name))
            .unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 分層配置來源
///
/// 優先序由低到高：內建預設值、`<dir>/<env>.toml`、`GOBLIN__` 環境變數。
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// 以 `CONFIG_DIR`（預設 `config`）建立
    pub fn from_env() -> Self {
        Self::new(env::var(CONFIG_DIR_VAR).unwrap_or_else(|_| "config".into()))
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// 指定環境的配置檔路徑，檔案可以不存在
    pub fn config_path(&self, env: Environment) -> PathBuf {
        self.config_dir.join(format!("{}.toml", env.name()))
    }

    /// 合併三層來源
    pub fn load(&self, env: Environment) -> Result<Config, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&ApplicationConfig::default())?)
            .add_source(File::from(self.config_path(env)).required(false))
            .add_source(
                ConfigEnvironment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
    }
}
