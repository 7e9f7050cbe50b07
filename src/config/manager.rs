use crate::config::loader::{ConfigLoader, Environment};
use crate::config::types::ApplicationConfig;
use crate::config::validation::Validator;
use config::ConfigError;
use tracing::debug;

/// 載入並驗證當前環境的應用程序配置
///
/// 在程序啟動時呼叫一次，再把結果往下傳遞。
pub fn load_config() -> Result<ApplicationConfig, ConfigError> {
    ApplicationConfig::load_from_env()
}

/// ApplicationConfig 加載方法實現
impl ApplicationConfig {
    /// 從環境變數指定的環境加載配置
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let env = Environment::from_env();
        debug!("從環境加載配置: {:?}", env);
        Self::load(env)
    }

    /// 從指定環境加載配置
    pub fn load(env: Environment) -> Result<Self, ConfigError> {
        Self::load_with(&ConfigLoader::from_env(), env)
    }

    /// 以指定的來源加載配置
    pub fn load_with(loader: &ConfigLoader, env: Environment) -> Result<Self, ConfigError> {
        debug!("配置目錄 {}，環境 {}", loader.config_dir().display(), env);
        let config_source = loader.load(env)?;

        // 使用 serde 反序列化配置
        let app_config: ApplicationConfig = config_source.try_deserialize()?;

        app_config
            .validate()
            .map_err(|err| ConfigError::Message(format!("配置驗證失敗: {}", err)))?;
        debug!("配置驗證通過");

        Ok(app_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        env::set_var("CONFIG_DIR", dir.path());

        let config = ApplicationConfig::load(Environment::Development).expect("無法加載預設配置");
        assert_eq!(config.database.path, "goblin_ai.db");
        assert_eq!(config.log.level, "info");
        assert_eq!(config.pipeline.history_limit, 100);

        env::remove_var("CONFIG_DIR");
    }

    #[test]
    #[serial]
    fn test_environment_variable_override() {
        let dir = tempfile::tempdir().unwrap();
        env::set_var("CONFIG_DIR", dir.path());
        env::set_var("GOBLIN__DATABASE__PATH", "override.db");
        env::set_var("GOBLIN__PIPELINE__HISTORY_LIMIT", "25");

        let config = ApplicationConfig::load(Environment::Development).expect("無法加載配置");
        assert_eq!(config.database.path, "override.db");
        assert_eq!(config.pipeline.history_limit, 25);

        env::remove_var("GOBLIN__DATABASE__PATH");
        env::remove_var("GOBLIN__PIPELINE__HISTORY_LIMIT");
        env::remove_var("CONFIG_DIR");
    }

    #[test]
    #[serial]
    fn test_config_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("production.toml"),
            "[log]\nlevel = \"warn\"\nformat = \"json\"\n",
        )
        .unwrap();
        env::set_var("CONFIG_DIR", dir.path());

        let config = ApplicationConfig::load(Environment::Production).expect("無法加載配置");
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.log.format, "json");
        // 未覆寫的區段保留預設值
        assert_eq!(config.database.path, "goblin_ai.db");

        env::remove_var("CONFIG_DIR");
    }

    #[test]
    #[serial]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        env::set_var("CONFIG_DIR", dir.path());
        env::set_var("GOBLIN__LOG__LEVEL", "loud");

        let result = ApplicationConfig::load(Environment::Development);
        assert!(result.is_err());

        env::remove_var("GOBLIN__LOG__LEVEL");
        env::remove_var("CONFIG_DIR");
    }
}
