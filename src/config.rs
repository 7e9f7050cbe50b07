//! 配置管理
//!
//! 配置來源依序為內建預設值、環境配置檔與 `GOBLIN__` 前綴的環境變數，
//! 合併後反序列化並驗證。

pub mod loader;
pub mod manager;
pub mod types;
pub mod validation;

pub use loader::{ConfigLoader, Environment};
pub use manager::load_config;
pub use types::*;
pub use validation::{ValidationError, ValidationUtils, Validator};
