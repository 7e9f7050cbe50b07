use thiserror::Error;

/// 角色名冊錯誤類型
#[derive(Error, Debug)]
pub enum CharacterError {
    #[error("找不到角色: {0}")]
    NotFound(String),

    #[error("角色已存在: {0}")]
    Conflict(String),

    #[error("無效的角色資料: {0}")]
    Invalid(String),

    #[error("IO 錯誤: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 錯誤: {0}")]
    Json(#[from] serde_json::Error),
}

/// 角色名冊結果類型
pub type CharacterResult<T> = Result<T, CharacterError>;
