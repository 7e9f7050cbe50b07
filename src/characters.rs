//! 角色名冊
//!
//! 以 (name, realm) 為鍵的 JSON 檔儲存，每次修改後整檔重寫。

pub mod error;
pub mod models;
pub mod store;

pub use error::{CharacterError, CharacterResult};
pub use models::{Character, CharacterUpdate, Profession, DEFAULT_MAX_SKILL};
pub use store::CharacterStore;
