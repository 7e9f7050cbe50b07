use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::error::{CharacterError, CharacterResult};
use super::models::{Character, CharacterUpdate, Profession};

/// JSON 檔角色名冊
#[derive(Debug)]
pub struct CharacterStore {
    path: PathBuf,
    characters: Vec<Character>,
}

impl CharacterStore {
    /// 開啟名冊，檔案不存在時視為空名冊
    pub fn open<P: AsRef<Path>>(path: P) -> CharacterResult<Self> {
        let path = path.as_ref().to_path_buf();
        let characters = if path.exists() {
            let payload = fs::read(&path)?;
            serde_json::from_slice(&payload)?
        } else {
            Vec::new()
        };

        debug!("已載入 {} 名角色 ({})", characters.len(), path.display());
        Ok(Self { path, characters })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn position(&self, name: &str, realm: &str) -> Option<usize> {
        self.characters
            .iter()
            .position(|c| c.name == name && c.realm == realm)
    }

    /// 先寫入檔案，成功後才取代記憶體中的名冊
    fn commit(&mut self, characters: Vec<Character>) -> CharacterResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let payload = serde_json::to_vec_pretty(&characters)?;
        fs::write(&self.path, payload)?;

        self.characters = characters;
        Ok(())
    }

    /// 新增角色，(name, realm) 已存在時回傳 Conflict
    pub fn add(&mut self, character: Character) -> CharacterResult<&Character> {
        character.validate()?;
        if self.position(&character.name, &character.realm).is_some() {
            return Err(CharacterError::Conflict(character.key()));
        }

        let key = character.key();
        let mut candidate = self.characters.clone();
        candidate.push(character);
        self.commit(candidate)?;

        info!("新增角色: {}", key);
        Ok(&self.characters[self.characters.len() - 1])
    }

    pub fn get(&self, name: &str, realm: &str) -> Option<&Character> {
        self.position(name, realm).map(|index| &self.characters[index])
    }

    /// 部分更新，驗證通過後才寫入
    pub fn update(
        &mut self,
        name: &str,
        realm: &str,
        update: &CharacterUpdate,
    ) -> CharacterResult<&Character> {
        let index = self
            .position(name, realm)
            .ok_or_else(|| CharacterError::NotFound(format!("{}-{}", name, realm)))?;

        let merged = update.apply_to(&self.characters[index])?;
        let mut candidate = self.characters.clone();
        candidate[index] = merged;
        self.commit(candidate)?;

        info!("已更新角色: {}-{}", name, realm);
        Ok(&self.characters[index])
    }

    pub fn list_all(&self) -> &[Character] {
        &self.characters
    }

    /// 查找角色的某項專業
    pub fn find_profession(
        &self,
        name: &str,
        realm: &str,
        profession: &str,
    ) -> CharacterResult<&Profession> {
        let character = self
            .get(name, realm)
            .ok_or_else(|| CharacterError::NotFound(format!("{}-{}", name, realm)))?;

        character.profession(profession).ok_or_else(|| {
            CharacterError::NotFound(format!("{} 沒有 {} 專業", character.key(), profession))
        })
    }
}
