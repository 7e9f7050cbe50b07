use serde::{Deserialize, Serialize};

use super::error::{CharacterError, CharacterResult};

/// 專業技能預設上限
pub const DEFAULT_MAX_SKILL: u32 = 100;

fn default_max_skill() -> u32 {
    DEFAULT_MAX_SKILL
}

/// 專業技能
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profession {
    pub name: String,
    pub skill_level: u32,
    #[serde(default = "default_max_skill")]
    pub max_skill: u32,
    #[serde(default)]
    pub specialization: Option<String>,
}

impl Profession {
    pub fn new(name: impl Into<String>, skill_level: u32) -> Self {
        Self {
            name: name.into(),
            skill_level,
            max_skill: DEFAULT_MAX_SKILL,
            specialization: None,
        }
    }

    fn validate(&self) -> CharacterResult<()> {
        if self.name.trim().is_empty() {
            return Err(CharacterError::Invalid("專業名稱不可為空".to_string()));
        }
        if self.skill_level > self.max_skill {
            return Err(CharacterError::Invalid(format!(
                "{} 的技能等級 {} 超過上限 {}",
                self.name, self.skill_level, self.max_skill
            )));
        }
        Ok(())
    }
}

/// 玩家角色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub realm: String,
    pub faction: String,
    pub level: u32,
    /// 以銅幣計
    pub gold: u64,
    #[serde(default)]
    pub professions: Vec<Profession>,
}

impl Character {
    /// 名冊鍵值的顯示形式
    pub fn key(&self) -> String {
        format!("{}-{}", self.name, self.realm)
    }

    pub fn validate(&self) -> CharacterResult<()> {
        if self.name.trim().is_empty() || self.realm.trim().is_empty() {
            return Err(CharacterError::Invalid("角色名稱與伺服器不可為空".to_string()));
        }
        if self.level == 0 {
            return Err(CharacterError::Invalid(format!("{} 的等級必須至少為 1", self.key())));
        }
        for profession in &self.professions {
            profession.validate()?;
        }
        Ok(())
    }

    /// 不分大小寫查找專業
    pub fn profession(&self, name: &str) -> Option<&Profession> {
        self.professions
            .iter()
            .find(|profession| profession.name.eq_ignore_ascii_case(name))
    }
}

/// 角色部分更新，只覆寫有值的欄位
///
/// name 與 realm 是鍵值，不可更新。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CharacterUpdate {
    pub faction: Option<String>,
    pub level: Option<u32>,
    pub gold: Option<u64>,
    pub professions: Option<Vec<Profession>>,
}

impl CharacterUpdate {
    pub fn is_empty(&self) -> bool {
        self.faction.is_none()
            && self.level.is_none()
            && self.gold.is_none()
            && self.professions.is_none()
    }

    /// 套用到副本並驗證，成功才回傳合併結果
    pub fn apply_to(&self, character: &Character) -> CharacterResult<Character> {
        let mut merged = character.clone();
        if let Some(faction) = &self.faction {
            merged.faction = faction.clone();
        }
        if let Some(level) = self.level {
            merged.level = level;
        }
        if let Some(gold) = self.gold {
            merged.gold = gold;
        }
        if let Some(professions) = &self.professions {
            merged.professions = professions.clone();
        }

        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Character {
        Character {
            name: "Grizzlex".to_string(),
            realm: "Stormrage".to_string(),
            faction: "Horde".to_string(),
            level: 70,
            gold: 1_250_000,
            professions: vec![Profession::new("Tailoring", 75)],
        }
    }

    #[test]
    fn test_update_merges_only_given_fields() {
        let update = CharacterUpdate {
            gold: Some(99),
            ..CharacterUpdate::default()
        };
        let merged = update.apply_to(&sample()).unwrap();
        assert_eq!(merged.gold, 99);
        assert_eq!(merged.level, 70);
        assert_eq!(merged.professions.len(), 1);
    }

    #[test]
    fn test_update_rejects_invalid_profession() {
        let mut profession = Profession::new("Alchemy", 120);
        profession.max_skill = 100;
        let update = CharacterUpdate {
            professions: Some(vec![profession]),
            ..CharacterUpdate::default()
        };
        assert!(matches!(
            update.apply_to(&sample()),
            Err(CharacterError::Invalid(_))
        ));
    }

    #[test]
    fn test_update_rejects_unknown_fields() {
        let result: Result<CharacterUpdate, _> = serde_json::from_str(r#"{"name": "Other"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_profession_lookup_is_case_insensitive() {
        assert!(sample().profession("tailoring").is_some());
        assert!(sample().profession("Mining").is_none());
    }

    #[test]
    fn test_profession_defaults() {
        let profession: Profession =
            serde_json::from_str(r#"{"name": "Mining", "skill_level": 10}"#).unwrap();
        assert_eq!(profession.max_skill, DEFAULT_MAX_SKILL);
        assert_eq!(profession.specialization, None);
    }
}
