use assert_matches::assert_matches;
use goblin_pipeline::characters::{
    Character, CharacterError, CharacterStore, CharacterUpdate, Profession,
};

fn sample(name: &str) -> Character {
    Character {
        name: name.to_string(),
        realm: "Stormrage".to_string(),
        faction: "Horde".to_string(),
        level: 60,
        gold: 50_000,
        professions: vec![Profession::new("Tailoring", 75), Profession::new("Enchanting", 40)],
    }
}

#[test]
fn test_roster_persists_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("characters.json");

    {
        let mut roster = CharacterStore::open(&path).unwrap();
        assert!(roster.list_all().is_empty());
        roster.add(sample("Grizzlex")).unwrap();
        roster.add(sample("Fizzwick")).unwrap();
    }

    let roster = CharacterStore::open(&path).unwrap();
    assert_eq!(roster.list_all().len(), 2);
    assert_eq!(roster.get("Grizzlex", "Stormrage").unwrap().level, 60);
    assert!(roster.get("Grizzlex", "Area 52").is_none());
}

#[test]
fn test_duplicate_character_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let mut roster = CharacterStore::open(dir.path().join("characters.json")).unwrap();

    roster.add(sample("Grizzlex")).unwrap();
    assert_matches!(roster.add(sample("Grizzlex")), Err(CharacterError::Conflict(_)));
    assert_eq!(roster.list_all().len(), 1);
}

#[test]
fn test_invalid_character_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut roster = CharacterStore::open(dir.path().join("characters.json")).unwrap();

    let mut character = sample("Grizzlex");
    character.level = 0;
    assert_matches!(roster.add(character), Err(CharacterError::Invalid(_)));
    assert!(!dir.path().join("characters.json").exists());
}

#[test]
fn test_update_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("characters.json");
    let mut roster = CharacterStore::open(&path).unwrap();
    roster.add(sample("Grizzlex")).unwrap();

    let update = CharacterUpdate {
        gold: Some(1_000_000),
        level: Some(70),
        ..CharacterUpdate::default()
    };
    roster.update("Grizzlex", "Stormrage", &update).unwrap();

    let reopened = CharacterStore::open(&path).unwrap();
    let character = reopened.get("Grizzlex", "Stormrage").unwrap();
    assert_eq!(character.gold, 1_000_000);
    assert_eq!(character.level, 70);
    assert_eq!(character.faction, "Horde");
}

#[test]
fn test_failed_update_leaves_character_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut roster = CharacterStore::open(dir.path().join("characters.json")).unwrap();
    roster.add(sample("Grizzlex")).unwrap();

    let update = CharacterUpdate {
        level: Some(0),
        gold: Some(1),
        ..CharacterUpdate::default()
    };
    assert_matches!(
        roster.update("Grizzlex", "Stormrage", &update),
        Err(CharacterError::Invalid(_))
    );
    assert_eq!(roster.get("Grizzlex", "Stormrage").unwrap().gold, 50_000);

    assert_matches!(
        roster.update("Nobody", "Stormrage", &CharacterUpdate::default()),
        Err(CharacterError::NotFound(_))
    );
}

#[test]
fn test_failed_write_leaves_roster_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    // 上層路徑是檔案，寫入一定失敗
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let mut roster = CharacterStore::open(blocker.join("characters.json")).unwrap();

    assert_matches!(roster.add(sample("Grizzlex")), Err(CharacterError::Io(_)));
    assert!(roster.list_all().is_empty());
    // 重試不應回報 Conflict
    assert_matches!(roster.add(sample("Grizzlex")), Err(CharacterError::Io(_)));
    assert!(roster.get("Grizzlex", "Stormrage").is_none());
}

#[test]
fn test_failed_update_write_keeps_old_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster").join("characters.json");
    let mut roster = CharacterStore::open(&path).unwrap();
    roster.add(sample("Grizzlex")).unwrap();

    // 以同名目錄取代名冊檔，使之後的寫入失敗
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    let update = CharacterUpdate {
        gold: Some(1),
        ..CharacterUpdate::default()
    };
    assert_matches!(
        roster.update("Grizzlex", "Stormrage", &update),
        Err(CharacterError::Io(_))
    );
    assert_eq!(roster.get("Grizzlex", "Stormrage").unwrap().gold, 50_000);
}

#[test]
fn test_find_profession() {
    let dir = tempfile::tempdir().unwrap();
    let mut roster = CharacterStore::open(dir.path().join("characters.json")).unwrap();
    roster.add(sample("Grizzlex")).unwrap();

    let profession = roster
        .find_profession("Grizzlex", "Stormrage", "ENCHANTING")
        .unwrap();
    assert_eq!(profession.skill_level, 40);

    assert_matches!(
        roster.find_profession("Grizzlex", "Stormrage", "Mining"),
        Err(CharacterError::NotFound(_))
    );
    assert_matches!(
        roster.find_profession("Nobody", "Stormrage", "Mining"),
        Err(CharacterError::NotFound(_))
    );
}

#[test]
fn test_corrupt_roster_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("characters.json");
    std::fs::write(&path, "[{\"name\": 1}]").unwrap();

    assert_matches!(CharacterStore::open(&path), Err(CharacterError::Json(_)))
}
