//! Line-oriented character save files.
//!
//! File format, one `KEY: value` per line:
//! ```text
//! NAME: Hero
//! CLASS: Warrior
//! LEVEL: 1
//! HEALTH: 120
//! MAX_HEALTH: 120
//! STRENGTH: 15
//! MAGIC: 5
//! EXPERIENCE: 0
//! GOLD: 100
//! INVENTORY: potion_small,sword_basic
//! ACTIVE_QUESTS: quest_001
//! COMPLETED_QUESTS:
//! ```
//! followed by the optional equipment keys, any unrecognized keys carried
//! over from the loaded file, and a `SAVED_AT` timestamp.

use super::types::{validate_name, Archetype, Character, EquippedItem, StatEffect};
use crate::core::constants::{MAX_INVENTORY_SIZE, SAVE_FILE_SUFFIX};
use chrono::Utc;
use directories::ProjectDirs;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const INT_FIELDS: [&str; 7] = [
    "LEVEL",
    "HEALTH",
    "MAX_HEALTH",
    "STRENGTH",
    "MAGIC",
    "EXPERIENCE",
    "GOLD",
];
const LIST_FIELDS: [&str; 3] = ["INVENTORY", "ACTIVE_QUESTS", "COMPLETED_QUESTS"];
const STRING_FIELDS: [&str; 2] = ["NAME", "CLASS"];
const EQUIPMENT_FIELDS: [&str; 4] = [
    "EQUIPPED_WEAPON",
    "WEAPON_BONUS",
    "EQUIPPED_ARMOR",
    "ARMOR_BONUS",
];
const SAVED_AT: &str = "SAVED_AT";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("character '{0}' not found")]
    CharacterNotFound(String),

    #[error("could not read save file: {0}")]
    SaveFileCorrupted(String),

    #[error("invalid save data: {0}")]
    InvalidSaveData(String),

    #[error("invalid character name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

/// Renders a character in the save-file format.
pub fn encode_character(character: &Character) -> String {
    let mut lines = vec![
        format!("NAME: {}", character.name),
        format!("CLASS: {}", character.archetype.name()),
        format!("LEVEL: {}", character.level),
        format!("HEALTH: {}", character.health),
        format!("MAX_HEALTH: {}", character.max_health),
        format!("STRENGTH: {}", character.strength),
        format!("MAGIC: {}", character.magic),
        format!("EXPERIENCE: {}", character.experience),
        format!("GOLD: {}", character.gold),
        format!("INVENTORY: {}", character.inventory.join(",")),
        format!("ACTIVE_QUESTS: {}", character.active_quests.join(",")),
        format!("COMPLETED_QUESTS: {}", character.completed_quests.join(",")),
    ];

    for (id_key, bonus_key, slot) in [
        ("EQUIPPED_WEAPON", "WEAPON_BONUS", &character.weapon),
        ("EQUIPPED_ARMOR", "ARMOR_BONUS", &character.armor),
    ] {
        if let Some(equipped) = slot {
            lines.push(format!("{}: {}", id_key, equipped.item_id));
            if let Some(bonus) = &equipped.bonus {
                lines.push(format!("{}: {}", bonus_key, bonus));
            }
        }
    }

    for (key, value) in &character.extra {
        lines.push(format!("{}: {}", key, value));
    }

    lines.push(format!("{}: {}", SAVED_AT, Utc::now().to_rfc3339()));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Parses and validates a save file's contents.
///
/// Blank lines and lines without a colon are skipped. Keys are matched
/// case-insensitively.
pub fn decode_character(text: &str) -> Result<Character, SaveError> {
    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    let mut extra: BTreeMap<String, String> = BTreeMap::new();

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim().to_string();
        let upper = key.to_uppercase();

        let recognized = INT_FIELDS.contains(&upper.as_str())
            || LIST_FIELDS.contains(&upper.as_str())
            || STRING_FIELDS.contains(&upper.as_str())
            || EQUIPMENT_FIELDS.contains(&upper.as_str())
            || upper == SAVED_AT;

        if recognized {
            fields.insert(upper, value);
        } else if !key.is_empty() {
            extra.insert(key.to_string(), value);
        }
    }

    let name = required(&fields, "NAME")?.to_string();
    let class = required(&fields, "CLASS")?;
    let archetype = class
        .parse::<Archetype>()
        .map_err(|e| SaveError::InvalidSaveData(e.to_string()))?;

    let mut character = Character::new(name, archetype);
    character.level = int_field(&fields, "LEVEL")?;
    character.health = int_field(&fields, "HEALTH")?;
    character.max_health = int_field(&fields, "MAX_HEALTH")?;
    character.strength = int_field(&fields, "STRENGTH")?;
    character.magic = int_field(&fields, "MAGIC")?;
    character.experience = int_field(&fields, "EXPERIENCE")?;
    character.gold = int_field(&fields, "GOLD")?;
    character.inventory = list_field(&fields, "INVENTORY")?;
    character.active_quests = list_field(&fields, "ACTIVE_QUESTS")?;
    character.completed_quests = list_field(&fields, "COMPLETED_QUESTS")?;
    character.weapon = equipped_field(&fields, "EQUIPPED_WEAPON", "WEAPON_BONUS")?;
    character.armor = equipped_field(&fields, "EQUIPPED_ARMOR", "ARMOR_BONUS")?;
    character.extra = extra;

    validate_invariants(&character)?;
    normalize_quest_ledger(&mut character);

    Ok(character)
}

fn required<'a>(fields: &'a BTreeMap<String, String>, key: &str) -> Result<&'a str, SaveError> {
    fields
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| SaveError::InvalidSaveData(format!("Missing required field: {}", key)))
}

fn int_field(fields: &BTreeMap<String, String>, key: &str) -> Result<u32, SaveError> {
    let raw = required(fields, key)?;
    raw.parse::<u32>().map_err(|_| {
        SaveError::InvalidSaveData(format!("Field {} must be an integer, got '{}'", key, raw))
    })
}

fn list_field(fields: &BTreeMap<String, String>, key: &str) -> Result<Vec<String>, SaveError> {
    let raw = required(fields, key)?;
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect())
}

fn equipped_field(
    fields: &BTreeMap<String, String>,
    id_key: &str,
    bonus_key: &str,
) -> Result<Option<EquippedItem>, SaveError> {
    let Some(item_id) = fields.get(id_key).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let bonus = match fields.get(bonus_key).filter(|v| !v.is_empty()) {
        Some(raw) => Some(
            raw.parse::<StatEffect>()
                .map_err(|e| SaveError::InvalidSaveData(format!("{}: {}", bonus_key, e)))?,
        ),
        None => None,
    };

    Ok(Some(EquippedItem {
        item_id: item_id.clone(),
        bonus,
    }))
}

fn validate_invariants(character: &Character) -> Result<(), SaveError> {
    if character.level == 0 {
        return Err(SaveError::InvalidSaveData(
            "Field LEVEL must be at least 1".to_string(),
        ));
    }
    if character.health > character.max_health {
        return Err(SaveError::InvalidSaveData(format!(
            "HEALTH {} exceeds MAX_HEALTH {}",
            character.health, character.max_health
        )));
    }
    if character.inventory.len() > MAX_INVENTORY_SIZE {
        return Err(SaveError::InvalidSaveData(format!(
            "INVENTORY holds {} items, limit is {}",
            character.inventory.len(),
            MAX_INVENTORY_SIZE
        )));
    }
    Ok(())
}

/// Collapses duplicate quest ids and keeps an id found in both lists only
/// in the completed list.
fn normalize_quest_ledger(character: &mut Character) {
    let mut seen = HashSet::new();
    let before = character.completed_quests.len();
    character
        .completed_quests
        .retain(|id| seen.insert(id.clone()));
    if character.completed_quests.len() != before {
        tracing::warn!(name = %character.name, "dropped duplicate completed quest ids");
    }

    let completed = seen;
    let mut seen = HashSet::new();
    let before = character.active_quests.len();
    character
        .active_quests
        .retain(|id| !completed.contains(id) && seen.insert(id.clone()));
    if character.active_quests.len() != before {
        tracing::warn!(
            name = %character.name,
            "dropped duplicate or already-completed active quest ids"
        );
    }
}

/// Owns the save directory and maps character names to save files.
pub struct CharacterStore {
    save_dir: PathBuf,
}

impl CharacterStore {
    /// Opens (creating if needed) a save directory.
    pub fn new(save_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let save_dir = save_dir.into();
        fs::create_dir_all(&save_dir)?;
        Ok(Self { save_dir })
    }

    /// Platform data directory for save games, falling back to
    /// `data/save_games` relative to the working directory.
    pub fn default_dir() -> PathBuf {
        ProjectDirs::from("", "", "quest-chronicles")
            .map(|dirs| dirs.data_dir().join("save_games"))
            .unwrap_or_else(|| PathBuf::from("data").join("save_games"))
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Save file for `name`. Names that could not have been created
    /// (path separators, dots, empty) are rejected so the path stays
    /// inside the save directory.
    fn path_for(&self, name: &str) -> Result<PathBuf, SaveError> {
        validate_name(name).map_err(|reason| SaveError::InvalidName {
            name: name.to_string(),
            reason,
        })?;
        Ok(self.save_dir.join(format!("{}{}", name, SAVE_FILE_SUFFIX)))
    }

    /// Writes `{name}_save.txt`, replacing any previous save.
    pub fn save(&self, character: &Character) -> Result<PathBuf, SaveError> {
        let path = self.path_for(&character.name)?;
        fs::write(&path, encode_character(character))?;
        tracing::info!(name = %character.name, path = %path.display(), "character saved");
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<Character, SaveError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(SaveError::CharacterNotFound(name.to_string()));
        }

        let text =
            fs::read_to_string(&path).map_err(|e| SaveError::SaveFileCorrupted(e.to_string()))?;
        let character = decode_character(&text)?;
        tracing::info!(name = %character.name, "character loaded");
        Ok(character)
    }

    /// Names of all saved characters, sorted.
    pub fn list(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.save_dir) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(|f| f.strip_suffix(SAVE_FILE_SUFFIX))
                    .map(String::from)
            })
            .collect();
        names.sort();
        names
    }

    pub fn delete(&self, name: &str) -> Result<(), SaveError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(SaveError::CharacterNotFound(name.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::types::Stat;

    const SAMPLE: &str = "NAME: Hero
CLASS: Warrior
LEVEL: 3
HEALTH: 100
MAX_HEALTH: 140

STRENGTH: 19
MAGIC: 9
EXPERIENCE: 40
GOLD: 75
INVENTORY: potion_small,,sword_basic
ACTIVE_QUESTS: quest_002
COMPLETED_QUESTS: quest_001
";

    #[test]
    fn test_decode_sample() {
        let hero = decode_character(SAMPLE).unwrap();
        assert_eq!(hero.name, "Hero");
        assert_eq!(hero.archetype, Archetype::Warrior);
        assert_eq!(hero.level, 3);
        assert_eq!(hero.health, 100);
        assert_eq!(hero.max_health, 140);
        assert_eq!(hero.inventory, vec!["potion_small", "sword_basic"]);
        assert_eq!(hero.active_quests, vec!["quest_002"]);
        assert_eq!(hero.completed_quests, vec!["quest_001"]);
        assert!(hero.weapon.is_none());
        assert!(hero.extra.is_empty());
    }

    #[test]
    fn test_decode_empty_lists() {
        let text = SAMPLE
            .replace("INVENTORY: potion_small,,sword_basic", "INVENTORY:")
            .replace("ACTIVE_QUESTS: quest_002", "ACTIVE_QUESTS: ");
        let hero = decode_character(&text).unwrap();
        assert!(hero.inventory.is_empty());
        assert!(hero.active_quests.is_empty());
    }

    #[test]
    fn test_decode_missing_field() {
        let text = SAMPLE.replace("GOLD: 75\n", "");
        let err = decode_character(&text).unwrap_err();
        assert!(matches!(err, SaveError::InvalidSaveData(msg) if msg.contains("GOLD")));
    }

    #[test]
    fn test_decode_non_integer() {
        let text = SAMPLE.replace("LEVEL: 3", "LEVEL: three");
        assert!(matches!(
            decode_character(&text),
            Err(SaveError::InvalidSaveData(_))
        ));
    }

    #[test]
    fn test_decode_rejects_health_above_max() {
        let text = SAMPLE.replace("HEALTH: 100", "HEALTH: 500");
        assert!(matches!(
            decode_character(&text),
            Err(SaveError::InvalidSaveData(_))
        ));
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let text = format!("{}FAVORITE_COLOR: teal\n", SAMPLE);
        let hero = decode_character(&text).unwrap();
        assert_eq!(hero.extra.get("FAVORITE_COLOR").map(String::as_str), Some("teal"));

        let encoded = encode_character(&hero);
        assert!(encoded.contains("FAVORITE_COLOR: teal\n"));
    }

    #[test]
    fn test_equipment_survives_encoding() {
        let mut hero = decode_character(SAMPLE).unwrap();
        hero.weapon = Some(EquippedItem {
            item_id: "sword_basic".to_string(),
            bonus: Some(StatEffect::new(Stat::Strength, 5)),
        });

        let reloaded = decode_character(&encode_character(&hero)).unwrap();
        assert_eq!(reloaded.weapon, hero.weapon);
        assert!(reloaded.armor.is_none());
        assert!(!reloaded.extra.contains_key(SAVED_AT));
    }

    #[test]
    fn test_quest_ledger_normalized() {
        let text = SAMPLE.replace(
            "ACTIVE_QUESTS: quest_002",
            "ACTIVE_QUESTS: quest_002,quest_001,quest_002",
        );
        let hero = decode_character(&text).unwrap();
        assert_eq!(hero.active_quests, vec!["quest_002"]);
        assert_eq!(hero.completed_quests, vec!["quest_001"]);
    }

    #[test]
    fn test_store_save_load_list_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = CharacterStore::new(dir.path()).unwrap();
        assert!(store.list().is_empty());

        let hero = decode_character(SAMPLE).unwrap();
        let path = store.save(&hero).unwrap();
        assert!(path.ends_with("Hero_save.txt"));
        assert_eq!(store.list(), vec!["Hero".to_string()]);

        let loaded = store.load("Hero").unwrap();
        assert_eq!(loaded, hero);

        store.delete("Hero").unwrap();
        assert!(matches!(
            store.load("Hero"),
            Err(SaveError::CharacterNotFound(_))
        ));
        assert!(matches!(
            store.delete("Hero"),
            Err(SaveError::CharacterNotFound(_))
        ));
    }

    #[test]
    fn test_store_rejects_names_outside_save_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = CharacterStore::new(dir.path().join("saves")).unwrap();

        for name in ["../escape", "a/b", "..", ""] {
            assert!(
                matches!(store.load(name), Err(SaveError::InvalidName { .. })),
                "{name:?}"
            );
            assert!(matches!(store.delete(name), Err(SaveError::InvalidName { .. })));
        }

        let mut rogue = Character::new("Hero".to_string(), Archetype::Rogue);
        rogue.name = "../escape".to_string();
        assert!(matches!(store.save(&rogue), Err(SaveError::InvalidName { .. })));
        assert!(!dir.path().join("escape_save.txt").exists());
    }
}
