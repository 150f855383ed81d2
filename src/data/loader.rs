//! Quest and item tables from data files.
//!
//! The text format is a series of blank-line-separated blocks, each a run
//! of `KEY: value` lines:
//! ```text
//! QUEST_ID: quest_001
//! TITLE: The Beginning
//! DESCRIPTION: Defeat your first enemy.
//! REWARD_XP: 100
//! REWARD_GOLD: 50
//! REQUIRED_LEVEL: 1
//! PREREQUISITE: NONE
//! ```
//! Items use `ITEM_ID, NAME, TYPE, EFFECT, COST, DESCRIPTION`.

use crate::character::types::StatEffect;
use crate::items::types::{ItemDefinition, ItemKind, ItemTable};
use crate::quests::types::{Prerequisite, QuestDefinition, QuestTable};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("data file not found: {0}")]
    MissingDataFile(String),

    #[error("invalid data format: {0}")]
    InvalidDataFormat(String),

    #[error("could not read data file: {0}")]
    CorruptedData(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const QUEST_FIELDS: [&str; 7] = [
    "QUEST_ID",
    "TITLE",
    "DESCRIPTION",
    "REWARD_XP",
    "REWARD_GOLD",
    "REQUIRED_LEVEL",
    "PREREQUISITE",
];
const ITEM_FIELDS: [&str; 6] = ["ITEM_ID", "NAME", "TYPE", "EFFECT", "COST", "DESCRIPTION"];

type Block = BTreeMap<String, String>;

fn read_data_file(path: &Path) -> Result<String, DataError> {
    if !path.exists() {
        return Err(DataError::MissingDataFile(path.display().to_string()));
    }
    Ok(fs::read_to_string(path)?)
}

/// Splits text into blocks on blank lines. Keys are upper-cased; lines
/// without a colon are ignored.
fn parse_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current = Block::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            current.insert(key.trim().to_uppercase(), value.trim().to_string());
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn require_fields(block: &Block, fields: &[&str]) -> Result<(), DataError> {
    match fields.iter().find(|f| !block.contains_key(**f)) {
        Some(missing) => Err(DataError::InvalidDataFormat(format!(
            "Missing required field: {}",
            missing
        ))),
        None => Ok(()),
    }
}

fn field<'a>(block: &'a Block, key: &str) -> &'a str {
    block.get(key).map(String::as_str).unwrap_or_default()
}

fn int_field(block: &Block, key: &str) -> Result<u32, DataError> {
    let raw = field(block, key);
    raw.parse::<u32>()
        .map_err(|_| DataError::InvalidDataFormat(format!("{} must be a non-negative integer, got '{}'", key, raw)))
}

fn check_quest(quest: &QuestDefinition) -> Result<(), DataError> {
    if quest.id.is_empty() {
        return Err(DataError::InvalidDataFormat("quest with empty id".to_string()));
    }
    if quest.required_level == 0 {
        return Err(DataError::InvalidDataFormat(format!(
            "quest '{}' requires level 0",
            quest.id
        )));
    }
    Ok(())
}

fn check_item(item: &ItemDefinition) -> Result<(), DataError> {
    if item.id.is_empty() {
        return Err(DataError::InvalidDataFormat("item with empty id".to_string()));
    }
    Ok(())
}

fn quest_from_block(block: &Block) -> Result<QuestDefinition, DataError> {
    require_fields(block, &QUEST_FIELDS)?;

    let quest = QuestDefinition {
        id: field(block, "QUEST_ID").to_string(),
        title: field(block, "TITLE").to_string(),
        description: field(block, "DESCRIPTION").to_string(),
        reward_xp: int_field(block, "REWARD_XP")?,
        reward_gold: int_field(block, "REWARD_GOLD")?,
        required_level: int_field(block, "REQUIRED_LEVEL")?,
        prerequisite: Prerequisite::from(field(block, "PREREQUISITE").to_string()),
    };
    check_quest(&quest)?;
    Ok(quest)
}

fn item_from_block(block: &Block) -> Result<ItemDefinition, DataError> {
    require_fields(block, &ITEM_FIELDS)?;

    let kind = field(block, "TYPE")
        .parse::<ItemKind>()
        .map_err(DataError::InvalidDataFormat)?;
    let effect = field(block, "EFFECT")
        .parse::<StatEffect>()
        .map_err(|e| DataError::InvalidDataFormat(e.to_string()))?;

    let item = ItemDefinition {
        id: field(block, "ITEM_ID").to_string(),
        name: field(block, "NAME").to_string(),
        kind,
        effect,
        cost: int_field(block, "COST")?,
        description: field(block, "DESCRIPTION").to_string(),
    };
    check_item(&item)?;
    Ok(item)
}

/// Parses quest blocks. A later block with the same id replaces an earlier one.
pub fn parse_quests(text: &str) -> Result<QuestTable, DataError> {
    parse_blocks(text)
        .iter()
        .map(|block| quest_from_block(block).map(|q| (q.id.clone(), q)))
        .collect()
}

pub fn parse_items(text: &str) -> Result<ItemTable, DataError> {
    parse_blocks(text)
        .iter()
        .map(|block| item_from_block(block).map(|i| (i.id.clone(), i)))
        .collect()
}

pub fn load_quests(path: &Path) -> Result<QuestTable, DataError> {
    let quests = parse_quests(&read_data_file(path)?)?;
    tracing::info!(path = %path.display(), count = quests.len(), "loaded quests");
    Ok(quests)
}

pub fn load_items(path: &Path) -> Result<ItemTable, DataError> {
    let items = parse_items(&read_data_file(path)?)?;
    tracing::info!(path = %path.display(), count = items.len(), "loaded items");
    Ok(items)
}

/// Loads a JSON object of quests keyed by id.
pub fn load_quests_json(path: &Path) -> Result<QuestTable, DataError> {
    let mut quests: QuestTable = serde_json::from_str(&read_data_file(path)?)?;
    for (id, quest) in quests.iter_mut() {
        quest.id = id.clone();
        check_quest(quest)?;
    }
    Ok(quests)
}

/// Loads a JSON object of items keyed by id.
pub fn load_items_json(path: &Path) -> Result<ItemTable, DataError> {
    let mut items: ItemTable = serde_json::from_str(&read_data_file(path)?)?;
    for (id, item) in items.iter_mut() {
        item.id = id.clone();
        check_item(item)?;
    }
    Ok(items)
}
