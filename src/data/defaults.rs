//! Starter data written on first run.

use super::loader::{load_items, load_quests, DataError};
use crate::items::types::ItemTable;
use crate::quests::types::QuestTable;
use std::fs;
use std::path::Path;

pub const QUESTS_FILE: &str = "quests.txt";
pub const ITEMS_FILE: &str = "items.txt";

const DEFAULT_QUESTS: &str = "\
QUEST_ID: quest_001
TITLE: The Beginning
DESCRIPTION: Defeat your first enemy.
REWARD_XP: 100
REWARD_GOLD: 50
REQUIRED_LEVEL: 1
PREREQUISITE: NONE

QUEST_ID: quest_002
TITLE: Goblin Trouble
DESCRIPTION: Drive the goblins out of the old mill.
REWARD_XP: 150
REWARD_GOLD: 75
REQUIRED_LEVEL: 2
PREREQUISITE: quest_001

QUEST_ID: quest_003
TITLE: The Orc Warband
DESCRIPTION: Break the warband camped on the ridge.
REWARD_XP: 300
REWARD_GOLD: 150
REQUIRED_LEVEL: 4
PREREQUISITE: quest_002

QUEST_ID: quest_004
TITLE: Dragon's Lair
DESCRIPTION: Face the dragon of the northern peaks.
REWARD_XP: 1000
REWARD_GOLD: 500
REQUIRED_LEVEL: 6
PREREQUISITE: quest_003

QUEST_ID: quest_005
TITLE: Herbalist's Errand
DESCRIPTION: Gather healing herbs for the village herbalist.
REWARD_XP: 50
REWARD_GOLD: 30
REQUIRED_LEVEL: 1
PREREQUISITE: NONE
";

const DEFAULT_ITEMS: &str = "\
ITEM_ID: potion_small
NAME: Small Potion
TYPE: consumable
EFFECT: health:20
COST: 25
DESCRIPTION: Restores 20 health.

ITEM_ID: potion_large
NAME: Large Potion
TYPE: consumable
EFFECT: health:50
COST: 60
DESCRIPTION: Restores 50 health.

ITEM_ID: sword_basic
NAME: Iron Sword
TYPE: weapon
EFFECT: strength:5
COST: 100
DESCRIPTION: A basic iron sword.

ITEM_ID: staff_oak
NAME: Oak Staff
TYPE: weapon
EFFECT: magic:5
COST: 100
DESCRIPTION: A staff cut from an old oak.

ITEM_ID: armor_leather
NAME: Leather Armor
TYPE: armor
EFFECT: max_health:10
COST: 80
DESCRIPTION: Light armor of boiled leather.

ITEM_ID: armor_chain
NAME: Chain Mail
TYPE: armor
EFFECT: max_health:25
COST: 200
DESCRIPTION: Heavy interlocking rings.
";

/// Writes starter `quests.txt` and `items.txt` into `dir`, leaving any
/// existing file alone. Returns how many files were written.
pub fn create_default_data_files(dir: &Path) -> Result<usize, DataError> {
    fs::create_dir_all(dir)?;

    let mut written = 0;
    for (file, contents) in [(QUESTS_FILE, DEFAULT_QUESTS), (ITEMS_FILE, DEFAULT_ITEMS)] {
        let path = dir.join(file);
        if path.exists() {
            continue;
        }
        fs::write(&path, contents)?;
        tracing::info!(path = %path.display(), "created default data file");
        written += 1;
    }
    Ok(written)
}

/// Loads both tables from `dir`.
pub fn load_game_data(dir: &Path) -> Result<(QuestTable, ItemTable), DataError> {
    let quests = load_quests(&dir.join(QUESTS_FILE))?;
    let items = load_items(&dir.join(ITEMS_FILE))?;
    Ok((quests, items))
}
