use crate::core::constants::*;
use crate::core::error::{GameError, GameResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Fixed character category chosen at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Archetype {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Warrior,
        Archetype::Mage,
        Archetype::Rogue,
        Archetype::Cleric,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Warrior => "Warrior",
            Archetype::Mage => "Mage",
            Archetype::Rogue => "Rogue",
            Archetype::Cleric => "Cleric",
        }
    }

    /// Returns (max_health, strength, magic) for a fresh character.
    pub fn base_stats(&self) -> (u32, u32, u32) {
        match self {
            Archetype::Warrior => WARRIOR_BASE_STATS,
            Archetype::Mage => MAGE_BASE_STATS,
            Archetype::Rogue => ROGUE_BASE_STATS,
            Archetype::Cleric => CLERIC_BASE_STATS,
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Archetype {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Archetype::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GameError::InvalidCharacterArchetype(s.to_string()))
    }
}

/// A character stat that item effects can target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Stat {
    Health,
    MaxHealth,
    Strength,
    Magic,
    /// A stat name the character does not carry. Effects on it are dropped.
    Other(String),
}

impl Stat {
    pub fn key(&self) -> &str {
        match self {
            Stat::Health => "health",
            Stat::MaxHealth => "max_health",
            Stat::Strength => "strength",
            Stat::Magic => "magic",
            Stat::Other(name) => name,
        }
    }

    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "health" => Stat::Health,
            "max_health" => Stat::MaxHealth,
            "strength" => Stat::Strength,
            "magic" => Stat::Magic,
            other => Stat::Other(other.to_string()),
        }
    }
}

/// A `stat:magnitude` pair, as written in item data and save files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct StatEffect {
    pub stat: Stat,
    pub magnitude: i32,
}

/// The exact effect applied by an equipped item, kept so unequip can undo it
/// without consulting item data again.
pub type BonusRecord = StatEffect;

impl StatEffect {
    pub fn new(stat: Stat, magnitude: i32) -> Self {
        Self { stat, magnitude }
    }

    pub fn inverse(&self) -> Self {
        Self {
            stat: self.stat.clone(),
            magnitude: self.magnitude.saturating_neg(),
        }
    }
}

impl FromStr for StatEffect {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (stat, magnitude) = s
            .split_once(':')
            .ok_or_else(|| GameError::InvalidItemEffect(s.to_string()))?;
        let magnitude = magnitude
            .trim()
            .parse::<i32>()
            .map_err(|_| GameError::InvalidItemEffect(s.to_string()))?;
        if stat.trim().is_empty() {
            return Err(GameError::InvalidItemEffect(s.to_string()));
        }
        Ok(Self::new(Stat::parse(stat), magnitude))
    }
}

impl TryFrom<String> for StatEffect {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatEffect> for String {
    fn from(effect: StatEffect) -> Self {
        effect.to_string()
    }
}

impl fmt::Display for StatEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.stat.key(), self.magnitude)
    }
}

/// An item occupying an equipment slot together with the bonus it applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EquippedItem {
    pub item_id: String,
    /// `None` when the bonus is unknown (e.g. an old save); unequip then
    /// reverses nothing.
    pub bonus: Option<BonusRecord>,
}

/// The player's mutable state. Owned by the session and passed by
/// reference into every engine call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    pub archetype: Archetype,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub experience: u32,
    pub gold: u32,
    pub inventory: Vec<String>,
    pub weapon: Option<EquippedItem>,
    pub armor: Option<EquippedItem>,
    pub active_quests: Vec<String>,
    pub completed_quests: Vec<String>,
    /// Unrecognized save-file keys, written back untouched.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl Character {
    /// Creates a level 1 character with the archetype's base stats.
    pub fn new(name: String, archetype: Archetype) -> Self {
        let (max_health, strength, magic) = archetype.base_stats();
        Self {
            name,
            archetype,
            level: STARTING_LEVEL,
            health: max_health,
            max_health,
            strength,
            magic,
            experience: 0,
            gold: STARTING_GOLD,
            inventory: Vec::new(),
            weapon: None,
            armor: None,
            active_quests: Vec::new(),
            completed_quests: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn equipped_weapon(&self) -> Option<&str> {
        self.weapon.as_ref().map(|e| e.item_id.as_str())
    }

    pub fn equipped_armor(&self) -> Option<&str> {
        self.armor.as_ref().map(|e| e.item_id.as_str())
    }

    /// XP needed to leave the current level.
    pub fn xp_to_next_level(&self) -> u32 {
        self.level.saturating_mul(XP_PER_LEVEL)
    }
}

/// Creates a new character from player input.
pub fn create_character(name: &str, archetype: &str) -> GameResult<Character> {
    let archetype = archetype.parse::<Archetype>()?;
    validate_name(name).map_err(GameError::InvalidCharacterName)?;
    Ok(Character::new(name.trim().to_string(), archetype))
}

pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Name must be {} characters or less",
            MAX_NAME_LENGTH
        ));
    }

    let valid_chars = trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_');

    if !valid_chars {
        return Err(
            "Name can only contain letters, numbers, spaces, hyphens, and underscores".to_string(),
        );
    }

    Ok(())
}
