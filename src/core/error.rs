//! Typed failures surfaced by every engine operation.

use thiserror::Error;

/// Every recoverable failure an engine call can report.
///
/// None of these terminate the session; the driver decides whether to
/// retry the player's action or abandon the flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("character is dead")]
    CharacterDead,

    #[error("not enough gold: need {needed}, have {available}")]
    InsufficientGold { needed: u32, available: u32 },

    #[error("inventory is full")]
    InventoryFull,

    #[error("item '{0}' not found")]
    ItemNotFound(String),

    #[error("item '{item}' is not a {expected}")]
    InvalidItemType { item: String, expected: &'static str },

    #[error("invalid item effect '{0}'")]
    InvalidItemEffect(String),

    #[error("quest '{0}' not found")]
    QuestNotFound(String),

    #[error("quest '{0}' is not active")]
    QuestNotActive(String),

    #[error("quest '{0}' already completed")]
    QuestAlreadyCompleted(String),

    #[error("prerequisite '{prerequisite}' for quest '{quest}' not completed")]
    QuestRequirementsNotMet { quest: String, prerequisite: String },

    #[error("level {required} required (current level {current})")]
    InsufficientLevel { required: u32, current: u32 },

    #[error("prerequisite cycle detected at quest '{quest_id}'")]
    PrerequisiteCycle { quest_id: String },

    #[error("invalid character class '{0}'")]
    InvalidCharacterArchetype(String),

    #[error("invalid character name: {0}")]
    InvalidCharacterName(String),

    #[error("enemy type '{0}' not recognized")]
    UnknownEnemy(String),

    #[error("combat is not active")]
    CombatNotActive,
}

pub type GameResult<T> = Result<T, GameError>;
