use crate::core::constants::NO_PREREQUISITE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The single quest that must be completed before another can be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Prerequisite {
    None,
    Quest(String),
}

impl Prerequisite {
    pub fn quest_id(&self) -> Option<&str> {
        match self {
            Prerequisite::None => None,
            Prerequisite::Quest(id) => Some(id),
        }
    }
}

impl From<String> for Prerequisite {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_PREREQUISITE) {
            Prerequisite::None
        } else {
            Prerequisite::Quest(trimmed.to_string())
        }
    }
}

impl From<Prerequisite> for String {
    fn from(value: Prerequisite) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prerequisite::None => f.write_str(NO_PREREQUISITE),
            Prerequisite::Quest(id) => f.write_str(id),
        }
    }
}

/// Immutable quest record from the quest table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDefinition {
    /// Filled from the table key when loading JSON tables.
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub reward_xp: u32,
    pub reward_gold: u32,
    pub required_level: u32,
    pub prerequisite: Prerequisite,
}

/// Quest definitions keyed by quest id.
pub type QuestTable = BTreeMap<String, QuestDefinition>;

/// Where a quest stands for one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestStatus {
    /// Level too low or prerequisite not completed.
    Unavailable,
    Available,
    Active,
    Completed,
}

impl QuestStatus {
    pub fn name(&self) -> &'static str {
        match self {
            QuestStatus::Unavailable => "Unavailable",
            QuestStatus::Available => "Available",
            QuestStatus::Active => "Active",
            QuestStatus::Completed => "Completed",
        }
    }
}

/// XP and gold granted by a quest or a fight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rewards {
    pub xp: u32,
    pub gold: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prerequisite_from_string() {
        assert_eq!(Prerequisite::from("NONE".to_string()), Prerequisite::None);
        assert_eq!(Prerequisite::from("none".to_string()), Prerequisite::None);
        assert_eq!(Prerequisite::from(String::new()), Prerequisite::None);
        assert_eq!(
            Prerequisite::from(" quest_001 ".to_string()),
            Prerequisite::Quest("quest_001".to_string())
        );
        assert_eq!(Prerequisite::None.to_string(), "NONE");
    }

    #[test]
    fn test_quest_definition_from_json() {
        let json = r#"{
            "title": "Rats",
            "reward_xp": 50,
            "reward_gold": 10,
            "required_level": 1,
            "prerequisite": "NONE"
        }"#;
        let quest: QuestDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(quest.prerequisite, Prerequisite::None);
        assert_eq!(quest.reward_xp, 50);
    }
}
