//! Quest lifecycle for one character: Unavailable -> Available -> Active -> Completed.

use super::types::{Prerequisite, QuestDefinition, QuestStatus, QuestTable, Rewards};
use crate::character::progression::{add_gold, gain_experience};
use crate::character::types::Character;
use crate::core::error::{GameError, GameResult};

pub fn is_quest_active(character: &Character, quest_id: &str) -> bool {
    character.active_quests.iter().any(|id| id == quest_id)
}

pub fn is_quest_completed(character: &Character, quest_id: &str) -> bool {
    character.completed_quests.iter().any(|id| id == quest_id)
}

fn prerequisite_met(character: &Character, quest: &QuestDefinition) -> bool {
    match &quest.prerequisite {
        Prerequisite::None => true,
        Prerequisite::Quest(id) => is_quest_completed(character, id),
    }
}

/// Whether the character could accept the quest right now. Never fails.
pub fn can_accept(character: &Character, quest_id: &str, quests: &QuestTable) -> bool {
    let Some(quest) = quests.get(quest_id) else {
        return false;
    };

    character.level >= quest.required_level
        && prerequisite_met(character, quest)
        && !is_quest_completed(character, quest_id)
        && !is_quest_active(character, quest_id)
}

/// Accepts a quest, reporting why it cannot be accepted.
///
/// Returns `Ok(false)` without changes if the quest is already active.
pub fn accept(character: &mut Character, quest_id: &str, quests: &QuestTable) -> GameResult<bool> {
    let quest = quests
        .get(quest_id)
        .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))?;

    if character.level < quest.required_level {
        return Err(GameError::InsufficientLevel {
            required: quest.required_level,
            current: character.level,
        });
    }

    if let Prerequisite::Quest(prerequisite) = &quest.prerequisite {
        if !is_quest_completed(character, prerequisite) {
            return Err(GameError::QuestRequirementsNotMet {
                quest: quest_id.to_string(),
                prerequisite: prerequisite.clone(),
            });
        }
    }

    if is_quest_completed(character, quest_id) {
        return Err(GameError::QuestAlreadyCompleted(quest_id.to_string()));
    }

    if is_quest_active(character, quest_id) {
        return Ok(false);
    }

    character.active_quests.push(quest_id.to_string());
    tracing::debug!(quest_id = %quest_id, "quest accepted");
    Ok(true)
}

/// Completes an active quest and grants its rewards.
///
/// The ledger move and the reward grant happen together: if granting fails
/// (a dead character cannot gain experience) the character is left exactly
/// as it was and the quest stays active.
pub fn complete(character: &mut Character, quest_id: &str, quests: &QuestTable) -> GameResult<Rewards> {
    let quest = quests
        .get(quest_id)
        .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))?;

    let index = character
        .active_quests
        .iter()
        .position(|id| id == quest_id)
        .ok_or_else(|| GameError::QuestNotActive(quest_id.to_string()))?;

    let checkpoint = character.clone();

    character.active_quests.remove(index);
    character.completed_quests.push(quest_id.to_string());

    let granted = gain_experience(character, quest.reward_xp)
        .and_then(|_| add_gold(character, i64::from(quest.reward_gold)));

    if let Err(err) = granted {
        *character = checkpoint;
        tracing::debug!(quest_id = %quest_id, error = %err, "quest completion rolled back");
        return Err(err);
    }

    tracing::debug!(
        quest_id = %quest_id,
        xp = quest.reward_xp,
        gold = quest.reward_gold,
        "quest completed"
    );
    Ok(Rewards {
        xp: quest.reward_xp,
        gold: quest.reward_gold,
    })
}

/// Drops an active quest with no penalty.
pub fn abandon(character: &mut Character, quest_id: &str) -> GameResult<()> {
    let index = character
        .active_quests
        .iter()
        .position(|id| id == quest_id)
        .ok_or_else(|| GameError::QuestNotActive(quest_id.to_string()))?;

    character.active_quests.remove(index);
    tracing::debug!(quest_id = %quest_id, "quest abandoned");
    Ok(())
}

/// Status of a quest for this character, or `None` for an unknown id.
pub fn quest_status(character: &Character, quest_id: &str, quests: &QuestTable) -> Option<QuestStatus> {
    quests.get(quest_id)?;

    let status = if is_quest_completed(character, quest_id) {
        QuestStatus::Completed
    } else if is_quest_active(character, quest_id) {
        QuestStatus::Active
    } else if can_accept(character, quest_id, quests) {
        QuestStatus::Available
    } else {
        QuestStatus::Unavailable
    };
    Some(status)
}

/// Definitions of the character's active quests, in ledger order. Ids no
/// longer in the table are skipped.
pub fn active_quests<'a>(character: &Character, quests: &'a QuestTable) -> Vec<&'a QuestDefinition> {
    character
        .active_quests
        .iter()
        .filter_map(|id| quests.get(id))
        .collect()
}

pub fn completed_quests<'a>(character: &Character, quests: &'a QuestTable) -> Vec<&'a QuestDefinition> {
    character
        .completed_quests
        .iter()
        .filter_map(|id| quests.get(id))
        .collect()
}

pub fn available_quests<'a>(character: &Character, quests: &'a QuestTable) -> Vec<&'a QuestDefinition> {
    quests
        .iter()
        .filter(|(id, _)| can_accept(character, id, quests))
        .map(|(_, quest)| quest)
        .collect()
}

/// Completed quests as a percentage of the whole table; 0 for an empty table.
pub fn completion_percentage(character: &Character, quests: &QuestTable) -> f64 {
    if quests.is_empty() {
        return 0.0;
    }
    character.completed_quests.len() as f64 / quests.len() as f64 * 100.0
}

/// Sums the rewards of completed quests still present in the table.
pub fn total_rewards_earned(character: &Character, quests: &QuestTable) -> Rewards {
    completed_quests(character, quests)
        .into_iter()
        .fold(Rewards::default(), |acc, quest| Rewards {
            xp: acc.xp.saturating_add(quest.reward_xp),
            gold: acc.gold.saturating_add(quest.reward_gold),
        })
}

/// Quests whose required level lies in `min_level..=max_level`.
pub fn quests_by_level(quests: &QuestTable, min_level: u32, max_level: u32) -> Vec<&QuestDefinition> {
    quests
        .values()
        .filter(|q| (min_level..=max_level).contains(&q.required_level))
        .collect()
}
