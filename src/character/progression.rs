//! Experience, leveling, healing, death and revival.

use super::types::Character;
use crate::core::constants::*;
use crate::core::error::{GameError, GameResult};

/// Adds experience and applies every level-up it pays for.
///
/// Each level costs `level * 100` XP, recomputed from the new level after
/// every step, and fully heals the character. Returns the number of levels
/// gained.
pub fn gain_experience(character: &mut Character, amount: u32) -> GameResult<u32> {
    if is_dead(character) {
        return Err(GameError::CharacterDead);
    }

    character.experience = character.experience.saturating_add(amount);

    let mut levelups = 0;
    loop {
        let xp_needed = character.xp_to_next_level();

        if character.experience >= xp_needed {
            character.experience -= xp_needed;
            character.level = character.level.saturating_add(1);
            character.max_health = character.max_health.saturating_add(LEVEL_UP_MAX_HEALTH);
            character.strength = character.strength.saturating_add(LEVEL_UP_STRENGTH);
            character.magic = character.magic.saturating_add(LEVEL_UP_MAGIC);
            character.health = character.max_health;
            levelups += 1;

            tracing::debug!(
                name = %character.name,
                level = character.level,
                "level up"
            );
        } else {
            break;
        }
    }

    Ok(levelups)
}

/// Heals up to `amount`, capped at max health. Returns the amount applied.
/// The dead cannot be healed.
pub fn heal(character: &mut Character, amount: u32) -> u32 {
    if is_dead(character) {
        return 0;
    }

    let missing = character.max_health.saturating_sub(character.health);
    let healed = amount.min(missing);
    character.health = character.health.saturating_add(healed);
    healed
}

pub fn is_dead(character: &Character) -> bool {
    character.health == 0
}

/// Brings a dead character back at half health (rounded down).
/// Returns false and changes nothing if the character is alive.
pub fn revive(character: &mut Character) -> bool {
    if !is_dead(character) {
        return false;
    }

    character.health = character.max_health / REVIVE_HEALTH_DIVISOR;
    tracing::debug!(name = %character.name, health = character.health, "revived");
    true
}

/// Applies a gold delta, which may be negative. Returns the new total.
pub fn add_gold(character: &mut Character, delta: i64) -> GameResult<u32> {
    let new_total = i64::from(character.gold) + delta;

    if new_total < 0 {
        return Err(GameError::InsufficientGold {
            needed: u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX),
            available: character.gold,
        });
    }

    character.gold = u32::try_from(new_total).unwrap_or(u32::MAX);
    Ok(character.gold)
}
