//! Archetype special abilities.
//!
//! Offensive abilities deal raw damage that ignores the defender's strength.

use super::types::{CombatEvent, Enemy};
use crate::character::progression::heal;
use crate::character::types::{Archetype, Character};
use crate::core::constants::*;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialAbility {
    /// Warrior: double strength damage.
    PowerStrike,
    /// Mage: double magic damage.
    Fireball,
    /// Rogue: a coin flip between triple and plain strength damage.
    CriticalStrike,
    /// Cleric: restores a fixed amount of health, deals nothing.
    Heal,
}

impl SpecialAbility {
    pub fn for_archetype(archetype: Archetype) -> Self {
        match archetype {
            Archetype::Warrior => SpecialAbility::PowerStrike,
            Archetype::Mage => SpecialAbility::Fireball,
            Archetype::Rogue => SpecialAbility::CriticalStrike,
            Archetype::Cleric => SpecialAbility::Heal,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpecialAbility::PowerStrike => "Power Strike",
            SpecialAbility::Fireball => "Fireball",
            SpecialAbility::CriticalStrike => "Critical Strike",
            SpecialAbility::Heal => "Heal",
        }
    }

    /// Resolves the ability and reports what happened.
    pub fn resolve(&self, character: &mut Character, enemy: &mut Enemy, rng: &mut impl Rng) -> CombatEvent {
        let mut critical = false;
        let mut healed = 0;

        let damage = match self {
            SpecialAbility::PowerStrike => character.strength.saturating_mul(POWER_STRIKE_MULTIPLIER),
            SpecialAbility::Fireball => character.magic.saturating_mul(FIREBALL_MULTIPLIER),
            SpecialAbility::CriticalStrike => {
                critical = rng.gen::<f64>() < CRITICAL_STRIKE_CHANCE;
                if critical {
                    character.strength.saturating_mul(CRITICAL_STRIKE_MULTIPLIER)
                } else {
                    character.strength
                }
            }
            SpecialAbility::Heal => {
                healed = heal(character, CLERIC_HEAL_AMOUNT);
                0
            }
        };

        if damage > 0 {
            enemy.take_damage(damage);
        }

        CombatEvent::SpecialAbility {
            archetype: character.archetype,
            ability: self.name(),
            damage,
            healed,
            critical,
        }
    }
}

/// Uses the character's own special ability.
pub fn use_special_ability(character: &mut Character, enemy: &mut Enemy, rng: &mut impl Rng) -> CombatEvent {
    SpecialAbility::for_archetype(character.archetype).resolve(character, enemy, rng)
}
