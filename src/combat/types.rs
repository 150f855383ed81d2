use crate::character::types::{Archetype, Character};
use crate::core::constants::*;
use crate::core::error::{GameError, GameResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed enemy roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Goblin,
    Orc,
    Dragon,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Goblin, EnemyKind::Orc, EnemyKind::Dragon];

    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Goblin => "Goblin",
            EnemyKind::Orc => "Orc",
            EnemyKind::Dragon => "Dragon",
        }
    }

    /// Returns (health, strength, magic, xp_reward, gold_reward).
    pub fn stats(&self) -> (u32, u32, u32, u32, u32) {
        match self {
            EnemyKind::Goblin => GOBLIN_STATS,
            EnemyKind::Orc => ORC_STATS,
            EnemyKind::Dragon => DRAGON_STATS,
        }
    }

    /// Level 1-2 meets goblins, 3-5 orcs, anything higher dragons.
    pub fn for_level(level: u32) -> Self {
        if level <= GOBLIN_MAX_LEVEL {
            EnemyKind::Goblin
        } else if level <= ORC_MAX_LEVEL {
            EnemyKind::Orc
        } else {
            EnemyKind::Dragon
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnemyKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EnemyKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GameError::UnknownEnemy(s.to_string()))
    }
}

/// An opponent for a single encounter. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub xp_reward: u32,
    pub gold_reward: u32,
}

impl Enemy {
    pub fn new(kind: EnemyKind) -> Self {
        let (health, strength, magic, xp_reward, gold_reward) = kind.stats();
        Self {
            name: kind.name().to_string(),
            health,
            max_health: health,
            strength,
            magic,
            xp_reward,
            gold_reward,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }
}

/// Builds an enemy by kind name, matched case-insensitively.
pub fn create_enemy(kind_name: &str) -> GameResult<Enemy> {
    Ok(Enemy::new(kind_name.parse()?))
}

pub fn enemy_for_level(level: u32) -> Enemy {
    Enemy::new(EnemyKind::for_level(level))
}

/// A character can enter combat only while alive.
pub fn can_fight(character: &Character) -> bool {
    character.health > 0
}

/// One player decision for a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    Special,
    Escape,
}

impl PlayerAction {
    pub const ALL: [PlayerAction; 3] = [
        PlayerAction::Attack,
        PlayerAction::Special,
        PlayerAction::Escape,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PlayerAction::Attack => "Attack",
            PlayerAction::Special => "Special Ability",
            PlayerAction::Escape => "Run",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatOutcome {
    PlayerVictory,
    EnemyVictory,
    Escaped,
}

impl CombatOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            CombatOutcome::PlayerVictory => "Victory",
            CombatOutcome::EnemyVictory => "Defeat",
            CombatOutcome::Escaped => "Escaped",
        }
    }
}

/// Final report of a finished battle. Rewards are zero unless the player won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResult {
    pub outcome: CombatOutcome,
    pub xp_gained: u32,
    pub gold_gained: u32,
}

impl CombatResult {
    pub fn victory(enemy: &Enemy) -> Self {
        Self {
            outcome: CombatOutcome::PlayerVictory,
            xp_gained: enemy.xp_reward,
            gold_gained: enemy.gold_reward,
        }
    }

    pub fn without_reward(outcome: CombatOutcome) -> Self {
        Self {
            outcome,
            xp_gained: 0,
            gold_gained: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleState {
    Idle,
    InProgress,
    Finished(CombatOutcome),
}

/// Something that happened during a round, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatEvent {
    PlayerAttack {
        damage: u32,
    },
    SpecialAbility {
        archetype: Archetype,
        ability: &'static str,
        damage: u32,
        healed: u32,
        /// Rogue only: whether the critical roll landed.
        critical: bool,
    },
    EscapeSucceeded,
    EscapeFailed,
    EnemyAttack {
        damage: u32,
    },
    EnemyDied {
        xp_gained: u32,
        gold_gained: u32,
    },
    PlayerDied,
}
