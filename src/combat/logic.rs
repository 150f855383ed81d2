//! Turn-based battle resolution.
//!
//! A round is the player's action followed, if nobody has fallen or fled,
//! by the enemy's attack. The end check runs after each of the two, so a
//! lethal player hit ends the battle before the enemy swings.

use super::abilities::use_special_ability;
use super::types::*;
use crate::character::types::Character;
use crate::core::constants::*;
use crate::core::error::{GameError, GameResult};
use rand::Rng;

/// `max(1, attacker - defender / 4)` with integer division.
pub fn calculate_damage(attacker_strength: u32, defender_strength: u32) -> u32 {
    attacker_strength
        .saturating_sub(defender_strength / DEFENSE_DIVISOR)
        .max(MIN_DAMAGE)
}

/// Supplies the player's decision whenever the battle needs one.
pub trait ActionSource {
    fn next_action(&mut self, turn: u32, character: &Character, enemy: &Enemy) -> PlayerAction;

    /// Called with each round's events as soon as the round resolves.
    fn observe(&mut self, _events: &[CombatEvent]) {}
}

impl<F> ActionSource for F
where
    F: FnMut(u32, &Character, &Enemy) -> PlayerAction,
{
    fn next_action(&mut self, turn: u32, character: &Character, enemy: &Enemy) -> PlayerAction {
        self(turn, character, enemy)
    }
}

/// One encounter between the character and an enemy.
///
/// Only the character's health changes during a battle; rewards are
/// reported in the result for the caller to apply.
pub struct Battle<'a> {
    character: &'a mut Character,
    enemy: Enemy,
    state: BattleState,
    turn: u32,
}

impl<'a> Battle<'a> {
    pub fn new(character: &'a mut Character, enemy: Enemy) -> Self {
        Self {
            character,
            enemy,
            state: BattleState::Idle,
            turn: 0,
        }
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    /// Rounds resolved so far.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn character(&self) -> &Character {
        &*self.character
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    /// Moves the battle from idle to in progress. A dead character cannot
    /// start a fight; a finished battle cannot be restarted.
    pub fn start(&mut self) -> GameResult<()> {
        match self.state {
            BattleState::InProgress => return Ok(()),
            BattleState::Finished(_) => return Err(GameError::CombatNotActive),
            BattleState::Idle => {}
        }

        if self.character.health == 0 {
            return Err(GameError::CharacterDead);
        }

        self.state = BattleState::InProgress;
        tracing::debug!(
            character = %self.character.name,
            enemy = %self.enemy.name,
            "battle started"
        );
        Ok(())
    }

    /// Resolves one full round and returns what happened, in order.
    pub fn take_turn(&mut self, action: PlayerAction, rng: &mut impl Rng) -> GameResult<Vec<CombatEvent>> {
        if self.state != BattleState::InProgress {
            return Err(GameError::CombatNotActive);
        }

        self.turn += 1;
        let mut events = Vec::new();

        match action {
            PlayerAction::Attack => {
                let damage = calculate_damage(self.character.strength, self.enemy.strength);
                self.enemy.take_damage(damage);
                events.push(CombatEvent::PlayerAttack { damage });
            }
            PlayerAction::Special => {
                events.push(use_special_ability(self.character, &mut self.enemy, rng));
            }
            PlayerAction::Escape => {
                if rng.gen::<f64>() < ESCAPE_CHANCE {
                    events.push(CombatEvent::EscapeSucceeded);
                    self.finish(CombatOutcome::Escaped);
                    return Ok(events);
                }
                events.push(CombatEvent::EscapeFailed);
            }
        }

        if self.check_end(&mut events) {
            return Ok(events);
        }

        let damage = calculate_damage(self.enemy.strength, self.character.strength);
        self.character.health = self.character.health.saturating_sub(damage);
        events.push(CombatEvent::EnemyAttack { damage });

        self.check_end(&mut events);

        tracing::debug!(
            turn = self.turn,
            action = action.name(),
            player_health = self.character.health,
            enemy_health = self.enemy.health,
            "round resolved"
        );
        Ok(events)
    }

    /// The final result, once the battle has ended.
    pub fn result(&self) -> Option<CombatResult> {
        match self.state {
            BattleState::Finished(CombatOutcome::PlayerVictory) => Some(CombatResult::victory(&self.enemy)),
            BattleState::Finished(outcome) => Some(CombatResult::without_reward(outcome)),
            _ => None,
        }
    }

    /// Fights to the end, asking `source` for every player decision.
    pub fn run(&mut self, source: &mut impl ActionSource, rng: &mut impl Rng) -> GameResult<CombatResult> {
        self.start()?;

        loop {
            if let Some(result) = self.result() {
                return Ok(result);
            }
            let action = source.next_action(self.turn + 1, self.character, &self.enemy);
            let events = self.take_turn(action, rng)?;
            source.observe(&events);
        }
    }

    /// Returns true if the battle just ended.
    fn check_end(&mut self, events: &mut Vec<CombatEvent>) -> bool {
        if !self.enemy.is_alive() {
            events.push(CombatEvent::EnemyDied {
                xp_gained: self.enemy.xp_reward,
                gold_gained: self.enemy.gold_reward,
            });
            self.finish(CombatOutcome::PlayerVictory);
            true
        } else if self.character.health == 0 {
            events.push(CombatEvent::PlayerDied);
            self.finish(CombatOutcome::EnemyVictory);
            true
        } else {
            false
        }
    }

    fn finish(&mut self, outcome: CombatOutcome) {
        self.state = BattleState::Finished(outcome);
        tracing::info!(
            character = %self.character.name,
            enemy = %self.enemy.name,
            outcome = outcome.name(),
            turns = self.turn,
            "battle finished"
        );
    }
}
