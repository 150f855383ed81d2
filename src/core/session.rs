//! The one active character plus the reference tables it plays against.

use crate::character::progression::{add_gold, gain_experience, is_dead, revive};
use crate::character::types::Character;
use crate::combat::logic::{ActionSource, Battle};
use crate::combat::types::{can_fight, enemy_for_level, CombatOutcome, CombatResult, Enemy};
use crate::core::error::{GameError, GameResult};
use crate::items::equipment;
use crate::items::inventory::{inventory_summary, InventoryEntry};
use crate::items::shop;
use crate::items::types::{ItemDefinition, ItemTable};
use crate::quests::chain::prerequisite_chain;
use crate::quests::ledger;
use crate::quests::types::{QuestDefinition, QuestStatus, QuestTable, Rewards};
use rand::Rng;

/// Explicit game context handed to every action the driver performs.
///
/// The tables are loaded once and never mutated; only the character changes.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub character: Character,
    pub quests: QuestTable,
    pub items: ItemTable,
}

fn lookup_item<'a>(items: &'a ItemTable, item_id: &str) -> GameResult<&'a ItemDefinition> {
    items
        .get(item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))
}

impl GameSession {
    pub fn new(character: Character, quests: QuestTable, items: ItemTable) -> Self {
        Self {
            character,
            quests,
            items,
        }
    }

    pub fn item(&self, item_id: &str) -> GameResult<&ItemDefinition> {
        lookup_item(&self.items, item_id)
    }

    pub fn is_dead(&self) -> bool {
        is_dead(&self.character)
    }

    pub fn revive(&mut self) -> bool {
        revive(&mut self.character)
    }

    pub fn inventory_summary(&self) -> Vec<InventoryEntry> {
        inventory_summary(&self.character, &self.items)
    }

    pub fn use_item(&mut self, item_id: &str) -> GameResult<String> {
        let item = lookup_item(&self.items, item_id)?;
        equipment::use_item(&mut self.character, item_id, item)
    }

    pub fn equip_weapon(&mut self, item_id: &str) -> GameResult<String> {
        let item = lookup_item(&self.items, item_id)?;
        equipment::equip_weapon(&mut self.character, item_id, item)
    }

    pub fn equip_armor(&mut self, item_id: &str) -> GameResult<String> {
        let item = lookup_item(&self.items, item_id)?;
        equipment::equip_armor(&mut self.character, item_id, item)
    }

    pub fn unequip_weapon(&mut self) -> GameResult<Option<String>> {
        equipment::unequip_weapon(&mut self.character)
    }

    pub fn unequip_armor(&mut self) -> GameResult<Option<String>> {
        equipment::unequip_armor(&mut self.character)
    }

    pub fn purchase(&mut self, item_id: &str) -> GameResult<()> {
        let item = lookup_item(&self.items, item_id)?;
        shop::purchase(&mut self.character, item_id, item)
    }

    pub fn sell(&mut self, item_id: &str) -> GameResult<u32> {
        let item = lookup_item(&self.items, item_id)?;
        shop::sell(&mut self.character, item_id, item)
    }

    pub fn accept_quest(&mut self, quest_id: &str) -> GameResult<bool> {
        ledger::accept(&mut self.character, quest_id, &self.quests)
    }

    pub fn complete_quest(&mut self, quest_id: &str) -> GameResult<Rewards> {
        ledger::complete(&mut self.character, quest_id, &self.quests)
    }

    pub fn abandon_quest(&mut self, quest_id: &str) -> GameResult<()> {
        ledger::abandon(&mut self.character, quest_id)
    }

    pub fn quest_status(&self, quest_id: &str) -> Option<QuestStatus> {
        ledger::quest_status(&self.character, quest_id, &self.quests)
    }

    pub fn available_quests(&self) -> Vec<&QuestDefinition> {
        ledger::available_quests(&self.character, &self.quests)
    }

    pub fn active_quests(&self) -> Vec<&QuestDefinition> {
        ledger::active_quests(&self.character, &self.quests)
    }

    pub fn completed_quests(&self) -> Vec<&QuestDefinition> {
        ledger::completed_quests(&self.character, &self.quests)
    }

    pub fn completion_percentage(&self) -> f64 {
        ledger::completion_percentage(&self.character, &self.quests)
    }

    pub fn total_rewards_earned(&self) -> Rewards {
        ledger::total_rewards_earned(&self.character, &self.quests)
    }

    pub fn prerequisite_chain(&self, quest_id: &str) -> GameResult<Vec<&QuestDefinition>> {
        prerequisite_chain(quest_id, &self.quests)
    }

    /// Fights `enemy` to the end and, on victory, grants its rewards.
    pub fn fight(
        &mut self,
        enemy: Enemy,
        source: &mut impl ActionSource,
        rng: &mut impl Rng,
    ) -> GameResult<CombatResult> {
        let result = Battle::new(&mut self.character, enemy).run(source, rng)?;

        if result.outcome == CombatOutcome::PlayerVictory {
            gain_experience(&mut self.character, result.xp_gained)?;
            add_gold(&mut self.character, i64::from(result.gold_gained))?;
        }
        Ok(result)
    }

    /// Meets an enemy suited to the character's level and fights it.
    pub fn explore(&mut self, source: &mut impl ActionSource, rng: &mut impl Rng) -> GameResult<CombatResult> {
        if !can_fight(&self.character) {
            return Err(GameError::CharacterDead);
        }
        let enemy = enemy_for_level(self.character.level);
        self.fight(enemy, source, rng)
    }
}
