//! Consumable use and weapon/armor equipment.
//!
//! Equipping records the exact effect applied as a bonus record on the
//! slot. Unequipping reverses that record, never the current item data,
//! so definitions may change between the two calls.

use super::inventory::{has_item, remove_item};
use super::types::{EquipmentSlot, ItemDefinition, ItemKind};
use crate::character::types::{Character, EquippedItem, Stat, StatEffect};
use crate::core::constants::MAX_INVENTORY_SIZE;
use crate::core::error::{GameError, GameResult};

impl Character {
    pub fn slot(&self, slot: EquipmentSlot) -> Option<&EquippedItem> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<EquippedItem> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
        }
    }
}

/// Applies a stat effect to the character and returns the effect that
/// actually landed.
///
/// Health never rises above max health. Lowering max health pulls current
/// health down with it. Stats floor at zero, so a large negative effect may
/// land smaller than its nominal magnitude. Stats the character does not
/// carry are ignored and the effect comes back unchanged.
pub fn apply_stat_effect(character: &mut Character, effect: &StatEffect) -> StatEffect {
    let delta = effect.magnitude;
    let landed = match &effect.stat {
        Stat::Health => {
            let before = character.health;
            character.health = character
                .health
                .saturating_add_signed(delta)
                .min(character.max_health);
            signed_change(before, character.health)
        }
        Stat::MaxHealth => {
            let before = character.max_health;
            character.max_health = character.max_health.saturating_add_signed(delta);
            character.health = character.health.min(character.max_health);
            signed_change(before, character.max_health)
        }
        Stat::Strength => {
            let before = character.strength;
            character.strength = character.strength.saturating_add_signed(delta);
            signed_change(before, character.strength)
        }
        Stat::Magic => {
            let before = character.magic;
            character.magic = character.magic.saturating_add_signed(delta);
            signed_change(before, character.magic)
        }
        Stat::Other(name) => {
            tracing::debug!(stat = %name, "ignoring effect on unknown stat");
            delta
        }
    };
    StatEffect::new(effect.stat.clone(), landed)
}

fn signed_change(before: u32, after: u32) -> i32 {
    let change = i64::from(after) - i64::from(before);
    i32::try_from(change).unwrap_or(if change < 0 { i32::MIN } else { i32::MAX })
}

/// Consumes one consumable from the inventory and applies its effect.
pub fn use_item(character: &mut Character, item_id: &str, item: &ItemDefinition) -> GameResult<String> {
    if !has_item(character, item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }
    item.require_kind(ItemKind::Consumable)?;

    apply_stat_effect(character, &item.effect);
    remove_item(character, item_id)?;

    tracing::debug!(item_id = %item_id, effect = %item.effect, "used item");
    Ok(format!("Used {}.", item.name))
}

/// Equips an item into `slot`, first returning any current occupant to the
/// inventory. Fails without changing anything if that return would
/// overflow the inventory.
pub fn equip(
    character: &mut Character,
    slot: EquipmentSlot,
    item_id: &str,
    item: &ItemDefinition,
) -> GameResult<String> {
    if !has_item(character, item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }
    item.require_kind(slot.kind())?;

    if character.slot(slot).is_some() {
        unequip(character, slot)?;
    }

    let landed = apply_stat_effect(character, &item.effect);
    remove_item(character, item_id)?;
    tracing::debug!(slot = slot.name(), item_id = %item_id, bonus = %landed, "equipped");
    *character.slot_mut(slot) = Some(EquippedItem {
        item_id: item_id.to_string(),
        bonus: Some(landed),
    });

    Ok(format!("Equipped {}.", item.name))
}

/// Removes the item in `slot`, reverses its recorded bonus and returns it
/// to the inventory. Returns `Ok(None)` if the slot was empty.
pub fn unequip(character: &mut Character, slot: EquipmentSlot) -> GameResult<Option<String>> {
    if character.slot(slot).is_none() {
        return Ok(None);
    }
    if character.inventory.len() >= MAX_INVENTORY_SIZE {
        return Err(GameError::InventoryFull);
    }

    let Some(equipped) = character.slot_mut(slot).take() else {
        return Ok(None);
    };

    if let Some(bonus) = &equipped.bonus {
        apply_stat_effect(character, &bonus.inverse());
    }
    character.inventory.push(equipped.item_id.clone());

    tracing::debug!(slot = slot.name(), item_id = %equipped.item_id, "unequipped");
    Ok(Some(equipped.item_id))
}

pub fn equip_weapon(character: &mut Character, item_id: &str, item: &ItemDefinition) -> GameResult<String> {
    equip(character, EquipmentSlot::Weapon, item_id, item)
}

pub fn equip_armor(character: &mut Character, item_id: &str, item: &ItemDefinition) -> GameResult<String> {
    equip(character, EquipmentSlot::Armor, item_id, item)
}

pub fn unequip_weapon(character: &mut Character) -> GameResult<Option<String>> {
    unequip(character, EquipmentSlot::Weapon)
}

pub fn unequip_armor(character: &mut Character) -> GameResult<Option<String>> {
    unequip(character, EquipmentSlot::Armor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::types::Archetype;

    fn item(id: &str, kind: ItemKind, effect: &str) -> ItemDefinition {
        ItemDefinition {
            id: id.to_string(),
            name: id.to_string(),
            kind,
            effect: effect.parse().unwrap(),
            cost: 10,
            description: String::new(),
        }
    }

    fn hero() -> Character {
        Character::new("Hero".to_string(), Archetype::Warrior)
    }

    #[test]
    fn test_health_effect_clamps_to_max() {
        let mut hero = hero();
        hero.health = 110;
        apply_stat_effect(&mut hero, &StatEffect::new(Stat::Health, 20));
        assert_eq!(hero.health, 120);
    }

    #[test]
    fn test_max_health_effect_pulls_health_down() {
        let mut hero = hero();
        apply_stat_effect(&mut hero, &StatEffect::new(Stat::MaxHealth, -20));
        assert_eq!(hero.max_health, 100);
        assert_eq!(hero.health, 100);
    }

    #[test]
    fn test_unknown_stat_ignored() {
        let mut hero = hero();
        let before = hero.clone();
        apply_stat_effect(&mut hero, &StatEffect::new(Stat::Other("luck".into()), 7));
        assert_eq!(hero, before);
    }

    #[test]
    fn test_negative_effect_reports_clamped_change() {
        let mut hero = hero();
        let landed = apply_stat_effect(&mut hero, &StatEffect::new(Stat::Strength, -40));
        assert_eq!(hero.strength, 0);
        assert_eq!(landed, StatEffect::new(Stat::Strength, -15));
    }

    #[test]
    fn test_cursed_gear_round_trip() {
        let mut hero = Character::new("Hero".to_string(), Archetype::Mage);
        hero.inventory = vec!["cursed_blade".into(), "cursed_mail".into()];
        let blade = item("cursed_blade", ItemKind::Weapon, "strength:-20");
        let mail = item("cursed_mail", ItemKind::Armor, "max_health:-200");

        equip_weapon(&mut hero, "cursed_blade", &blade).unwrap();
        assert_eq!(hero.strength, 0);
        assert_eq!(
            hero.weapon.as_ref().and_then(|w| w.bonus.clone()),
            Some(StatEffect::new(Stat::Strength, -8))
        );
        unequip_weapon(&mut hero).unwrap();
        assert_eq!(hero.strength, 8);

        equip_armor(&mut hero, "cursed_mail", &mail).unwrap();
        assert_eq!((hero.max_health, hero.health), (0, 0));
        unequip_armor(&mut hero).unwrap();
        // Max health comes back; health lost to the clamp does not.
        assert_eq!(hero.max_health, 80);
        assert_eq!(hero.health, 0);
    }

    #[test]
    fn test_use_item() {
        let mut hero = hero();
        hero.health = 50;
        hero.inventory.push("potion".into());
        let potion = item("potion", ItemKind::Consumable, "health:20");

        assert_eq!(use_item(&mut hero, "potion", &potion).unwrap(), "Used potion.");
        assert_eq!(hero.health, 70);
        assert!(hero.inventory.is_empty());

        assert_eq!(
            use_item(&mut hero, "potion", &potion),
            Err(GameError::ItemNotFound("potion".into()))
        );
    }

    #[test]
    fn test_use_non_consumable() {
        let mut hero = hero();
        hero.inventory.push("sword".into());
        let sword = item("sword", ItemKind::Weapon, "strength:5");
        assert!(matches!(
            use_item(&mut hero, "sword", &sword),
            Err(GameError::InvalidItemType { .. })
        ));
        assert_eq!(hero.inventory, vec!["sword"]);
    }

    #[test]
    fn test_equip_and_unequip_weapon() {
        let mut hero = hero();
        hero.inventory.push("sword".into());
        let sword = item("sword", ItemKind::Weapon, "strength:5");

        equip_weapon(&mut hero, "sword", &sword).unwrap();
        assert_eq!(hero.strength, 20);
        assert_eq!(hero.equipped_weapon(), Some("sword"));
        assert!(hero.inventory.is_empty());

        assert_eq!(unequip_weapon(&mut hero).unwrap(), Some("sword".to_string()));
        assert_eq!(hero.strength, 15);
        assert_eq!(hero.inventory, vec!["sword"]);
        assert_eq!(unequip_weapon(&mut hero).unwrap(), None);
    }

    #[test]
    fn test_equip_wrong_slot() {
        let mut hero = hero();
        hero.inventory.push("sword".into());
        let sword = item("sword", ItemKind::Weapon, "strength:5");
        assert_eq!(
            equip_armor(&mut hero, "sword", &sword),
            Err(GameError::InvalidItemType {
                item: "sword".into(),
                expected: "armor"
            })
        );
    }

    #[test]
    fn test_equip_swaps_out_current() {
        let mut hero = hero();
        hero.inventory = vec!["dagger".into(), "sword".into()];
        let dagger = item("dagger", ItemKind::Weapon, "strength:2");
        let sword = item("sword", ItemKind::Weapon, "strength:5");

        equip_weapon(&mut hero, "dagger", &dagger).unwrap();
        equip_weapon(&mut hero, "sword", &sword).unwrap();

        assert_eq!(hero.strength, 20);
        assert_eq!(hero.equipped_weapon(), Some("sword"));
        assert_eq!(hero.inventory, vec!["dagger"]);
    }

    #[test]
    fn test_unequip_reverses_recorded_bonus_not_item_data() {
        let mut hero = hero();
        hero.inventory.push("sword".into());
        let mut sword = item("sword", ItemKind::Weapon, "strength:5");
        equip_weapon(&mut hero, "sword", &sword).unwrap();

        // Item data changes after equipping.
        sword.effect = "strength:50".parse().unwrap();
        let _ = sword;

        unequip_weapon(&mut hero).unwrap();
        assert_eq!(hero.strength, 15);
    }

    #[test]
    fn test_equip_aborts_when_reclaim_would_overflow() {
        let mut hero = hero();
        hero.inventory.push("dagger".into());
        let dagger = item("dagger", ItemKind::Weapon, "strength:2");
        equip_weapon(&mut hero, "dagger", &dagger).unwrap();

        hero.inventory = vec!["sword".to_string(); MAX_INVENTORY_SIZE];
        let sword = item("sword", ItemKind::Weapon, "strength:5");
        let before = hero.clone();

        assert_eq!(
            equip_weapon(&mut hero, "sword", &sword),
            Err(GameError::InventoryFull)
        );
        assert_eq!(hero, before);
    }

    #[test]
    fn test_armor_max_health_round_trip() {
        let mut hero = hero();
        hero.inventory.push("mail".into());
        let mail = item("mail", ItemKind::Armor, "max_health:10");

        equip_armor(&mut hero, "mail", &mail).unwrap();
        assert_eq!(hero.max_health, 130);
        assert_eq!(hero.health, 120);

        unequip_armor(&mut hero).unwrap();
        assert_eq!(hero.max_health, 120);
        assert_eq!(hero.health, 120);
    }
}
