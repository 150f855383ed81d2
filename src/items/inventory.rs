//! Item possession: a bounded, ordered bag of item ids.

use super::types::ItemTable;
use crate::character::types::Character;
use crate::core::constants::MAX_INVENTORY_SIZE;
use crate::core::error::{GameError, GameResult};

pub fn add_item(character: &mut Character, item_id: &str) -> GameResult<()> {
    if character.inventory.len() >= MAX_INVENTORY_SIZE {
        return Err(GameError::InventoryFull);
    }
    character.inventory.push(item_id.to_string());
    Ok(())
}

/// Removes the first occurrence of `item_id`.
pub fn remove_item(character: &mut Character, item_id: &str) -> GameResult<()> {
    let index = character
        .inventory
        .iter()
        .position(|id| id == item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))?;
    character.inventory.remove(index);
    Ok(())
}

pub fn has_item(character: &Character, item_id: &str) -> bool {
    character.inventory.iter().any(|id| id == item_id)
}

pub fn count_item(character: &Character, item_id: &str) -> usize {
    character.inventory.iter().filter(|id| *id == item_id).count()
}

pub fn space_remaining(character: &Character) -> usize {
    MAX_INVENTORY_SIZE.saturating_sub(character.inventory.len())
}

/// Empties the inventory, returning what was in it.
pub fn clear_inventory(character: &mut Character) -> Vec<String> {
    std::mem::take(&mut character.inventory)
}

/// One line of an inventory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub item_id: String,
    /// `None` when the id is missing from the item table.
    pub name: Option<String>,
    pub count: usize,
}

/// Groups the inventory by item id in first-acquisition order.
pub fn inventory_summary(character: &Character, items: &ItemTable) -> Vec<InventoryEntry> {
    let mut entries: Vec<InventoryEntry> = Vec::new();

    for item_id in &character.inventory {
        if let Some(entry) = entries.iter_mut().find(|e| &e.item_id == item_id) {
            entry.count += 1;
            continue;
        }

        let name = items.get(item_id).map(|def| def.name.clone());
        if name.is_none() {
            tracing::warn!(item_id = %item_id, "inventory holds an item missing from the item table");
        }
        entries.push(InventoryEntry {
            item_id: item_id.clone(),
            name,
            count: 1,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::types::Archetype;

    fn hero() -> Character {
        Character::new("Hero".to_string(), Archetype::Warrior)
    }

    #[test]
    fn test_add_until_full() {
        let mut hero = hero();
        for _ in 0..MAX_INVENTORY_SIZE {
            add_item(&mut hero, "rock").unwrap();
        }
        assert_eq!(space_remaining(&hero), 0);
        assert_eq!(add_item(&mut hero, "rock"), Err(GameError::InventoryFull));
        assert_eq!(hero.inventory.len(), MAX_INVENTORY_SIZE);
    }

    #[test]
    fn test_remove_one_occurrence() {
        let mut hero = hero();
        hero.inventory = vec!["a".into(), "b".into(), "a".into()];
        remove_item(&mut hero, "a").unwrap();
        assert_eq!(hero.inventory, vec!["b", "a"]);
        assert_eq!(count_item(&hero, "a"), 1);
        assert_eq!(
            remove_item(&mut hero, "z"),
            Err(GameError::ItemNotFound("z".to_string()))
        );
    }

    #[test]
    fn test_has_and_clear() {
        let mut hero = hero();
        hero.inventory = vec!["a".into(), "b".into()];
        assert!(has_item(&hero, "b"));
        assert!(!has_item(&hero, "c"));
        assert_eq!(clear_inventory(&mut hero), vec!["a", "b"]);
        assert!(hero.inventory.is_empty());
    }

    #[test]
    fn test_summary_groups_in_order() {
        let mut hero = hero();
        hero.inventory = vec!["b".into(), "a".into(), "b".into()];
        let summary = inventory_summary(&hero, &ItemTable::new());
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].item_id, "b");
        assert_eq!(summary[0].count, 2);
        assert_eq!(summary[1].item_id, "a");
        assert!(summary[1].name.is_none());
    }
}
