//! Buying and selling.

use super::inventory::{has_item, remove_item};
use super::types::ItemDefinition;
use crate::character::types::Character;
use crate::core::constants::MAX_INVENTORY_SIZE;
use crate::core::error::{GameError, GameResult};

/// Buys one item. Gold is checked before inventory space.
pub fn purchase(character: &mut Character, item_id: &str, item: &ItemDefinition) -> GameResult<()> {
    if character.gold < item.cost {
        return Err(GameError::InsufficientGold {
            needed: item.cost,
            available: character.gold,
        });
    }
    if character.inventory.len() >= MAX_INVENTORY_SIZE {
        return Err(GameError::InventoryFull);
    }

    character.gold -= item.cost;
    character.inventory.push(item_id.to_string());

    tracing::debug!(item_id = %item_id, cost = item.cost, gold = character.gold, "purchased");
    Ok(())
}

/// Sells one item for half its cost, rounded down. Returns the gold received.
pub fn sell(character: &mut Character, item_id: &str, item: &ItemDefinition) -> GameResult<u32> {
    if !has_item(character, item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }

    let price = item.sell_price();
    remove_item(character, item_id)?;
    character.gold = character.gold.saturating_add(price);

    tracing::debug!(item_id = %item_id, price, gold = character.gold, "sold");
    Ok(price)
}
