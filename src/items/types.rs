use crate::character::types::StatEffect;
use crate::core::error::GameError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The single `stat:magnitude` effect an item carries.
pub type ItemEffect = StatEffect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Weapon, ItemKind::Armor, ItemKind::Consumable];

    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Consumable => "consumable",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemKind::ALL
            .into_iter()
            .find(|k| k.name() == s.trim())
            .ok_or_else(|| format!("Invalid item type: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
}

impl EquipmentSlot {
    /// The item kind this slot accepts.
    pub fn kind(&self) -> ItemKind {
        match self {
            EquipmentSlot::Weapon => ItemKind::Weapon,
            EquipmentSlot::Armor => ItemKind::Armor,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EquipmentSlot::Weapon => "weapon",
            EquipmentSlot::Armor => "armor",
        }
    }
}

/// Immutable item record from the item table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Filled from the table key when loading JSON tables.
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub effect: ItemEffect,
    pub cost: u32,
    #[serde(default)]
    pub description: String,
}

impl ItemDefinition {
    /// Gold received when selling this item back to a shop.
    pub fn sell_price(&self) -> u32 {
        self.cost / crate::core::constants::SELL_PRICE_DIVISOR
    }

    pub(crate) fn require_kind(&self, expected: ItemKind) -> Result<(), GameError> {
        if self.kind == expected {
            Ok(())
        } else {
            Err(GameError::InvalidItemType {
                item: self.name.clone(),
                expected: expected.name(),
            })
        }
    }
}

/// Item definitions keyed by item id.
pub type ItemTable = BTreeMap<String, ItemDefinition>;
