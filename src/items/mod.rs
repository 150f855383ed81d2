//! Item system: definitions, inventory, equipment, and the shop.

#![allow(unused_imports)]

pub mod equipment;
pub mod inventory;
pub mod shop;
pub mod types;

pub use equipment::*;
pub use inventory::*;
pub use shop::*;
pub use types::*;
