//! Quest Chronicles - turn-based text RPG engine.
//!
//! The engines mutate one [`character::Character`] in place and report
//! typed failures; [`core::GameSession`] bundles that character with the
//! quest and item tables for the driver in `main.rs`.

pub mod build_info;
pub mod character;
pub mod combat;
pub mod core;
pub mod data;
pub mod items;
pub mod quests;
