//! Turn-based combat: enemies, special abilities, and battle resolution.

#![allow(unused_imports)]

pub mod abilities;
pub mod logic;
pub mod types;

pub use abilities::*;
pub use logic::*;
pub use types::*;
