//! The character record, its progression rules, and persistence.

#![allow(unused_imports)]

pub mod progression;
pub mod save;
pub mod types;

pub use progression::*;
pub use save::*;
pub use types::*;
