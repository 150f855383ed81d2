//! Quest system: definitions, the per-character ledger, and prerequisite chains.

#![allow(unused_imports)]

pub mod chain;
pub mod ledger;
pub mod types;

pub use chain::*;
pub use ledger::*;
pub use types::*;
