//! Reference data: quest and item tables and their starter files.

#![allow(unused_imports)]

pub mod defaults;
pub mod loader;

pub use defaults::*;
pub use loader::*;
