//! Core engine plumbing: constants, the error taxonomy, and the session context.

#![allow(unused_imports)]

pub mod constants;
pub mod error;
pub mod session;

pub use constants::*;
pub use error::*;
pub use session::*;
