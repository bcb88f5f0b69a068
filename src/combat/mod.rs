//! Combat system types and logic.

#![allow(unused_imports)]

pub mod action;
pub mod battle;
pub mod behavior;
pub mod combatant;
pub mod host;
pub mod logic;
pub mod rolls;
pub mod status;
pub mod types;

pub use action::*;
pub use battle::*;
pub use behavior::*;
pub use combatant::*;
pub use host::*;
pub use logic::*;
pub use rolls::*;
pub use status::*;
pub use types::*;
