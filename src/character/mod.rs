//! Character attributes, derived stats and the player.

#![allow(unused_imports)]

pub mod attributes;
pub mod derived_stats;
pub mod player;

pub use attributes::*;
pub use derived_stats::*;
pub use player::*;
