//! Skirmish - turn-based battle engine
//!
//! A player with allocated attribute points fights a tiered opponent. The
//! host drives a [`Battle`] one turn at a time and renders what each
//! [`TurnReport`] says happened; every random outcome comes from a single
//! injectable [`Rolls`] source so battles replay from a seed.

pub mod character;
pub mod combat;
pub mod core;

pub use crate::character::attributes::{Attribute, AttributeError, Attributes, PrimaryAttribute, SecondaryAttribute};
pub use crate::character::player::Player;
pub use crate::combat::action::{Action, ActionId, ActionKind, Catalogue, CatalogueError, Rejection};
pub use crate::combat::battle::{
    start_battle, Battle, BattleError, BattleEvent, BattleOutcome, BattleSnapshot, BattleState, Side, TurnReport,
};
pub use crate::combat::combatant::Combatant;
pub use crate::combat::host::{run_battle, BattleHost};
pub use crate::combat::rolls::{RngRolls, Rolls, ScriptedRolls};
pub use crate::combat::types::{CombatLogEntry, Opponent, Tier};
pub use crate::core::config::BattleConfig;
