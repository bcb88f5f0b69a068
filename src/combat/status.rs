//! Timed status effects.

use serde::{Deserialize, Serialize};

/// A per-turn magnitude with a countdown.
///
/// Inert whenever `turns_remaining == 0`. Re-arming overwrites; effects of
/// the same kind never stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusTimer<T> {
    pub magnitude: T,
    pub turns_remaining: u32,
}

impl<T: Copy + Default> StatusTimer<T> {
    pub fn new(magnitude: T, turns: u32) -> Self {
        Self {
            magnitude,
            turns_remaining: turns,
        }
    }

    pub fn is_active(&self) -> bool {
        self.turns_remaining > 0
    }

    /// Yields this turn's magnitude and ages the timer by one turn.
    /// Returns `None` without touching anything when inert.
    pub fn tick(&mut self) -> Option<T> {
        if !self.is_active() {
            return None;
        }
        self.turns_remaining -= 1;
        Some(self.magnitude)
    }

    /// Magnitude while active, `None` otherwise.
    pub fn current(&self) -> Option<T> {
        self.is_active().then_some(self.magnitude)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// What `on_turn_start` applied, for the turn's event log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnStartEffects {
    pub poison_damage: u32,
    pub healed: u32,
    pub mana_regenerated: u32,
}

impl TurnStartEffects {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
