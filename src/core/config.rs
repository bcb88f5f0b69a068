//! Battle and simulation configuration.

use crate::character::attributes::Attributes;
use crate::combat::rolls::RngRolls;
use crate::combat::types::Tier;
use crate::core::constants::{BATTLE_START_MANA, OPPONENT_THINK_DELAY};
use std::time::Duration;

/// Per-battle settings a host may override.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleConfig {
    /// Pause before each opponent move, owned by the host driver.
    pub opponent_think_delay: Duration,

    /// Mana the player opens a battle with, clamped to their Mana stat.
    pub battle_start_mana: u32,

    /// Seed for the battle's rolls (None = entropy)
    pub seed: Option<u64>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            opponent_think_delay: OPPONENT_THINK_DELAY,
            battle_start_mana: BATTLE_START_MANA,
            seed: None,
        }
    }
}

impl BattleConfig {
    /// No pacing delay; for headless runs and tests.
    pub fn headless(seed: u64) -> Self {
        Self {
            opponent_think_delay: Duration::ZERO,
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn with_think_delay(mut self, delay: Duration) -> Self {
        self.opponent_think_delay = delay;
        self
    }

    pub fn with_start_mana(mut self, mana: u32) -> Self {
        self.battle_start_mana = mana;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// A fresh roll source for this config's seed.
    pub fn rolls(&self) -> RngRolls {
        match self.seed {
            Some(seed) => RngRolls::seeded(seed),
            None => RngRolls::from_entropy(),
        }
    }
}

/// Configuration for a headless simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of battles, each with the next seed
    pub runs: u32,

    /// Seed of the first battle
    pub seed: u64,

    pub tier: Tier,

    /// Player experience; scales the opponent and the point budget
    pub experience: u64,

    /// Points spent by the simulated player
    pub attributes: Attributes,

    /// Log every narrative line
    pub verbose: bool,

    /// Only the final summary line
    pub quiet: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            runs: 1000,
            seed: 42,
            tier: Tier::Common,
            experience: 0,
            attributes: Attributes::new(),
            verbose: false,
            quiet: false,
        }
    }
}

impl SimConfig {
    /// The battle config for run number `run`.
    pub fn battle_config(&self, run: u32) -> BattleConfig {
        BattleConfig::headless(self.seed.wrapping_add(run as u64))
    }
}
