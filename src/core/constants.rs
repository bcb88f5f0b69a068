//! Tuning numbers for the battle engine.
//!
//! Every balance value lives here so formulas elsewhere never carry
//! magic numbers. Change once, test everywhere.

use std::time::Duration;

// =============================================================================
// SECONDARY ATTRIBUTES - base constants and per-point scaling
// =============================================================================

pub const BASE_HEALTH_POINTS: u32 = 1000;
pub const HEALTH_POINTS_PER_HEALTH: u32 = 1000;

pub const BASE_MANA: u32 = 500;
pub const MANA_PER_INTELLIGENCE: u32 = 500;

pub const BASE_MANA_REGEN: u32 = 100;
pub const MANA_REGEN_PER_INTELLIGENCE: u32 = 50;

pub const BASE_CRIT_CHANCE: f64 = 0.05;
pub const CRIT_CHANCE_PER_INTELLIGENCE: f64 = 0.01;
pub const CRIT_CHANCE_PER_ABILITIES: f64 = 0.02;

pub const BASE_DODGE_CHANCE: f64 = 0.05;
pub const DODGE_CHANCE_PER_INTELLIGENCE: f64 = 0.02;
pub const DODGE_CHANCE_PER_ABILITIES: f64 = 0.01;

pub const BASE_SPECIAL_DAMAGE: u32 = 800;
pub const SPECIAL_DAMAGE_PER_SPECIAL: u32 = 100;

// =============================================================================
// POINT BUDGET
// =============================================================================

/// Points available to a freshly created character.
pub const INITIAL_ATTRIBUTE_POINTS: u32 = 4;
pub const EXPERIENCE_PER_LEVEL: u64 = 1000;
pub const POINTS_PER_LEVEL: u32 = 2;

// =============================================================================
// RESOLUTION
// =============================================================================

pub const CRIT_MULTIPLIER: f64 = 1.5;

/// Player-authored magnitudes get a uniform offset in [-V, V].
pub const PLAYER_MAGNITUDE_VARIANCE: i32 = 100;

/// Mana a player enters every battle with (clamped to the Mana secondary).
pub const BATTLE_START_MANA: u32 = 500;

pub const OPPONENT_THINK_DELAY: Duration = Duration::from_millis(800);

// =============================================================================
// OPPONENT CONSTRUCTION
// =============================================================================

pub const OPPONENT_BASE_HEALTH: f64 = 1500.0;
pub const OPPONENT_HEALTH_PER_LEVEL: f64 = 400.0;
pub const OPPONENT_BASE_DAMAGE: f64 = 150.0;
pub const OPPONENT_DAMAGE_PER_LEVEL: f64 = 40.0;
pub const OPPONENT_BASE_REWARD: u64 = 300;
pub const OPPONENT_REWARD_PER_LEVEL: u64 = 50;

/// Construction-time variance applied to health and damage (min, max).
pub const OPPONENT_STAT_VARIANCE: (f64, f64) = (0.9, 1.1);

/// Poison damage per turn as a fraction of the opponent's base damage.
pub const OPPONENT_POISON_FRACTION: f64 = 0.5;
pub const OPPONENT_POISON_SHORT_TURNS: u32 = 2;
pub const OPPONENT_POISON_LONG_TURNS: u32 = 3;

// =============================================================================
// BEHAVIOR POLICY - cumulative branch thresholds over a 1..=100 draw
// =============================================================================

/// Draws above this value pick Poison (top 5%).
pub const POLICY_POISON_ABOVE: u32 = 95;
/// Draws above this value (and not Poison) pick the large bonus hit (next 10%).
pub const POLICY_LARGE_HIT_ABOVE: u32 = 85;
/// Draws above this value (and not above) pick the small bonus hit (next 35%).
pub const POLICY_SMALL_HIT_ABOVE: u32 = 50;

// =============================================================================
// COMBAT LOG
// =============================================================================

pub const COMBAT_LOG_CAPACITY: usize = 10;
