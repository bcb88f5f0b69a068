//! The single random source behind every battle roll.
//!
//! Dodge, crit, magnitude variance, opponent construction and opponent branch
//! selection all draw from one `Rolls` value owned by the caller, so a battle
//! replays exactly given the same seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

pub trait Rolls {
    /// Uniform in [0, 1).
    fn unit(&mut self) -> f64;

    /// Uniform over 1..=100.
    fn percent(&mut self) -> u32;

    /// Uniform integer in [-spread, spread].
    fn offset(&mut self, spread: i32) -> i32;

    /// Uniform in [min, max).
    fn scale(&mut self, min: f64, max: f64) -> f64;

    /// Uniform index in 0..len. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// `Rolls` backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngRolls<R = ChaCha8Rng> {
    rng: R,
}

impl RngRolls<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> RngRolls<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Rolls for RngRolls<R> {
    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn percent(&mut self) -> u32 {
        self.rng.gen_range(1..=100)
    }

    fn offset(&mut self, spread: i32) -> i32 {
        let spread = spread.abs();
        self.rng.gen_range(-spread..=spread)
    }

    fn scale(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays queued outcomes, falling back to neutral values once a queue runs dry.
///
/// Neutral means: unit rolls never dodge or crit, offsets are zero, scales
/// sit at the midpoint, picks take the first entry and percent draws are 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    units: VecDeque<f64>,
    percents: VecDeque<u32>,
    offsets: VecDeque<i32>,
    scales: VecDeque<f64>,
    picks: VecDeque<usize>,
}

impl ScriptedRolls {
    const NEUTRAL_UNIT: f64 = 0.999_999;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn units(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.units.extend(values);
        self
    }

    pub fn percents(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.percents.extend(values);
        self
    }

    pub fn offsets(mut self, values: impl IntoIterator<Item = i32>) -> Self {
        self.offsets.extend(values);
        self
    }

    pub fn scales(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.scales.extend(values);
        self
    }

    pub fn picks(mut self, values: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(values);
        self
    }

    /// True once every queued value has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.units.is_empty()
            && self.percents.is_empty()
            && self.offsets.is_empty()
            && self.scales.is_empty()
            && self.picks.is_empty()
    }
}

impl Rolls for ScriptedRolls {
    fn unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(Self::NEUTRAL_UNIT)
    }

    fn percent(&mut self) -> u32 {
        self.percents.pop_front().unwrap_or(1).clamp(1, 100)
    }

    fn offset(&mut self, spread: i32) -> i32 {
        let spread = spread.abs();
        self.offsets.pop_front().unwrap_or(0).clamp(-spread, spread)
    }

    fn scale(&mut self, min: f64, max: f64) -> f64 {
        self.scales.pop_front().unwrap_or((min + max) / 2.0)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0).min(len.saturating_sub(1))
    }
}
