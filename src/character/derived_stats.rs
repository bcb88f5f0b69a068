use super::attributes::{Attribute, AttributeError, Attributes, PrimaryAttribute, SecondaryAttribute};
use crate::core::constants::*;

/// Computes one secondary attribute from the current primary points.
///
/// Pure: the same points always produce the same value. Chances are
/// fractions in [0, 1); everything else is a whole number carried as f64.
pub fn secondary(attr: SecondaryAttribute, attrs: &Attributes) -> f64 {
    let int = attrs.get(PrimaryAttribute::Intelligence);
    let hlt = attrs.get(PrimaryAttribute::Health);
    let spc = attrs.get(PrimaryAttribute::Special);
    let abl = attrs.get(PrimaryAttribute::Abilities);

    match attr {
        SecondaryAttribute::HealthPoints => linear(BASE_HEALTH_POINTS, HEALTH_POINTS_PER_HEALTH, hlt),
        SecondaryAttribute::Mana => linear(BASE_MANA, MANA_PER_INTELLIGENCE, int),
        SecondaryAttribute::ManaRegen => linear(BASE_MANA_REGEN, MANA_REGEN_PER_INTELLIGENCE, int),
        SecondaryAttribute::CritChance => {
            BASE_CRIT_CHANCE
                + CRIT_CHANCE_PER_INTELLIGENCE * int as f64
                + CRIT_CHANCE_PER_ABILITIES * abl as f64
        }
        SecondaryAttribute::DodgeChance => {
            BASE_DODGE_CHANCE
                + DODGE_CHANCE_PER_INTELLIGENCE * int as f64
                + DODGE_CHANCE_PER_ABILITIES * abl as f64
        }
        SecondaryAttribute::SpecialDamage => linear(BASE_SPECIAL_DAMAGE, SPECIAL_DAMAGE_PER_SPECIAL, spc),
    }
}

// Computed in f64 so large point counts cannot overflow.
fn linear(base: u32, per_point: u32, points: u32) -> f64 {
    base as f64 + per_point as f64 * points as f64
}

/// Umbrella-identifier form of [`secondary`]; a primary attribute is a
/// contract violation.
pub fn secondary_of(attr: Attribute, attrs: &Attributes) -> Result<f64, AttributeError> {
    match attr {
        Attribute::Secondary(secondary_attr) => Ok(secondary(secondary_attr, attrs)),
        Attribute::Primary(_) => Err(AttributeError::Unsupported { attribute: attr }),
    }
}

/// All six secondaries for one set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedStats {
    pub health_points: u32,
    pub mana: u32,
    pub mana_regen: u32,
    pub crit_chance: f64,
    pub dodge_chance: f64,
    pub special_damage: u32,
}

impl DerivedStats {
    /// Whole-number stats saturate at `u32::MAX`.
    pub fn from_attributes(attrs: &Attributes) -> Self {
        let whole = |attr| secondary(attr, attrs).min(u32::MAX as f64) as u32;
        Self {
            health_points: whole(SecondaryAttribute::HealthPoints),
            mana: whole(SecondaryAttribute::Mana),
            mana_regen: whole(SecondaryAttribute::ManaRegen),
            crit_chance: secondary(SecondaryAttribute::CritChance, attrs),
            dodge_chance: secondary(SecondaryAttribute::DodgeChance, attrs),
            special_damage: whole(SecondaryAttribute::SpecialDamage),
        }
    }
}
