use serde::{Deserialize, Serialize};
use std::fmt;

pub const NUM_PRIMARY_ATTRIBUTES: usize = 4;

/// Directly point-allocated stats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PrimaryAttribute {
    Intelligence,
    Health,
    Special,
    Abilities,
}

impl PrimaryAttribute {
    pub fn all() -> [PrimaryAttribute; NUM_PRIMARY_ATTRIBUTES] {
        [
            PrimaryAttribute::Intelligence,
            PrimaryAttribute::Health,
            PrimaryAttribute::Special,
            PrimaryAttribute::Abilities,
        ]
    }

    pub fn abbrev(&self) -> &str {
        match self {
            PrimaryAttribute::Intelligence => "INT",
            PrimaryAttribute::Health => "HLT",
            PrimaryAttribute::Special => "SPC",
            PrimaryAttribute::Abilities => "ABL",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            PrimaryAttribute::Intelligence => 0,
            PrimaryAttribute::Health => 1,
            PrimaryAttribute::Special => 2,
            PrimaryAttribute::Abilities => 3,
        }
    }
}

/// Stats derived from the primary ones. Never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SecondaryAttribute {
    HealthPoints,
    Mana,
    ManaRegen,
    CritChance,
    DodgeChance,
    SpecialDamage,
}

impl SecondaryAttribute {
    pub fn all() -> [SecondaryAttribute; 6] {
        [
            SecondaryAttribute::HealthPoints,
            SecondaryAttribute::Mana,
            SecondaryAttribute::ManaRegen,
            SecondaryAttribute::CritChance,
            SecondaryAttribute::DodgeChance,
            SecondaryAttribute::SpecialDamage,
        ]
    }
}

/// Any attribute identifier, as handed over by a host (e.g. an attribute
/// editing panel that lists both sets).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Attribute {
    Primary(PrimaryAttribute),
    Secondary(SecondaryAttribute),
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Primary(attr) => write!(f, "{:?}", attr),
            Attribute::Secondary(attr) => write!(f, "{:?}", attr),
        }
    }
}

impl From<PrimaryAttribute> for Attribute {
    fn from(attr: PrimaryAttribute) -> Self {
        Attribute::Primary(attr)
    }
}

impl From<SecondaryAttribute> for Attribute {
    fn from(attr: SecondaryAttribute) -> Self {
        Attribute::Secondary(attr)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    /// Primary accessor called with a secondary attribute, or vice versa.
    #[error("unsupported attribute: {attribute}")]
    Unsupported { attribute: Attribute },

    #[error("not enough unspent points: requested {requested}, available {available}")]
    InsufficientPoints { requested: u32, available: u32 },

    #[error("cannot remove {requested} points from {attribute:?}, only {allocated} allocated")]
    NotEnoughAllocated {
        attribute: PrimaryAttribute,
        requested: u32,
        allocated: u32,
    },
}

/// Points spent on each primary attribute.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attributes {
    values: [u32; NUM_PRIMARY_ATTRIBUTES],
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates Attributes from individual point values.
    pub fn from_points(intelligence: u32, health: u32, special: u32, abilities: u32) -> Self {
        Self {
            values: [intelligence, health, special, abilities],
        }
    }

    pub fn get(&self, attr: PrimaryAttribute) -> u32 {
        self.values[attr.index()]
    }

    pub fn set(&mut self, attr: PrimaryAttribute, value: u32) {
        self.values[attr.index()] = value;
    }

    /// Looks up a primary attribute through the umbrella identifier.
    pub fn primary(&self, attr: Attribute) -> Result<u32, AttributeError> {
        match attr {
            Attribute::Primary(primary) => Ok(self.get(primary)),
            Attribute::Secondary(_) => Err(AttributeError::Unsupported { attribute: attr }),
        }
    }

    /// Points spent across all four attributes. Wide enough that no
    /// combination of `u32` values overflows.
    pub fn total(&self) -> u64 {
        self.values.iter().map(|&v| v as u64).sum()
    }
}
