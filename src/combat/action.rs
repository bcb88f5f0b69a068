//! Battle moves, the player's catalogue, and the gating rules that decide
//! whether a move may be attempted.

use crate::character::player::Player;
use crate::combat::combatant::Combatant;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Hit,
    Poison,
    Healing,
    Protection,
    /// Damage computed at resolution time from the actor's SpecialDamage.
    Special,
}

impl ActionKind {
    /// Kinds aimed at the other combatant (and therefore dodgeable).
    pub fn targets_opponent(&self) -> bool {
        matches!(self, ActionKind::Hit | ActionKind::Poison | ActionKind::Special)
    }

    /// Kinds that roll for a critical hit.
    pub fn can_crit(&self) -> bool {
        matches!(self, ActionKind::Hit | ActionKind::Special)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActionKind::Hit => "hit",
            ActionKind::Poison => "poison",
            ActionKind::Healing => "healing",
            ActionKind::Protection => "protection",
            ActionKind::Special => "special",
        };
        f.write_str(label)
    }
}

/// One immutable move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub kind: ActionKind,
    /// Damage, poison per turn or heal amount. For Protection, the incoming
    /// damage multiplier. Unused by Special.
    pub magnitude: f64,
    /// Turns the effect lasts; 0 is instantaneous.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub mana_cost: u32,
    /// Minimum Abilities points needed to attempt it.
    #[serde(default)]
    pub required_ability_points: u32,
}

impl Action {
    /// An opponent-generated move: no cost, no requirement.
    pub fn generated(name: impl Into<String>, kind: ActionKind, magnitude: f64, duration: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            magnitude,
            duration,
            mana_cost: 0,
            required_ability_points: 0,
        }
    }

    /// Checks whether `player` may attempt this move against `target`.
    /// Never mutates anything.
    pub fn check(&self, player: &Player, target: &impl Combatant) -> Result<(), Rejection> {
        if player.ability_points() < self.required_ability_points {
            return Err(Rejection::InsufficientAbilityPoints {
                required: self.required_ability_points,
                available: player.ability_points(),
            });
        }
        if player.mana() < self.mana_cost {
            return Err(Rejection::InsufficientMana {
                required: self.mana_cost,
                available: player.mana(),
            });
        }
        match self.kind {
            ActionKind::Poison if target.has_poison_effect() => Err(Rejection::TargetAlreadyPoisoned),
            ActionKind::Healing if self.duration > 0 && player.has_healing_effect() => {
                Err(Rejection::EffectAlreadyActive(ActionKind::Healing))
            }
            ActionKind::Protection if player.has_protection_effect() => {
                Err(Rejection::EffectAlreadyActive(ActionKind::Protection))
            }
            _ => Ok(()),
        }
    }
}

/// Why a player submission was refused. Recoverable: nothing was changed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("no action with id {0}")]
    UnknownAction(usize),

    #[error("requires {required} ability points, have {available}")]
    InsufficientAbilityPoints { required: u32, available: u32 },

    #[error("requires {required} mana, have {available}")]
    InsufficientMana { required: u32, available: u32 },

    #[error("a {0} effect is already active")]
    EffectAlreadyActive(ActionKind),

    #[error("target is already poisoned")]
    TargetAlreadyPoisoned,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("catalogue JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalogue has no actions")]
    Empty,

    #[error("action '{name}': {reason}")]
    InvalidAction { name: String, reason: &'static str },
}

/// Index into a [`Catalogue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub usize);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Built-in player moves:
/// (name, kind, magnitude, duration, mana_cost, required_ability_points).
pub const PLAYER_ACTION_TABLE: &[(&str, ActionKind, f64, u32, u32, u32)] = &[
    ("Strike", ActionKind::Hit, 300.0, 0, 0, 0),
    ("Heavy Blow", ActionKind::Hit, 550.0, 0, 150, 1),
    ("Venom Dart", ActionKind::Poison, 150.0, 3, 200, 0),
    ("Toxic Cloud", ActionKind::Poison, 250.0, 4, 400, 3),
    ("Bandage", ActionKind::Healing, 400.0, 0, 150, 0),
    ("Regeneration", ActionKind::Healing, 250.0, 3, 350, 2),
    ("Stone Skin", ActionKind::Protection, 0.5, 3, 300, 1),
    ("Arcane Burst", ActionKind::Special, 0.0, 0, 500, 2),
];

/// The player-selectable moves for a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalogue {
    actions: Vec<Action>,
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalogue {
    pub fn builtin() -> Self {
        let actions = PLAYER_ACTION_TABLE
            .iter()
            .map(|&(name, kind, magnitude, duration, mana_cost, required_ability_points)| Action {
                name: name.to_string(),
                kind,
                magnitude,
                duration,
                mana_cost,
                required_ability_points,
            })
            .collect();
        Self { actions }
    }

    pub fn new(actions: Vec<Action>) -> Result<Self, CatalogueError> {
        let catalogue = Self { actions };
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// Loads a tuned table: a JSON array of action objects.
    pub fn from_json(json: &str) -> Result<Self, CatalogueError> {
        let actions: Vec<Action> = serde_json::from_str(json)?;
        Self::new(actions)
    }

    pub fn to_json(&self) -> Result<String, CatalogueError> {
        Ok(serde_json::to_string_pretty(&self.actions)?)
    }

    fn validate(&self) -> Result<(), CatalogueError> {
        if self.actions.is_empty() {
            return Err(CatalogueError::Empty);
        }
        for action in &self.actions {
            let invalid = |reason| CatalogueError::InvalidAction {
                name: action.name.clone(),
                reason,
            };
            if !action.magnitude.is_finite() || action.magnitude < 0.0 {
                return Err(invalid("magnitude must be a non-negative number"));
            }
            if action.kind == ActionKind::Protection {
                if action.magnitude <= 0.0 || action.magnitude > 1.0 {
                    return Err(invalid("protection multiplier must be in (0, 1]"));
                }
                if action.duration == 0 {
                    return Err(invalid("protection needs a duration"));
                }
            }
            if action.kind == ActionKind::Poison && action.duration == 0 {
                return Err(invalid("poison needs a duration"));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<ActionId> {
        self.actions
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))
            .map(ActionId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &Action)> {
        self.actions.iter().enumerate().map(|(i, a)| (ActionId(i), a))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
