//! Turn-based battle state machine.
//!
//! `PlayerTurn -> OpponentTurn -> PlayerTurn ...` until one side dies, then
//! `Resolved(winner)`. Entering a turn runs that combatant's
//! `on_turn_start` before anything else, so a poison tick can end the battle
//! before the turn's action is ever chosen.
//!
//! Every call either fails without touching state or applies one whole turn
//! and hands back an immutable [`TurnReport`].

use crate::character::player::Player;
use crate::combat::action::{Action, ActionId, Catalogue, Rejection};
use crate::combat::behavior::choose_action;
use crate::combat::combatant::Combatant;
use crate::combat::logic::{resolve_opponent_action, resolve_player_action, Resolution};
use crate::combat::rolls::Rolls;
use crate::combat::status::{StatusTimer, TurnStartEffects};
use crate::combat::types::{CombatLogEntry, Opponent};
use crate::core::config::BattleConfig;
use crate::core::constants::COMBAT_LOG_CAPACITY;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleState {
    PlayerTurn,
    OpponentTurn,
    /// Terminal; carries the winner.
    Resolved(Side),
}

/// Terminal notification, emitted exactly once per battle.
///
/// `experience_reward` is the opponent's configured reward whichever side
/// won; awarding it is the host's call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub winner: Side,
    pub experience_reward: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// A combatant's turn began and its timed effects were applied.
    TurnStarted {
        side: Side,
        effects: TurnStartEffects,
        log: Option<CombatLogEntry>,
    },
    ActionResolved(Resolution),
    BattleEnded(BattleOutcome),
}

impl BattleEvent {
    pub fn log(&self) -> Option<&CombatLogEntry> {
        match self {
            BattleEvent::TurnStarted { log, .. } => log.as_ref(),
            BattleEvent::ActionResolved(res) => Some(&res.log),
            BattleEvent::BattleEnded(_) => None,
        }
    }
}

/// Both sides' observable state after a completed turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub state: BattleState,
    pub turn: u32,
    pub player_health: u32,
    pub player_max_health: u32,
    pub player_mana: u32,
    pub player_max_mana: u32,
    pub player_poison: StatusTimer<u32>,
    pub player_healing: StatusTimer<u32>,
    pub player_protection: StatusTimer<f64>,
    pub opponent_name: String,
    pub opponent_health: u32,
    pub opponent_max_health: u32,
    pub opponent_potions: u32,
    pub opponent_poison: StatusTimer<u32>,
}

/// Everything one call changed, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub events: Vec<BattleEvent>,
    pub snapshot: BattleSnapshot,
    pub outcome: Option<BattleOutcome>,
}

impl TurnReport {
    /// Narrative lines in the order they happened.
    pub fn narrative(&self) -> impl Iterator<Item = &CombatLogEntry> {
        self.events.iter().filter_map(BattleEvent::log)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BattleError {
    /// The submission failed gating; nothing changed.
    #[error("action rejected: {0}")]
    Rejected(#[from] Rejection),

    /// The host called for a turn the battle is not in.
    #[error("out of turn: expected {expected:?}, battle is in {actual:?}")]
    OutOfTurn {
        expected: BattleState,
        actual: BattleState,
    },

    /// The player's turn came up with nothing in the catalogue usable.
    #[error("no catalogue action is usable this turn")]
    NoAvailableActions,
}

impl BattleError {
    /// Rejections are user errors; turn-order violations are host bugs.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BattleError::Rejected(_))
    }
}

/// Starts a battle with the built-in catalogue and default config.
pub fn start_battle(player: Player, opponent: Opponent) -> Battle {
    Battle::start(player, opponent, Catalogue::builtin(), &BattleConfig::default())
}

/// One fight between the player and an opponent. Owns both until
/// [`Battle::finish`] hands them back.
#[derive(Debug, Clone)]
pub struct Battle {
    player: Player,
    opponent: Opponent,
    catalogue: Catalogue,
    state: BattleState,
    turn: u32,
    outcome: Option<BattleOutcome>,
    combat_log: VecDeque<CombatLogEntry>,
}

impl Battle {
    /// Resets the player's health, mana and effects and opens on the
    /// player's turn. The opponent is taken as-is; call `reset` on it first
    /// to retry an encounter.
    pub fn start(mut player: Player, mut opponent: Opponent, catalogue: Catalogue, config: &BattleConfig) -> Self {
        player.prepare_for_battle(config.battle_start_mana);
        if opponent.is_dead() {
            warn!(opponent = %opponent.name, "battle started against a dead opponent, resetting it");
            opponent.reset();
        }

        info!(
            player = %player.name,
            opponent = %opponent.name,
            tier = %opponent.tier,
            player_health = player.current_health(),
            opponent_health = opponent.current_health(),
            "battle started"
        );

        Self {
            player,
            opponent,
            catalogue,
            state: BattleState::PlayerTurn,
            turn: 0,
            outcome: None,
            combat_log: VecDeque::with_capacity(COMBAT_LOG_CAPACITY),
        }
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn opponent(&self) -> &Opponent {
        &self.opponent
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Actions resolved so far.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, BattleState::Resolved(_))
    }

    /// The last few narrative lines.
    pub fn combat_log(&self) -> &VecDeque<CombatLogEntry> {
        &self.combat_log
    }

    /// Hands both combatants back to the host.
    pub fn finish(self) -> (Player, Opponent) {
        (self.player, self.opponent)
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            state: self.state,
            turn: self.turn,
            player_health: self.player.current_health(),
            player_max_health: self.player.max_health(),
            player_mana: self.player.mana(),
            player_max_mana: self.player.max_mana(),
            player_poison: self.player.poison(),
            player_healing: self.player.healing(),
            player_protection: self.player.protection(),
            opponent_name: self.opponent.name.clone(),
            opponent_health: self.opponent.current_health(),
            opponent_max_health: self.opponent.max_health(),
            opponent_potions: self.opponent.potions(),
            opponent_poison: self.opponent.poison(),
        }
    }

    /// Gates an action against the current state without changing anything.
    pub fn check_action(&self, id: ActionId) -> Result<&Action, Rejection> {
        let action = self.catalogue.get(id).ok_or(Rejection::UnknownAction(id.0))?;
        action.check(&self.player, &self.opponent)?;
        Ok(action)
    }

    /// Catalogue entries that would pass gating right now.
    pub fn available_actions(&self) -> Vec<ActionId> {
        self.catalogue
            .iter()
            .filter(|(_, action)| action.check(&self.player, &self.opponent).is_ok())
            .map(|(id, _)| id)
            .collect()
    }

    /// Plays the player's turn with catalogue action `id`.
    pub fn submit_player_action(&mut self, id: ActionId, rolls: &mut impl Rolls) -> Result<TurnReport, BattleError> {
        self.expect_state(BattleState::PlayerTurn)?;

        let action = match self.check_action(id) {
            Ok(action) => action.clone(),
            Err(rejection) => {
                warn!(action = %id, %rejection, "player action rejected");
                return Err(rejection.into());
            }
        };

        self.player.spend_mana(action.mana_cost);
        let resolution = resolve_player_action(&action, &mut self.player, &mut self.opponent, rolls);
        Ok(self.complete_turn(resolution, Side::Opponent))
    }

    /// Plays the opponent's turn. The host owns any pacing delay before this.
    pub fn advance_opponent_turn(&mut self, rolls: &mut impl Rolls) -> Result<TurnReport, BattleError> {
        self.expect_state(BattleState::OpponentTurn)?;

        let player_poisoned = self.player.has_poison_effect();
        let (_, action) = choose_action(&mut self.opponent, player_poisoned, rolls);
        let resolution = resolve_opponent_action(&action, &mut self.opponent, &mut self.player, rolls);
        Ok(self.complete_turn(resolution, Side::Player))
    }

    fn expect_state(&self, expected: BattleState) -> Result<(), BattleError> {
        if self.state == expected {
            return Ok(());
        }
        warn!(?expected, actual = ?self.state, "battle driven out of turn");
        Err(BattleError::OutOfTurn {
            expected,
            actual: self.state,
        })
    }

    fn complete_turn(&mut self, resolution: Resolution, next: Side) -> TurnReport {
        self.turn += 1;
        self.push_log(resolution.log.clone());
        let mut events = vec![BattleEvent::ActionResolved(resolution)];

        if !self.settle(&mut events) {
            self.enter_turn(next, &mut events);
        }

        TurnReport {
            events,
            snapshot: self.snapshot(),
            outcome: self.outcome,
        }
    }

    /// Hands the turn to `side` and applies its timed effects.
    fn enter_turn(&mut self, side: Side, events: &mut Vec<BattleEvent>) {
        self.state = match side {
            Side::Player => BattleState::PlayerTurn,
            Side::Opponent => BattleState::OpponentTurn,
        };

        let (effects, log) = match side {
            Side::Player => {
                let effects = self.player.on_turn_start();
                (effects, tick_log(&effects, "you", true))
            }
            Side::Opponent => {
                let effects = self.opponent.on_turn_start();
                let name = self.opponent.name.clone();
                (effects, tick_log(&effects, &name, false))
            }
        };
        debug!(?side, ?effects, turn = self.turn, "turn started");

        if let Some(entry) = &log {
            self.push_log(entry.clone());
        }
        events.push(BattleEvent::TurnStarted { side, effects, log });
        self.settle(events);
    }

    /// Moves to `Resolved` if a side is dead. Returns true once resolved.
    fn settle(&mut self, events: &mut Vec<BattleEvent>) -> bool {
        if self.is_over() {
            return true;
        }
        let winner = if self.opponent.is_dead() {
            Side::Player
        } else if self.player.is_dead() {
            Side::Opponent
        } else {
            return false;
        };

        let outcome = BattleOutcome {
            winner,
            experience_reward: self.opponent.experience_reward(),
        };
        self.state = BattleState::Resolved(winner);
        self.outcome = Some(outcome);
        events.push(BattleEvent::BattleEnded(outcome));

        info!(
            ?winner,
            turns = self.turn,
            experience_reward = outcome.experience_reward,
            "battle resolved"
        );
        true
    }

    fn push_log(&mut self, entry: CombatLogEntry) {
        if self.combat_log.len() >= COMBAT_LOG_CAPACITY {
            self.combat_log.pop_front();
        }
        self.combat_log.push_back(entry);
    }
}

fn tick_log(effects: &TurnStartEffects, who: &str, is_player: bool) -> Option<CombatLogEntry> {
    let mut parts = Vec::new();
    if effects.poison_damage > 0 {
        parts.push(format!("poison deals {} damage to {}", effects.poison_damage, who));
    }
    if effects.healed > 0 {
        parts.push(format!("{} regenerate{} {} health", who, if is_player { "" } else { "s" }, effects.healed));
    }
    if parts.is_empty() {
        return None;
    }
    let mut message = parts.join(", ");
    if let Some(first) = message.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    message.push('.');
    Some(CombatLogEntry {
        message,
        is_crit: false,
        is_player_action: is_player,
    })
}
