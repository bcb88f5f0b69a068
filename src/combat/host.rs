//! The seam between a [`Battle`] and whatever presents it.
//!
//! A host supplies the player's choices and receives narrative and the final
//! outcome. [`run_battle`] drives the turn loop, including the pause before
//! each opponent move.

use crate::combat::action::{ActionId, Catalogue};
use crate::combat::battle::{Battle, BattleError, BattleOutcome, BattleSnapshot, BattleState, TurnReport};
use crate::combat::rolls::Rolls;
use crate::combat::types::CombatLogEntry;
use crate::core::config::BattleConfig;
use std::thread;
use tracing::{debug, warn};

pub trait BattleHost {
    /// Picks the player's next action. `available` lists the ids that pass
    /// gating right now and is never empty.
    fn choose_action(&mut self, snapshot: &BattleSnapshot, available: &[ActionId], catalogue: &Catalogue) -> ActionId;

    fn post_message(&mut self, entry: &CombatLogEntry);

    /// Called exactly once, after the last report.
    fn battle_ended(&mut self, outcome: BattleOutcome);
}

/// Plays `battle` to completion. Rejected choices are reported to the host
/// and asked for again. Turn-order errors abort, as does a player turn with
/// no usable action.
pub fn run_battle(
    battle: &mut Battle,
    host: &mut impl BattleHost,
    rolls: &mut impl Rolls,
    config: &BattleConfig,
) -> Result<BattleOutcome, BattleError> {
    loop {
        if let Some(outcome) = battle.outcome() {
            return Ok(outcome);
        }

        let report = if battle.state() == BattleState::PlayerTurn {
            let available = battle.available_actions();
            if available.is_empty() {
                warn!(turn = battle.turn(), "no usable action for the player");
                return Err(BattleError::NoAvailableActions);
            }
            let choice = host.choose_action(&battle.snapshot(), &available, battle.catalogue());
            match battle.submit_player_action(choice, rolls) {
                Ok(report) => report,
                Err(err) if err.is_recoverable() => {
                    debug!(%choice, %err, "host choice rejected, asking again");
                    host.post_message(&CombatLogEntry {
                        message: err.to_string(),
                        is_crit: false,
                        is_player_action: true,
                    });
                    continue;
                }
                Err(err) => return Err(err),
            }
        } else {
            if !config.opponent_think_delay.is_zero() {
                thread::sleep(config.opponent_think_delay);
            }
            battle.advance_opponent_turn(rolls)?
        };

        deliver(host, &report);
    }
}

fn deliver(host: &mut impl BattleHost, report: &TurnReport) {
    for entry in report.narrative() {
        host.post_message(entry);
    }
    if let Some(outcome) = report.outcome {
        host.battle_ended(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::player::Player;
    use crate::combat::battle::{start_battle, Side};
    use crate::combat::rolls::ScriptedRolls;
    use crate::combat::types::{Opponent, Tier};
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingHost {
        messages: Vec<String>,
        outcomes: Vec<BattleOutcome>,
        first_choice: Option<ActionId>,
    }

    impl BattleHost for RecordingHost {
        fn choose_action(&mut self, _: &BattleSnapshot, available: &[ActionId], _: &Catalogue) -> ActionId {
            self.first_choice.take().unwrap_or(available[0])
        }

        fn post_message(&mut self, entry: &CombatLogEntry) {
            self.messages.push(entry.message.clone());
        }

        fn battle_ended(&mut self, outcome: BattleOutcome) {
            self.outcomes.push(outcome);
        }
    }

    fn instant() -> BattleConfig {
        BattleConfig::default().with_think_delay(Duration::ZERO)
    }

    #[test]
    fn test_run_battle_reports_outcome_once() {
        let mut battle = start_battle(
            Player::new("Hero"),
            Opponent::from_parts("Orc", Tier::Common, 900, 100, 0, 0),
        );
        let mut host = RecordingHost::default();

        let outcome = run_battle(&mut battle, &mut host, &mut ScriptedRolls::new(), &instant()).unwrap();

        assert_eq!(outcome.winner, Side::Player);
        assert_eq!(host.outcomes, vec![outcome]);
        // Three strikes, two opponent attacks.
        assert_eq!(battle.turn(), 5);
        assert_eq!(host.messages.len(), 5);
    }

    #[test]
    fn test_rejected_choice_is_retried() {
        let mut battle = start_battle(
            Player::new("Hero"),
            Opponent::from_parts("Orc", Tier::Common, 300, 100, 0, 0),
        );
        let mut host = RecordingHost {
            first_choice: Some(ActionId(7)),
            ..Default::default()
        };

        let outcome = run_battle(&mut battle, &mut host, &mut ScriptedRolls::new(), &instant()).unwrap();

        assert_eq!(outcome.winner, Side::Player);
        assert!(host.messages[0].contains("ability points"));
    }

    #[test]
    fn test_unaffordable_catalogue_aborts() {
        let json = r#"[{"name": "Fireball", "kind": "Hit", "magnitude": 500.0, "mana_cost": 600}]"#;
        let mut battle = Battle::start(
            Player::new("Hero"),
            Opponent::from_parts("Orc", Tier::Common, 900, 100, 0, 0),
            Catalogue::from_json(json).unwrap(),
            &instant(),
        );
        let mut host = RecordingHost::default();

        let result = run_battle(&mut battle, &mut host, &mut ScriptedRolls::new(), &instant());

        assert_eq!(result, Err(BattleError::NoAvailableActions));
        assert!(!BattleError::NoAvailableActions.is_recoverable());
        assert!(host.outcomes.is_empty());
        assert_eq!(battle.state(), BattleState::PlayerTurn);
    }
}
