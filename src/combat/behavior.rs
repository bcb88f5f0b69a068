//! Opponent decision procedure, re-evaluated every opponent turn.
//!
//! Holds no state of its own: the choice depends only on the opponent's
//! health and potions, the player's poison status, and the draws taken from
//! the shared `Rolls`.

use crate::combat::action::{Action, ActionKind};
use crate::combat::combatant::Combatant;
use crate::combat::rolls::Rolls;
use crate::combat::types::Opponent;
use crate::core::constants::*;
use tracing::debug;

/// Which branch of the policy produced the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    DrinkPotion,
    Poison,
    LargeHit,
    SmallHit,
    PlainHit,
}

/// Picks the opponent's move for this turn. Drinking a potion spends it here.
pub fn choose_action(
    opponent: &mut Opponent,
    player_poisoned: bool,
    rolls: &mut impl Rolls,
) -> (Decision, Action) {
    let constants = opponent.tier.constants();

    if opponent.is_wounded() && opponent.potions() > 0 {
        let draw = rolls.percent();
        if draw <= constants.heal_probability && opponent.consume_potion() {
            debug!(
                opponent = %opponent.name,
                draw,
                potions_left = opponent.potions(),
                "opponent drinks a potion"
            );
            let heal = Action::generated("Potion", ActionKind::Healing, opponent.potion_heal() as f64, 0);
            return (Decision::DrinkPotion, heal);
        }
    }

    let draw = rolls.percent();
    let base = opponent.base_damage();

    let decision = if draw > POLICY_POISON_ABOVE && !player_poisoned {
        Decision::Poison
    } else if draw > POLICY_LARGE_HIT_ABOVE {
        // A poison draw against an already-poisoned player lands here too.
        Decision::LargeHit
    } else if draw > POLICY_SMALL_HIT_ABOVE {
        Decision::SmallHit
    } else {
        Decision::PlainHit
    };

    let action = match decision {
        Decision::Poison => Action::generated(
            "Venom",
            ActionKind::Poison,
            (base as f64 * OPPONENT_POISON_FRACTION).round(),
            opponent.poison_turns(),
        ),
        Decision::LargeHit => Action::generated(
            "Crushing Blow",
            ActionKind::Hit,
            (base + constants.large_bonus) as f64,
            0,
        ),
        Decision::SmallHit => Action::generated(
            "Heavy Swing",
            ActionKind::Hit,
            (base + constants.small_bonus) as f64,
            0,
        ),
        Decision::PlainHit | Decision::DrinkPotion => {
            Action::generated("Attack", ActionKind::Hit, base as f64, 0)
        }
    };

    debug!(
        opponent = %opponent.name,
        health = opponent.current_health(),
        draw,
        ?decision,
        magnitude = action.magnitude,
        "opponent chose action"
    );

    (decision, action)
}
