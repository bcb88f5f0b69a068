//! Action resolution.
//!
//! Each call applies every mutation one action causes, then returns. Roll
//! order is fixed: dodge (targeted kinds), crit (Hit and Special), then the
//! magnitude variance (player moves only).
//!
//! The two directions differ:
//! - player moves add a uniform offset in [-PLAYER_MAGNITUDE_VARIANCE,
//!   PLAYER_MAGNITUDE_VARIANCE] to the base magnitude, then apply the crit
//!   multiplier and round to nearest;
//! - opponent moves get no offset, and the crit product is truncated.

use crate::character::attributes::SecondaryAttribute;
use crate::character::player::Player;
use crate::combat::action::{Action, ActionKind};
use crate::combat::battle::Side;
use crate::combat::combatant::Combatant;
use crate::combat::rolls::Rolls;
use crate::combat::types::{CombatLogEntry, Opponent};
use crate::core::constants::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What one resolved action did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub actor: Side,
    pub action: String,
    pub kind: ActionKind,
    pub dodged: bool,
    pub is_crit: bool,
    /// Rolled magnitude (after variance and crit) for point-valued kinds.
    pub amount: u32,
    /// Health actually removed from the target.
    pub damage_dealt: u32,
    /// Health actually restored to the actor.
    pub healed: u32,
    pub log: CombatLogEntry,
}

impl Resolution {
    fn new(actor: Side, action: &Action) -> Self {
        Self {
            actor,
            action: action.name.clone(),
            kind: action.kind,
            dodged: false,
            is_crit: false,
            amount: 0,
            damage_dealt: 0,
            healed: 0,
            log: CombatLogEntry {
                message: String::new(),
                is_crit: false,
                is_player_action: actor == Side::Player,
            },
        }
    }

    fn say(&mut self, message: String) {
        self.log.message = message;
        self.log.is_crit = self.is_crit;
    }
}

/// Dodge check: true when the target avoids the action entirely.
fn roll_dodge(kind: ActionKind, target_dodge: f64, rolls: &mut impl Rolls) -> bool {
    kind.targets_opponent() && rolls.unit() < target_dodge
}

fn roll_crit(kind: ActionKind, actor_crit: f64, rolls: &mut impl Rolls) -> bool {
    kind.can_crit() && rolls.unit() < actor_crit
}

/// Resolves a player move against `opponent`. Mana must already be paid.
pub fn resolve_player_action(
    action: &Action,
    player: &mut Player,
    opponent: &mut Opponent,
    rolls: &mut impl Rolls,
) -> Resolution {
    let mut res = Resolution::new(Side::Player, action);

    if roll_dodge(action.kind, opponent.dodge_chance(), rolls) {
        res.dodged = true;
        res.say(format!("{} dodges your {}!", opponent.name, action.name));
        debug!(action = %action.name, "player action dodged");
        return res;
    }

    res.is_crit = roll_crit(action.kind, player.crit_chance(), rolls);

    if action.kind != ActionKind::Protection {
        let base = match action.kind {
            ActionKind::Special => player.secondary(SecondaryAttribute::SpecialDamage),
            _ => action.magnitude,
        };
        let variance = rolls.offset(PLAYER_MAGNITUDE_VARIANCE);
        let multiplier = if res.is_crit { CRIT_MULTIPLIER } else { 1.0 };
        res.amount = ((base + variance as f64).max(0.0) * multiplier).round() as u32;
    }

    match action.kind {
        ActionKind::Hit | ActionKind::Special => {
            res.damage_dealt = opponent.inflict_damage(res.amount);
            let prefix = if res.is_crit { "Critical! " } else { "" };
            res.say(format!(
                "{}Your {} hits {} for {} damage.",
                prefix, action.name, opponent.name, res.damage_dealt
            ));
        }
        ActionKind::Poison => {
            opponent.inflict_poison(res.amount, action.duration);
            res.say(format!(
                "Your {} poisons {} for {} damage over {} turns.",
                action.name, opponent.name, res.amount, action.duration
            ));
        }
        ActionKind::Healing => {
            res.healed = player.add_health(res.amount);
            if action.duration > 0 {
                player.arm_healing(res.amount, action.duration);
                res.say(format!(
                    "{} restores {} health and will heal {} per turn for {} turns.",
                    action.name, res.healed, res.amount, action.duration
                ));
            } else {
                res.say(format!("{} restores {} health.", action.name, res.healed));
            }
        }
        ActionKind::Protection => {
            player.arm_protection(action.magnitude, action.duration);
            res.say(format!(
                "{} shields you: incoming damage x{:.2} for {} turns.",
                action.name, action.magnitude, action.duration
            ));
        }
    }

    debug!(
        action = %action.name,
        kind = %action.kind,
        crit = res.is_crit,
        amount = res.amount,
        damage = res.damage_dealt,
        healed = res.healed,
        opponent_health = opponent.current_health(),
        "player action resolved"
    );
    res
}

/// Resolves an opponent move against `player`.
pub fn resolve_opponent_action(
    action: &Action,
    opponent: &mut Opponent,
    player: &mut Player,
    rolls: &mut impl Rolls,
) -> Resolution {
    let mut res = Resolution::new(Side::Opponent, action);

    if roll_dodge(action.kind, player.dodge_chance(), rolls) {
        res.dodged = true;
        res.say(format!("You dodge {}'s {}!", opponent.name, action.name));
        debug!(action = %action.name, "opponent action dodged");
        return res;
    }

    res.is_crit = roll_crit(action.kind, opponent.crit_chance(), rolls);
    let multiplier = if res.is_crit { CRIT_MULTIPLIER } else { 1.0 };
    res.amount = (action.magnitude.max(0.0) * multiplier) as u32;

    match action.kind {
        // Opponents have no SpecialDamage; their Special uses the stored magnitude.
        ActionKind::Hit | ActionKind::Special => {
            res.damage_dealt = player.inflict_damage(res.amount);
            let prefix = if res.is_crit { "Critical! " } else { "" };
            res.say(format!(
                "{}{}'s {} hits you for {} damage.",
                prefix, opponent.name, action.name, res.damage_dealt
            ));
        }
        ActionKind::Poison => {
            player.inflict_poison(res.amount, action.duration);
            res.say(format!(
                "{}'s {} poisons you for {} damage over {} turns.",
                opponent.name, action.name, res.amount, action.duration
            ));
        }
        ActionKind::Healing => {
            res.healed = opponent.add_health(res.amount);
            res.say(format!(
                "{} uses a {} and restores {} health.",
                opponent.name, action.name, res.healed
            ));
        }
        ActionKind::Protection => {
            warn!(action = %action.name, "opponents cannot hold a protection effect");
            res.say(format!("{} braces, to no effect.", opponent.name));
        }
    }

    debug!(
        action = %action.name,
        kind = %action.kind,
        crit = res.is_crit,
        amount = res.amount,
        damage = res.damage_dealt,
        healed = res.healed,
        player_health = player.current_health(),
        "opponent action resolved"
    );
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::attributes::Attributes;
    use crate::combat::action::{ActionId, Catalogue};
    use crate::combat::rolls::ScriptedRolls;
    use crate::combat::types::Tier;

    /// Rolls that never dodge or crit and add no variance.
    fn plain_rolls() -> ScriptedRolls {
        ScriptedRolls::new()
    }

    fn hit(magnitude: f64) -> Action {
        Action {
            name: "Test Hit".to_string(),
            kind: ActionKind::Hit,
            magnitude,
            duration: 0,
            mana_cost: 0,
            required_ability_points: 0,
        }
    }

    fn orc(health: u32) -> Opponent {
        Opponent::from_parts("Orc", Tier::Common, health, 100, 1, 200)
    }

    #[test]
    fn test_lethal_hit() {
        let mut player = Player::new("Hero");
        let mut opponent = orc(300);
        let res = resolve_player_action(&hit(500.0), &mut player, &mut opponent, &mut plain_rolls());

        assert!(!res.dodged);
        assert!(!res.is_crit);
        assert_eq!(res.amount, 500);
        assert_eq!(res.damage_dealt, 300);
        assert_eq!(opponent.current_health(), 0);
        assert!(opponent.is_dead());
        assert!(res.log.is_player_action);
    }

    #[test]
    fn test_dodge_stops_every_targeted_kind() {
        let catalogue = Catalogue::builtin();
        for id in [ActionId(0), ActionId(2), ActionId(7)] {
            let action = catalogue.get(id).unwrap();
            let mut player = Player::new("Hero");
            let mut opponent = orc(1000);
            let mut rolls = ScriptedRolls::new().units([0.0]);

            let res = resolve_player_action(action, &mut player, &mut opponent, &mut rolls);
            assert!(res.dodged);
            assert_eq!(opponent.current_health(), 1000);
            assert!(!opponent.has_poison_effect());
            assert!(res.log.message.contains("dodges"));
        }
    }

    #[test]
    fn test_player_variance_then_crit() {
        let mut player = Player::new("Hero");
        let mut opponent = orc(5000);
        // dodge miss, crit hit, +100 variance
        let mut rolls = ScriptedRolls::new().units([0.99, 0.0]).offsets([100]);

        let res = resolve_player_action(&hit(300.0), &mut player, &mut opponent, &mut rolls);
        assert!(res.is_crit);
        assert_eq!(res.amount, 600); // (300 + 100) * 1.5
        assert_eq!(opponent.current_health(), 4400);
        assert!(res.log.is_crit);
        assert!(res.log.message.starts_with("Critical!"));
    }

    #[test]
    fn test_special_uses_special_damage() {
        let attrs = Attributes::from_points(0, 0, 3, 0);
        let mut player = Player::with_attributes("Mage", attrs, 0).unwrap();
        let mut opponent = orc(5000);
        let burst = Catalogue::builtin().get(ActionId(7)).cloned().unwrap();

        let res = resolve_player_action(&burst, &mut player, &mut opponent, &mut plain_rolls());
        assert_eq!(res.amount, 1100); // 800 + 3 * 100
        assert_eq!(opponent.current_health(), 3900);
    }

    #[test]
    fn test_poison_overwrites_instead_of_stacking() {
        let mut player = Player::new("Hero");
        let mut opponent = orc(5000);
        let dart = Catalogue::builtin().get(ActionId(2)).cloned().unwrap();

        resolve_player_action(&dart, &mut player, &mut opponent, &mut plain_rolls());
        assert_eq!(opponent.poison().magnitude, 150);
        assert_eq!(opponent.poison().turns_remaining, 3);

        let mut rolls = ScriptedRolls::new().offsets([-50]);
        resolve_player_action(&dart, &mut player, &mut opponent, &mut rolls);
        assert_eq!(opponent.poison().magnitude, 100);
        assert_eq!(opponent.poison().turns_remaining, 3);
    }

    #[test]
    fn test_healing_is_self_targeted_and_never_dodged() {
        let mut player = Player::new("Hero");
        player.inflict_damage(600);
        let mut opponent = orc(1000);
        let regen = Catalogue::builtin().get(ActionId(5)).cloned().unwrap();
        // A unit roll of 0.0 would dodge a targeted kind; healing never draws it.
        let mut rolls = ScriptedRolls::new().units([0.0]);

        let res = resolve_player_action(&regen, &mut player, &mut opponent, &mut rolls);
        assert!(!res.dodged);
        assert_eq!(res.healed, 250);
        assert_eq!(player.current_health(), 650);
        assert!(player.has_healing_effect());
        assert_eq!(player.healing().magnitude, 250);
        assert_eq!(opponent.current_health(), 1000);
    }

    #[test]
    fn test_protection_arms_multiplier_without_variance() {
        let mut player = Player::new("Hero");
        let mut opponent = orc(1000);
        let skin = Catalogue::builtin().get(ActionId(6)).cloned().unwrap();
        let mut rolls = ScriptedRolls::new().offsets([77]);

        resolve_player_action(&skin, &mut player, &mut opponent, &mut rolls);
        assert_eq!(player.protection().magnitude, 0.5);
        assert_eq!(player.protection().turns_remaining, 3);
        // The offset was never consumed.
        assert!(!rolls.is_exhausted());
    }

    #[test]
    fn test_opponent_crit_truncates_and_has_no_variance() {
        let mut player = Player::new("Hero");
        let mut opponent = orc(1000);
        let mut rolls = ScriptedRolls::new().units([0.99, 0.0]).offsets([100]);

        let res = resolve_opponent_action(&hit(155.0), &mut opponent, &mut player, &mut rolls);
        assert!(res.is_crit);
        assert_eq!(res.amount, 232); // 155 * 1.5 = 232.5, truncated
        assert_eq!(player.current_health(), 768);
        assert!(!res.log.is_player_action);
        assert!(!rolls.is_exhausted());
    }

    #[test]
    fn test_opponent_hit_respects_protection() {
        let mut player = Player::new("Hero");
        player.arm_protection(0.5, 2);
        let mut opponent = orc(1000);

        let res = resolve_opponent_action(&hit(300.0), &mut opponent, &mut player, &mut plain_rolls());
        assert_eq!(res.amount, 300);
        assert_eq!(res.damage_dealt, 150);
        assert_eq!(player.current_health(), 850);
    }

    #[test]
    fn test_opponent_potion_heals_self() {
        let mut player = Player::new("Hero");
        let mut opponent = orc(1000);
        opponent.inflict_damage(600);
        let potion = Action::generated("Potion", ActionKind::Healing, 200.0, 0);

        let res = resolve_opponent_action(&potion, &mut opponent, &mut player, &mut plain_rolls());
        assert_eq!(res.healed, 200);
        assert_eq!(opponent.current_health(), 600);
        assert_eq!(player.current_health(), 1000);
    }

    #[test]
    fn test_player_dodges_opponent_poison() {
        let mut player = Player::new("Hero");
        let mut opponent = orc(1000);
        let venom = Action::generated("Venom", ActionKind::Poison, 50.0, 2);
        let mut rolls = ScriptedRolls::new().units([0.01]);

        let res = resolve_opponent_action(&venom, &mut opponent, &mut player, &mut rolls);
        assert!(res.dodged);
        assert!(!player.has_poison_effect());
    }
}
