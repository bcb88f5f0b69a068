//! The player character: spent points, experience and in-battle state.

use super::attributes::{AttributeError, Attributes, PrimaryAttribute, SecondaryAttribute};
use super::derived_stats::{secondary, DerivedStats};
use crate::combat::combatant::Combatant;
use crate::combat::status::{StatusTimer, TurnStartEffects};
use crate::core::constants::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    attributes: Attributes,
    experience: u64,
    health: u32,
    mana: u32,
    poison: StatusTimer<u32>,
    healing: StatusTimer<u32>,
    /// Multiplier applied to incoming damage while active.
    protection: StatusTimer<f64>,
}

impl Player {
    /// A fresh character: no experience, no points spent, full health.
    pub fn new(name: impl Into<String>) -> Self {
        let attributes = Attributes::new();
        let stats = DerivedStats::from_attributes(&attributes);
        Self {
            name: name.into(),
            attributes,
            experience: 0,
            health: stats.health_points,
            mana: BATTLE_START_MANA.min(stats.mana),
            poison: StatusTimer::default(),
            healing: StatusTimer::default(),
            protection: StatusTimer::default(),
        }
    }

    /// Builds a character with points already spent. Fails when the points
    /// exceed what `experience` allows.
    pub fn with_attributes(
        name: impl Into<String>,
        attributes: Attributes,
        experience: u64,
    ) -> Result<Self, AttributeError> {
        let mut player = Self::new(name);
        player.experience = experience;
        let budget = player.points_budget();
        if attributes.total() > budget as u64 {
            return Err(AttributeError::InsufficientPoints {
                requested: u32::try_from(attributes.total()).unwrap_or(u32::MAX),
                available: budget,
            });
        }
        player.attributes = attributes;
        player.health = player.max_health();
        player.mana = BATTLE_START_MANA.min(player.max_mana());
        Ok(player)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn derived(&self) -> DerivedStats {
        DerivedStats::from_attributes(&self.attributes)
    }

    pub fn secondary(&self, attr: SecondaryAttribute) -> f64 {
        secondary(attr, &self.attributes)
    }

    pub fn ability_points(&self) -> u32 {
        self.attributes.get(PrimaryAttribute::Abilities)
    }

    // ── Progression ──────────────────────────────────────────────────

    pub fn experience(&self) -> u64 {
        self.experience
    }

    pub fn level(&self) -> u64 {
        self.experience / EXPERIENCE_PER_LEVEL
    }

    /// Total points this character may have spent.
    pub fn points_budget(&self) -> u32 {
        let earned = self.level().saturating_mul(POINTS_PER_LEVEL as u64);
        let earned = u32::try_from(earned).unwrap_or(u32::MAX);
        INITIAL_ATTRIBUTE_POINTS.saturating_add(earned)
    }

    pub fn unspent_points(&self) -> u32 {
        let unspent = (self.points_budget() as u64).saturating_sub(self.attributes.total());
        u32::try_from(unspent).unwrap_or(u32::MAX)
    }

    pub fn award_experience(&mut self, amount: u64) {
        self.experience = self.experience.saturating_add(amount);
    }

    pub fn allocate(&mut self, attr: PrimaryAttribute, points: u32) -> Result<(), AttributeError> {
        let available = self.unspent_points();
        if points > available {
            return Err(AttributeError::InsufficientPoints {
                requested: points,
                available,
            });
        }
        self.attributes
            .set(attr, self.attributes.get(attr).saturating_add(points));
        Ok(())
    }

    pub fn deallocate(&mut self, attr: PrimaryAttribute, points: u32) -> Result<(), AttributeError> {
        let allocated = self.attributes.get(attr);
        if points > allocated {
            return Err(AttributeError::NotEnoughAllocated {
                attribute: attr,
                requested: points,
                allocated,
            });
        }
        self.attributes.set(attr, allocated - points);
        self.health = self.health.min(self.max_health());
        self.mana = self.mana.min(self.max_mana());
        Ok(())
    }

    // ── Battle state ─────────────────────────────────────────────────

    /// Full health, `start_mana` (clamped to Mana) and no running effects.
    pub fn prepare_for_battle(&mut self, start_mana: u32) {
        self.health = self.max_health();
        self.mana = start_mana.min(self.max_mana());
        self.poison.clear();
        self.healing.clear();
        self.protection.clear();
    }

    pub fn mana(&self) -> u32 {
        self.mana
    }

    pub fn max_mana(&self) -> u32 {
        self.derived().mana
    }

    pub fn spend_mana(&mut self, cost: u32) {
        self.mana = self.mana.saturating_sub(cost);
    }

    pub fn poison(&self) -> StatusTimer<u32> {
        self.poison
    }

    pub fn healing(&self) -> StatusTimer<u32> {
        self.healing
    }

    pub fn protection(&self) -> StatusTimer<f64> {
        self.protection
    }

    pub fn has_healing_effect(&self) -> bool {
        self.healing.is_active()
    }

    pub fn has_protection_effect(&self) -> bool {
        self.protection.is_active()
    }

    pub fn arm_healing(&mut self, heal_per_turn: u32, turns: u32) {
        self.healing = StatusTimer::new(heal_per_turn, turns);
    }

    pub fn arm_protection(&mut self, multiplier: f64, turns: u32) {
        self.protection = StatusTimer::new(multiplier, turns);
    }
}

impl Combatant for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn current_health(&self) -> u32 {
        self.health
    }

    fn max_health(&self) -> u32 {
        self.derived().health_points
    }

    fn add_health(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health());
        self.health - before
    }

    fn inflict_damage(&mut self, amount: u32) -> u32 {
        let amount = match self.protection.current() {
            Some(multiplier) => (amount as f64 * multiplier).round().max(0.0) as u32,
            None => amount,
        };
        let lost = amount.min(self.health);
        self.health -= lost;
        lost
    }

    fn inflict_poison(&mut self, damage_per_turn: u32, turns: u32) {
        self.poison = StatusTimer::new(damage_per_turn, turns);
    }

    fn has_poison_effect(&self) -> bool {
        self.poison.is_active()
    }

    fn crit_chance(&self) -> f64 {
        self.secondary(SecondaryAttribute::CritChance)
    }

    fn dodge_chance(&self) -> f64 {
        self.secondary(SecondaryAttribute::DodgeChance)
    }

    fn on_turn_start(&mut self) -> TurnStartEffects {
        let mut effects = TurnStartEffects::default();

        if let Some(damage) = self.poison.tick() {
            effects.poison_damage = self.inflict_damage(damage);
        }
        if let Some(heal) = self.healing.tick() {
            effects.healed = self.add_health(heal);
        }
        self.protection.tick();

        let before = self.mana;
        self.mana = self
            .mana
            .saturating_add(self.derived().mana_regen)
            .min(self.max_mana());
        effects.mana_regenerated = self.mana - before;

        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_player() {
        let player = Player::new("Test Hero");
        assert_eq!(player.name, "Test Hero");
        assert_eq!(player.experience(), 0);
        assert_eq!(player.current_health(), 1000);
        assert_eq!(player.max_health(), 1000);
        assert_eq!(player.mana(), 500);
        assert_eq!(player.points_budget(), INITIAL_ATTRIBUTE_POINTS);
        assert!(!player.has_poison_effect());
        assert!(!player.has_healing_effect());
        assert!(!player.has_protection_effect());
    }

    #[test]
    fn test_points_budget_grows_with_levels() {
        let mut player = Player::new("Hero");
        player.award_experience(EXPERIENCE_PER_LEVEL * 3 - 1);
        assert_eq!(player.level(), 2);
        assert_eq!(player.points_budget(), INITIAL_ATTRIBUTE_POINTS + 2 * POINTS_PER_LEVEL);

        player.award_experience(1);
        assert_eq!(player.points_budget(), INITIAL_ATTRIBUTE_POINTS + 3 * POINTS_PER_LEVEL);
    }

    #[test]
    fn test_allocate_respects_budget() {
        let mut player = Player::new("Hero");
        player.allocate(PrimaryAttribute::Health, 3).unwrap();
        assert_eq!(player.unspent_points(), INITIAL_ATTRIBUTE_POINTS - 3);

        let err = player
            .allocate(PrimaryAttribute::Special, INITIAL_ATTRIBUTE_POINTS)
            .unwrap_err();
        assert_eq!(
            err,
            AttributeError::InsufficientPoints {
                requested: INITIAL_ATTRIBUTE_POINTS,
                available: INITIAL_ATTRIBUTE_POINTS - 3,
            }
        );
        assert_eq!(player.attributes().get(PrimaryAttribute::Special), 0);
    }

    #[test]
    fn test_deallocate_clamps_pools() {
        let mut player = Player::new("Hero");
        player.allocate(PrimaryAttribute::Health, 2).unwrap();
        player.prepare_for_battle(BATTLE_START_MANA);
        assert_eq!(player.current_health(), 3000);

        player.deallocate(PrimaryAttribute::Health, 2).unwrap();
        assert_eq!(player.current_health(), 1000);

        assert!(matches!(
            player.deallocate(PrimaryAttribute::Health, 1),
            Err(AttributeError::NotEnoughAllocated { allocated: 0, .. })
        ));
    }

    #[test]
    fn test_with_attributes_over_budget() {
        let attrs = Attributes::from_points(5, 5, 0, 0);
        assert!(Player::with_attributes("Hero", attrs, 0).is_err());
        let player = Player::with_attributes("Hero", attrs, EXPERIENCE_PER_LEVEL * 3).unwrap();
        assert_eq!(player.max_health(), 6000);
        assert_eq!(player.current_health(), 6000);
    }

    #[test]
    fn test_with_attributes_huge_total_is_refused() {
        let attrs = Attributes::from_points(u32::MAX, 1, 0, 0);
        assert_eq!(
            Player::with_attributes("Hero", attrs, 0),
            Err(AttributeError::InsufficientPoints {
                requested: u32::MAX,
                available: INITIAL_ATTRIBUTE_POINTS
            })
        );
    }

    #[test]
    fn test_huge_health_saturates_max_health() {
        let attrs = Attributes::from_points(0, 5_000_000, 0, 0);
        let player = Player::with_attributes("Hero", attrs, 3_000_000_000).unwrap();
        assert_eq!(player.max_health(), u32::MAX);
        assert_eq!(player.current_health(), u32::MAX);
        assert_eq!(player.mana(), 500);
    }

    #[test]
    fn test_allocate_at_saturated_budget() {
        let mut player = Player::new("Hero");
        player.award_experience(u64::MAX);
        assert_eq!(player.points_budget(), u32::MAX);

        player.allocate(PrimaryAttribute::Health, u32::MAX - 1).unwrap();
        player.allocate(PrimaryAttribute::Health, 1).unwrap();
        assert_eq!(player.attributes().get(PrimaryAttribute::Health), u32::MAX);
        assert_eq!(player.unspent_points(), 0);
        assert!(player.allocate(PrimaryAttribute::Health, 1).is_err());
    }

    #[test]
    fn test_protection_scales_incoming_damage() {
        let mut player = Player::new("Hero");
        player.arm_protection(0.5, 2);
        assert_eq!(player.inflict_damage(300), 150);
        assert_eq!(player.current_health(), 850);
    }

    #[test]
    fn test_on_turn_start_order_and_aging() {
        let mut player = Player::new("Hero");
        player.spend_mana(500);
        player.inflict_damage(500);
        player.inflict_poison(100, 1);
        player.arm_healing(50, 2);
        player.arm_protection(0.5, 1);

        // Poison is applied while protection is still active.
        let effects = player.on_turn_start();
        assert_eq!(effects.poison_damage, 50);
        assert_eq!(effects.healed, 50);
        assert_eq!(effects.mana_regenerated, 100);
        assert_eq!(player.current_health(), 500);
        assert!(!player.has_poison_effect());
        assert!(!player.has_protection_effect());
        assert!(player.has_healing_effect());

        let effects = player.on_turn_start();
        assert_eq!(effects.poison_damage, 0);
        assert_eq!(effects.healed, 50);
        assert!(!player.has_healing_effect());

        let effects = player.on_turn_start();
        assert_eq!(effects.healed, 0);
    }

    #[test]
    fn test_mana_regen_clamped() {
        let mut player = Player::new("Hero");
        player.prepare_for_battle(10_000);
        assert_eq!(player.mana(), 500);
        let effects = player.on_turn_start();
        assert_eq!(effects.mana_regenerated, 0);
    }

    #[test]
    fn test_poison_tick_can_kill() {
        let mut player = Player::new("Hero");
        player.inflict_damage(950);
        player.inflict_poison(100, 3);
        player.on_turn_start();
        assert!(player.is_dead());
    }

    #[test]
    fn test_prepare_for_battle_resets() {
        let mut player = Player::new("Hero");
        player.inflict_damage(999);
        player.inflict_poison(10, 3);
        player.arm_protection(0.5, 3);
        player.spend_mana(400);

        player.prepare_for_battle(BATTLE_START_MANA);
        assert_eq!(player.current_health(), player.max_health());
        assert_eq!(player.mana(), 500);
        assert!(!player.has_poison_effect());
        assert!(!player.has_protection_effect());
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_bounds(
            health_points in 0u32..4,
            ops in proptest::collection::vec((any::<bool>(), 0u32..5000), 0..64)
        ) {
            let attrs = Attributes::from_points(0, health_points, 0, 0);
            let mut player = Player::with_attributes("Prop", attrs, 0).unwrap();
            for (heal, amount) in ops {
                if heal {
                    player.add_health(amount);
                } else {
                    player.inflict_damage(amount);
                }
                prop_assert!(player.current_health() <= player.max_health());
            }
        }
    }
}
