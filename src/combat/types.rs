use crate::combat::combatant::Combatant;
use crate::combat::rolls::Rolls;
use crate::combat::status::{StatusTimer, TurnStartEffects};
use crate::core::constants::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Opponent configurations. Same shape, different numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Common,
    ZoneBoss,
    FinalBoss,
}

impl Tier {
    pub fn all() -> [Tier; 3] {
        [Tier::Common, Tier::ZoneBoss, Tier::FinalBoss]
    }

    pub fn constants(&self) -> &'static TierConstants {
        match self {
            Tier::Common => &COMMON_TIER,
            Tier::ZoneBoss => &ZONE_BOSS_TIER,
            Tier::FinalBoss => &FINAL_BOSS_TIER,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Common => "common",
            Tier::ZoneBoss => "zone boss",
            Tier::FinalBoss => "final boss",
        };
        f.write_str(label)
    }
}

/// Per-tier numbers used at construction and by the behavior policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierConstants {
    pub health_multiplier: f64,
    pub damage_multiplier: f64,
    pub potions: u32,
    /// Potion heal as a fraction of max health, fixed at construction.
    pub potion_heal_fraction: f64,
    pub small_bonus: u32,
    pub large_bonus: u32,
    /// Percent chance (1..=100 draw at or below) to drink a potion when low.
    pub heal_probability: u32,
    /// Player experience at which poison lasts the long duration.
    pub long_poison_experience: u64,
    pub crit_chance: f64,
    pub dodge_chance: f64,
    pub reward_multiplier: u64,
}

pub const COMMON_TIER: TierConstants = TierConstants {
    health_multiplier: 1.0,
    damage_multiplier: 1.0,
    potions: 1,
    potion_heal_fraction: 0.2,
    small_bonus: 50,
    large_bonus: 150,
    heal_probability: 25,
    long_poison_experience: 10_000,
    crit_chance: 0.05,
    dodge_chance: 0.05,
    reward_multiplier: 1,
};

pub const ZONE_BOSS_TIER: TierConstants = TierConstants {
    health_multiplier: 2.0,
    damage_multiplier: 1.3,
    potions: 2,
    potion_heal_fraction: 0.25,
    small_bonus: 100,
    large_bonus: 250,
    heal_probability: 40,
    long_poison_experience: 6_000,
    crit_chance: 0.08,
    dodge_chance: 0.07,
    reward_multiplier: 3,
};

pub const FINAL_BOSS_TIER: TierConstants = TierConstants {
    health_multiplier: 3.0,
    damage_multiplier: 1.6,
    potions: 3,
    potion_heal_fraction: 0.3,
    small_bonus: 150,
    large_bonus: 400,
    heal_probability: 50,
    long_poison_experience: 3_000,
    crit_chance: 0.10,
    dodge_chance: 0.10,
    reward_multiplier: 10,
};

fn tier_name_parts(tier: Tier) -> (&'static [&'static str], &'static [&'static str]) {
    match tier {
        Tier::Common => (
            &["Grizz", "Sav", "Bone", "Shadow", "Fel", "Dire", "Wild", "Grim"],
            &["Orc", "Troll", "Goblin", "Wolf", "Spider", "Bandit", "Ghoul"],
        ),
        Tier::ZoneBoss => (
            &["Warlord", "Matriarch", "Chieftain", "Warden", "Overseer"],
            &["of the Pass", "of Ash", "of the Deep", "of Thorns", "of Frost"],
        ),
        Tier::FinalBoss => (
            &["Malgrath", "Vexhollow", "Azhkuun"],
            &["the Undying", "the Devourer", "the Last King"],
        ),
    }
}

/// Generates a tier-themed display name.
pub fn generate_opponent_name(tier: Tier, rolls: &mut impl Rolls) -> String {
    let (prefixes, suffixes) = tier_name_parts(tier);
    let prefix = prefixes[rolls.pick(prefixes.len())];
    let suffix = suffixes[rolls.pick(suffixes.len())];
    format!("{} {}", prefix, suffix)
}

/// One encounter's adversary.
///
/// Built once per encounter from the player's experience. `reset` restores
/// the construction-time pools so the same encounter can be retried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opponent {
    pub name: String,
    pub tier: Tier,
    max_health: u32,
    health: u32,
    initial_potions: u32,
    potions: u32,
    potion_heal: u32,
    base_damage: u32,
    poison_turns: u32,
    crit_chance: f64,
    dodge_chance: f64,
    experience_reward: u64,
    poison: StatusTimer<u32>,
}

impl Opponent {
    /// Scales a fresh opponent of `tier` to the player's experience, with
    /// randomized variance on health and damage.
    pub fn generate(tier: Tier, player_experience: u64, rolls: &mut impl Rolls) -> Self {
        let constants = tier.constants();
        let level = player_experience / EXPERIENCE_PER_LEVEL;
        let (var_min, var_max) = OPPONENT_STAT_VARIANCE;

        let name = generate_opponent_name(tier, rolls);

        let raw_health = OPPONENT_BASE_HEALTH + level as f64 * OPPONENT_HEALTH_PER_LEVEL;
        let health_var = rolls.scale(var_min, var_max);
        let max_health = (raw_health * constants.health_multiplier * health_var)
            .round()
            .max(1.0) as u32;

        let raw_damage = OPPONENT_BASE_DAMAGE + level as f64 * OPPONENT_DAMAGE_PER_LEVEL;
        let damage_var = rolls.scale(var_min, var_max);
        let base_damage = (raw_damage * constants.damage_multiplier * damage_var)
            .round()
            .max(1.0) as u32;

        let potion_heal = (max_health as f64 * constants.potion_heal_fraction).round() as u32;

        let poison_turns = if player_experience >= constants.long_poison_experience {
            OPPONENT_POISON_LONG_TURNS
        } else {
            OPPONENT_POISON_SHORT_TURNS
        };

        let experience_reward = (OPPONENT_BASE_REWARD + level * OPPONENT_REWARD_PER_LEVEL)
            .saturating_mul(constants.reward_multiplier);

        debug!(
            %tier,
            %name,
            max_health,
            base_damage,
            potions = constants.potions,
            potion_heal,
            poison_turns,
            "generated opponent"
        );

        Self {
            name,
            tier,
            max_health,
            health: max_health,
            initial_potions: constants.potions,
            potions: constants.potions,
            potion_heal,
            base_damage,
            poison_turns,
            crit_chance: constants.crit_chance,
            dodge_chance: constants.dodge_chance,
            experience_reward,
            poison: StatusTimer::default(),
        }
    }

    /// Builds an opponent from explicit numbers; crit, dodge and reward come
    /// from the tier and poison uses the short duration.
    pub fn from_parts(
        name: impl Into<String>,
        tier: Tier,
        max_health: u32,
        base_damage: u32,
        potions: u32,
        potion_heal: u32,
    ) -> Self {
        let constants = tier.constants();
        let max_health = max_health.max(1);
        Self {
            name: name.into(),
            tier,
            max_health,
            health: max_health,
            initial_potions: potions,
            potions,
            potion_heal,
            base_damage,
            poison_turns: OPPONENT_POISON_SHORT_TURNS,
            crit_chance: constants.crit_chance,
            dodge_chance: constants.dodge_chance,
            experience_reward: OPPONENT_BASE_REWARD * constants.reward_multiplier,
            poison: StatusTimer::default(),
        }
    }

    pub fn with_chances(mut self, crit_chance: f64, dodge_chance: f64) -> Self {
        self.crit_chance = crit_chance;
        self.dodge_chance = dodge_chance;
        self
    }

    /// Restores health, potions and poison to their construction-time values.
    pub fn reset(&mut self) {
        self.health = self.max_health;
        self.potions = self.initial_potions;
        self.poison.clear();
    }

    pub fn potions(&self) -> u32 {
        self.potions
    }

    pub fn potion_heal(&self) -> u32 {
        self.potion_heal
    }

    /// Uses up one potion. False when none remain.
    pub fn consume_potion(&mut self) -> bool {
        if self.potions == 0 {
            return false;
        }
        self.potions -= 1;
        true
    }

    pub fn base_damage(&self) -> u32 {
        self.base_damage
    }

    pub fn poison_turns(&self) -> u32 {
        self.poison_turns
    }

    pub fn experience_reward(&self) -> u64 {
        self.experience_reward
    }

    pub fn poison(&self) -> StatusTimer<u32> {
        self.poison
    }

    /// Below half health.
    pub fn is_wounded(&self) -> bool {
        self.health < self.max_health / 2
    }

    #[cfg(test)]
    pub(crate) fn set_health(&mut self, health: u32) {
        self.health = health.min(self.max_health);
    }
}

impl Combatant for Opponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn current_health(&self) -> u32 {
        self.health
    }

    fn max_health(&self) -> u32 {
        self.max_health
    }

    fn add_health(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health - before
    }

    fn inflict_damage(&mut self, amount: u32) -> u32 {
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
        self.crit_chance
    }

    fn dodge_chance(&self) -> f64 {
        self.dodge_chance
    }

    fn on_turn_start(&mut self) -> TurnStartEffects {
        let mut effects = TurnStartEffects::default();
        if let Some(damage) = self.poison.tick() {
            effects.poison_damage = self.inflict_damage(damage);
        }
        effects
    }
}

/// One narrative line for the host to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    pub message: String,
    pub is_crit: bool,
    pub is_player_action: bool,
}
