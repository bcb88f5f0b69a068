//! Capabilities shared by the player and every opponent.

use super::status::TurnStartEffects;

pub trait Combatant {
    fn name(&self) -> &str;

    fn current_health(&self) -> u32;

    fn max_health(&self) -> u32;

    /// Heals, clamped to `max_health`. Returns the health actually gained.
    fn add_health(&mut self, amount: u32) -> u32;

    /// Takes damage, clamped at zero. Returns the health actually lost.
    fn inflict_damage(&mut self, amount: u32) -> u32;

    /// Unconditionally replaces any running poison.
    fn inflict_poison(&mut self, damage_per_turn: u32, turns: u32);

    fn has_poison_effect(&self) -> bool;

    fn crit_chance(&self) -> f64;

    fn dodge_chance(&self) -> f64;

    /// Applies and ages one turn of every active timed effect.
    fn on_turn_start(&mut self) -> TurnStartEffects;

    fn is_dead(&self) -> bool {
        self.current_health() == 0
    }
}
