use crate::env::RngOracle;
use crate::state::ResourceMeter;

use super::Attributes;

/// Outcome of an AP spend.
///
/// Spending clamps at zero rather than failing, but callers get told when
/// the pool came up short so UI feedback ("not enough AP") stays possible
/// without weakening the never-negative invariant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApSpend {
    /// The full cost was covered.
    Exact,
    /// The pool ran dry; `shortfall` units were forgiven.
    Clamped { shortfall: u32 },
}

impl ApSpend {
    pub fn was_clamped(self) -> bool {
        matches!(self, ApSpend::Clamped { .. })
    }
}

/// Converts a route cost into whole action points, rounding up.
///
/// Ceiling division so partial-unit movement never grants a free fractional
/// step: a 14-unit diagonal at 10 units per AP costs 2 AP.
pub fn ap_cost_for_path(path_cost: u32, units_per_ap: u32) -> u32 {
    path_cost.div_ceil(units_per_ap.max(1))
}

/// Per-actor resource pools and the per-encounter initiative value.
///
/// Owned exclusively by the actor; mutated only through these operations.
/// AP never goes negative and never exceeds its maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorResources {
    pub hp: ResourceMeter,
    pub ap: ResourceMeter,
    pub hunger: ResourceMeter,
    pub thirst: ResourceMeter,

    /// Rolled once per combat encounter, `None` outside combat.
    pub initiative: Option<u32>,
}

impl ActorResources {
    /// Provision meters start full at this capacity.
    const PROVISION_CAP: u32 = 100;

    /// Fresh pools derived from attributes, everything at maximum.
    pub fn from_attributes(attributes: &Attributes) -> Self {
        Self {
            hp: ResourceMeter::full(attributes.max_hp()),
            ap: ResourceMeter::full(attributes.max_ap()),
            hunger: ResourceMeter::full(Self::PROVISION_CAP),
            thirst: ResourceMeter::full(Self::PROVISION_CAP),
            initiative: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.hp.is_empty()
    }

    /// Spends action points, flooring at zero.
    pub fn spend_ap(&mut self, cost: u32) -> ApSpend {
        let deducted = self.ap.deduct(cost);
        if deducted == cost {
            ApSpend::Exact
        } else {
            ApSpend::Clamped {
                shortfall: cost - deducted,
            }
        }
    }

    /// Checks a cost against the pool without spending.
    pub fn can_afford_ap(&self, cost: u32) -> bool {
        self.ap.current >= cost
    }

    /// Resets AP to maximum. Called exactly once at turn start.
    pub fn restore_ap(&mut self) {
        self.ap.reset_to_max();
    }

    /// Rolls initiative for a new encounter: dexterity + 1d`die_sides`.
    pub fn roll_initiative(
        &mut self,
        attributes: &Attributes,
        rng: &dyn RngOracle,
        seed: u64,
        die_sides: u32,
    ) -> u32 {
        let roll = attributes.dexterity + rng.roll_die(seed, die_sides);
        self.initiative = Some(roll);
        roll
    }

    /// Clears the per-encounter initiative when combat ends.
    pub fn clear_initiative(&mut self) {
        self.initiative = None;
    }

    /// Daily upkeep: provisions drain, clamped at zero.
    pub fn consume_provisions(&mut self, hunger_cost: u32, thirst_cost: u32) {
        self.hunger.deduct(hunger_cost);
        self.thirst.deduct(thirst_cost);
    }

    /// Applies damage, flooring HP at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.hp.deduct(amount);
    }
}

impl Default for ActorResources {
    fn default() -> Self {
        Self::from_attributes(&Attributes::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;

    #[test]
    fn overspend_clamps_at_zero_and_reports_shortfall() {
        let mut resources = ActorResources::from_attributes(&Attributes::new(5, 20, 10));
        assert_eq!(resources.ap.maximum, 5);

        let outcome = resources.spend_ap(7);
        assert_eq!(resources.ap.current, 0);
        assert_eq!(outcome, ApSpend::Clamped { shortfall: 2 });
    }

    #[test]
    fn exact_spend_reports_exact() {
        let mut resources = ActorResources::default();
        let outcome = resources.spend_ap(2);
        assert_eq!(outcome, ApSpend::Exact);
        assert!(!outcome.was_clamped());
    }

    #[test]
    fn restore_sets_ap_to_exactly_max() {
        let mut resources = ActorResources::default();
        resources.spend_ap(resources.ap.maximum);
        resources.restore_ap();
        assert_eq!(resources.ap.current, resources.ap.maximum);
    }

    #[test]
    fn initiative_adds_die_to_dexterity() {
        let attributes = Attributes::new(5, 12, 10);
        let mut resources = ActorResources::from_attributes(&attributes);
        let roll = resources.roll_initiative(&attributes, &PcgRng, 99, 10);
        assert!((13..=22).contains(&roll));
        assert_eq!(resources.initiative, Some(roll));
    }

    #[test]
    fn path_cost_conversion_rounds_up() {
        assert_eq!(ap_cost_for_path(0, 10), 0);
        assert_eq!(ap_cost_for_path(10, 10), 1);
        assert_eq!(ap_cost_for_path(14, 10), 2);
        assert_eq!(ap_cost_for_path(20, 10), 2);
        assert_eq!(ap_cost_for_path(21, 10), 3);
    }

    #[test]
    fn provisions_drain_and_floor_at_zero() {
        let mut resources = ActorResources::default();
        resources.consume_provisions(30, 150);
        assert_eq!(resources.hunger.current, 70);
        assert_eq!(resources.thirst.current, 0);
    }

    #[test]
    fn damage_floors_hp_at_zero() {
        let mut resources = ActorResources::from_attributes(&Attributes::new(5, 10, 2));
        resources.take_damage(50);
        assert_eq!(resources.hp.current, 0);
        assert!(!resources.is_alive());
    }
}
