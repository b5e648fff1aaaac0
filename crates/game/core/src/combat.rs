//! Melee attack resolution.
//!
//! Attacks cost AP and, unlike movement, reject outright when the pool
//! cannot cover the cost: a swing either happens in full or not at all.
//! Damage is strength plus the attack's base damage; HP floors at zero.

use crate::state::{EntityId, GameState};

/// AP cost of one melee attack.
pub const ATTACK_AP_COST: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttackError {
    #[error("attacker {0} not found")]
    AttackerNotFound(EntityId),

    #[error("target {0} not found")]
    TargetNotFound(EntityId),

    #[error("attacker {0} is down")]
    AttackerDown(EntityId),

    #[error("target {0} is already down")]
    TargetDown(EntityId),

    #[error("target {target} is not adjacent to attacker {attacker}")]
    OutOfReach {
        attacker: EntityId,
        target: EntityId,
    },

    #[error("attack needs {required} AP but only {available} remain")]
    InsufficientAp { required: u32, available: u32 },
}

/// One resolved melee swing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackOutcome {
    pub damage: u32,
    pub target_hp_remaining: u32,
    pub lethal: bool,
}

/// A melee attack intent from one actor against an adjacent one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackAction {
    pub attacker: EntityId,
    pub target: EntityId,

    /// Flat damage added on top of the attacker's strength.
    pub base_damage: u32,
}

impl AttackAction {
    pub fn new(attacker: EntityId, target: EntityId) -> Self {
        Self {
            attacker,
            target,
            base_damage: 0,
        }
    }

    pub fn with_base_damage(mut self, base_damage: u32) -> Self {
        self.base_damage = base_damage;
        self
    }

    /// Validates and applies the attack. All checks run before any state
    /// changes, so a rejected attack mutates nothing.
    pub fn resolve(&self, state: &mut GameState) -> Result<AttackOutcome, AttackError> {
        let attacker = state
            .actor(self.attacker)
            .ok_or(AttackError::AttackerNotFound(self.attacker))?;
        let target = state
            .actor(self.target)
            .ok_or(AttackError::TargetNotFound(self.target))?;

        if !attacker.is_alive() {
            return Err(AttackError::AttackerDown(self.attacker));
        }
        if !target.is_alive() {
            return Err(AttackError::TargetDown(self.target));
        }
        if !attacker.position.is_adjacent(target.position) {
            return Err(AttackError::OutOfReach {
                attacker: self.attacker,
                target: self.target,
            });
        }

        let available = attacker.resources.ap.current;
        if available < ATTACK_AP_COST {
            return Err(AttackError::InsufficientAp {
                required: ATTACK_AP_COST,
                available,
            });
        }

        let damage = attacker.attributes.melee_damage() + self.base_damage;

        // Checks passed: spend, then land the hit.
        state
            .actor_mut(self.attacker)
            .ok_or(AttackError::AttackerNotFound(self.attacker))?
            .resources
            .spend_ap(ATTACK_AP_COST);

        let target = state
            .actor_mut(self.target)
            .ok_or(AttackError::TargetNotFound(self.target))?;
        target.resources.take_damage(damage);

        Ok(AttackOutcome {
            damage,
            target_hp_remaining: target.resources.hp.current,
            lethal: !target.is_alive(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ActorState, Position};
    use crate::stats::Attributes;

    fn duel() -> GameState {
        let mut state = GameState::new();
        state
            .add_actor(ActorState::new(
                EntityId::PLAYER,
                Position::ORIGIN,
                Attributes::new(6, 10, 10),
            ))
            .unwrap();
        state
            .add_actor(
                ActorState::new(EntityId(1), Position::new(1, 1), Attributes::new(4, 8, 2))
                    .hostile(),
            )
            .unwrap();
        state
    }

    #[test]
    fn attack_spends_ap_and_lands_damage() {
        let mut state = duel();
        let outcome = AttackAction::new(EntityId::PLAYER, EntityId(1))
            .resolve(&mut state)
            .unwrap();

        assert_eq!(outcome.damage, 6);
        assert_eq!(outcome.target_hp_remaining, 4);
        assert!(!outcome.lethal);

        let attacker = state.actor(EntityId::PLAYER).unwrap();
        assert_eq!(
            attacker.resources.ap.current,
            attacker.resources.ap.maximum - ATTACK_AP_COST
        );
    }

    #[test]
    fn second_blow_is_lethal_and_floors_hp() {
        let mut state = duel();
        let attack = AttackAction::new(EntityId::PLAYER, EntityId(1));
        attack.resolve(&mut state).unwrap();
        let outcome = attack.resolve(&mut state).unwrap();

        assert!(outcome.lethal);
        assert_eq!(outcome.target_hp_remaining, 0);
    }

    #[test]
    fn out_of_reach_rejected() {
        let mut state = duel();
        state.actor_mut(EntityId(1)).unwrap().position = Position::new(3, 3);

        let result = AttackAction::new(EntityId::PLAYER, EntityId(1)).resolve(&mut state);
        assert!(matches!(result, Err(AttackError::OutOfReach { .. })));
    }

    #[test]
    fn insufficient_ap_rejects_without_mutating() {
        let mut state = duel();
        state
            .actor_mut(EntityId::PLAYER)
            .unwrap()
            .resources
            .spend_ap(u32::MAX);

        let result = AttackAction::new(EntityId::PLAYER, EntityId(1)).resolve(&mut state);
        assert_eq!(
            result,
            Err(AttackError::InsufficientAp {
                required: ATTACK_AP_COST,
                available: 0
            })
        );

        // Target untouched by the rejected swing.
        let target = state.actor(EntityId(1)).unwrap();
        assert_eq!(target.resources.hp.current, target.resources.hp.maximum);
    }
}
