//! Mutable session state: the actor registry, play mode, and turn queue.
//!
//! The static dungeon layout stays behind [`crate::env::MapOracle`]; only
//! what changes during play lives here.
mod common;
mod turn;

pub use common::{EntityId, Position, ResourceMeter, Tick};
pub use turn::{GameMode, TurnQueue};

use crate::movement::MovementState;
use crate::stats::{ActorResources, Attributes};

/// One actor: the player or an enemy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorState {
    pub id: EntityId,
    pub position: Position,

    /// Cell the actor spawned on; enemies patrol around it.
    pub spawn: Position,

    pub attributes: Attributes,
    pub resources: ActorResources,
    pub movement: MovementState,

    /// Hostiles sight the player and keep combat engaged while alive.
    pub hostile: bool,
}

impl ActorState {
    pub fn new(id: EntityId, position: Position, attributes: Attributes) -> Self {
        Self {
            id,
            position,
            spawn: position,
            attributes,
            resources: ActorResources::from_attributes(&attributes),
            movement: MovementState::Idle,
            hostile: false,
        }
    }

    pub fn hostile(mut self) -> Self {
        self.hostile = true;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.resources.is_alive()
    }
}

/// Errors raised by registry mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("actor {0} already registered")]
    DuplicateActor(EntityId),
}

/// Everything that mutates during a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub actors: Vec<ActorState>,
    pub mode: GameMode,
    pub turn: TurnQueue,
    pub clock: Tick,

    /// Session seed pinning every deterministic roll for replay.
    pub seed: u64,

    /// Encounter counter, mixed into initiative seeds so every encounter
    /// rolls fresh.
    pub encounter: u64,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn add_actor(&mut self, actor: ActorState) -> Result<EntityId, StateError> {
        if self.actor(actor.id).is_some() {
            return Err(StateError::DuplicateActor(actor.id));
        }
        let id = actor.id;
        self.actors.push(actor);
        Ok(id)
    }

    pub fn actor(&self, id: EntityId) -> Option<&ActorState> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut ActorState> {
        self.actors.iter_mut().find(|actor| actor.id == id)
    }

    pub fn player(&self) -> Option<&ActorState> {
        self.actor(EntityId::PLAYER)
    }

    /// Living actors, player included.
    pub fn living(&self) -> impl Iterator<Item = &ActorState> {
        self.actors.iter().filter(|actor| actor.is_alive())
    }

    /// Living hostile actors. Combat holds only while this is non-empty.
    pub fn living_hostiles(&self) -> impl Iterator<Item = &ActorState> {
        self.living().filter(|actor| actor.hostile)
    }

    /// Cells occupied by living actors, optionally excluding one mover.
    ///
    /// This is what the runtime's occupancy oracle snapshots before each
    /// search: the mover's own cell must not block its route.
    pub fn occupied_cells(&self, exclude: Option<EntityId>) -> impl Iterator<Item = Position> {
        self.living()
            .filter(move |actor| Some(actor.id) != exclude)
            .map(|actor| actor.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut state = GameState::new();
        state
            .add_actor(ActorState::new(
                EntityId::PLAYER,
                Position::ORIGIN,
                Attributes::default(),
            ))
            .unwrap();

        let result = state.add_actor(ActorState::new(
            EntityId::PLAYER,
            Position::new(1, 1),
            Attributes::default(),
        ));
        assert_eq!(result, Err(StateError::DuplicateActor(EntityId::PLAYER)));
    }

    #[test]
    fn occupied_cells_skip_the_mover_and_the_dead() {
        let mut state = GameState::new();
        state
            .add_actor(ActorState::new(
                EntityId::PLAYER,
                Position::ORIGIN,
                Attributes::default(),
            ))
            .unwrap();
        let mut enemy = ActorState::new(EntityId(1), Position::new(2, 2), Attributes::default())
            .hostile();
        enemy.resources.take_damage(u32::MAX);
        state.add_actor(enemy).unwrap();
        state
            .add_actor(
                ActorState::new(EntityId(2), Position::new(3, 3), Attributes::default()).hostile(),
            )
            .unwrap();

        let cells: Vec<Position> = state.occupied_cells(Some(EntityId::PLAYER)).collect();
        assert_eq!(cells, vec![Position::new(3, 3)]);
    }
}
