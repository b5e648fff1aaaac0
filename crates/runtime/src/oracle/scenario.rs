//! Scenario fixtures: a layout plus entity placements.
//!
//! Scenarios keep terrain and population separate from code so the same
//! dungeon can run with different spawns (sandbox, tests, difficulty
//! tiers). They load from RON, the format the rest of the tooling speaks.

use std::path::Path;

use serde::{Deserialize, Serialize};

use cryptfall_core::{ActorState, Attributes, EntityId, GameState, MapOracle, Position};

use crate::error::RuntimeError;

use super::StaticMapOracle;

/// Where and what to spawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPlacement {
    pub position: Position,
    pub kind: EntityKind,
}

/// What kind of actor a placement produces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// The controllable player character.
    Player { attributes: Attributes },

    /// A hostile actor.
    Enemy { attributes: Attributes },
}

/// Scenario configuration: the ASCII layout and its population.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,

    /// ASCII layout (`.` floor, `#` wall, space void), top row first.
    pub layout: String,

    pub placements: Vec<EntityPlacement>,
}

impl Scenario {
    /// Parses a scenario from RON text.
    pub fn from_ron(text: &str) -> Result<Self, RuntimeError> {
        ron::from_str(text)
            .map_err(|err| RuntimeError::InvalidScenario(format!("bad scenario RON: {err}")))
    }

    /// Loads a scenario from a RON file.
    pub fn load(path: &Path) -> Result<Self, RuntimeError> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            RuntimeError::InvalidScenario(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_ron(&text)
    }

    /// Materializes the map and initial state. Entity ids are allocated in
    /// placement order; the player, if present, always gets
    /// [`EntityId::PLAYER`].
    pub fn build(&self, seed: u64) -> Result<(StaticMapOracle, GameState), RuntimeError> {
        let map = StaticMapOracle::from_ascii(&self.layout)?;
        let mut state = GameState::with_seed(seed);

        tracing::info!(
            scenario = %self.name,
            placements = self.placements.len(),
            "building scenario"
        );

        let mut next_enemy_id = 1u32;
        for placement in &self.placements {
            if !map.is_walkable(placement.position) {
                return Err(RuntimeError::InvalidScenario(format!(
                    "placement at {} is not on walkable floor",
                    placement.position
                )));
            }

            let actor = match &placement.kind {
                EntityKind::Player { attributes } => {
                    ActorState::new(EntityId::PLAYER, placement.position, *attributes)
                }
                EntityKind::Enemy { attributes } => {
                    let id = EntityId(next_enemy_id);
                    next_enemy_id += 1;
                    ActorState::new(id, placement.position, *attributes).hostile()
                }
            };

            state.add_actor(actor).map_err(|err| {
                RuntimeError::InvalidScenario(format!("placement rejected: {err}"))
            })?;
        }

        Ok((map, state))
    }
}
