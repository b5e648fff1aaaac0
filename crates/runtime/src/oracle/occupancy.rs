//! Occupancy over the live actor registry.

use std::collections::BTreeSet;

use cryptfall_core::{EntityId, GameState, OccupancyOracle, Position};

/// Frozen occupancy view built immediately before a search.
///
/// The session snapshots living actors' cells fresh for every search call —
/// never cached across calls, because occupancy changes between them — and
/// one search then sees a consistent frozen picture. The moving actor is
/// excluded so its own cell never blocks its route.
#[derive(Clone, Debug, Default)]
pub struct OccupancySnapshot {
    cells: BTreeSet<Position>,
}

impl OccupancySnapshot {
    pub fn of_living(state: &GameState, exclude: Option<EntityId>) -> Self {
        Self {
            cells: state.occupied_cells(exclude).collect(),
        }
    }
}

impl OccupancyOracle for OccupancySnapshot {
    fn is_occupied(&self, position: Position) -> bool {
        self.cells.contains(&position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptfall_core::{ActorState, Attributes};

    #[test]
    fn snapshot_excludes_the_mover() {
        let mut state = GameState::new();
        state
            .add_actor(ActorState::new(
                EntityId::PLAYER,
                Position::ORIGIN,
                Attributes::default(),
            ))
            .unwrap();
        state
            .add_actor(
                ActorState::new(EntityId(1), Position::new(2, 0), Attributes::default())
                    .hostile(),
            )
            .unwrap();

        let snapshot = OccupancySnapshot::of_living(&state, Some(EntityId::PLAYER));
        assert!(!snapshot.is_occupied(Position::ORIGIN));
        assert!(snapshot.is_occupied(Position::new(2, 0)));
    }
}
