//! Walkability index over the generated dungeon.
//!
//! The dungeon generator paints floor and wall layers; [`NavGrid`] flattens
//! them into the sparse cell set the pathfinder and range calculator search.
//! It is rebuilt once per generation and immutable between rebuilds.

use std::collections::BTreeSet;

use strum::Display;

use crate::env::MapOracle;
use crate::state::Position;

/// The eight grid directions: four cardinal, four diagonal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// The four cardinal directions, the adjacency previews use.
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// All eight directions in expansion order.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, 1),
            Direction::NorthWest => (-1, 1),
            Direction::SouthEast => (1, -1),
            Direction::SouthWest => (-1, -1),
        }
    }

    pub const fn is_diagonal(self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dy != 0
    }

    /// Cell reached by stepping from `from` in this direction.
    pub fn step_from(self, from: Position) -> Position {
        let (dx, dy) = self.delta();
        from.offset(dx, dy)
    }
}

/// Sparse set of walkable cells with integer coordinates.
///
/// A cell absent from the set is non-walkable; out-of-bounds queries simply
/// return false. The set is the only view of the map the search algorithms
/// consume.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavGrid {
    walkable: BTreeSet<Position>,
}

impl NavGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a grid directly from a walkable-cell list, for generators that
    /// already classified their tiles.
    pub fn from_cells(cells: impl IntoIterator<Item = Position>) -> Self {
        Self {
            walkable: cells.into_iter().collect(),
        }
    }

    /// Builds a fresh grid by scanning the map oracle.
    pub fn from_map(map: &dyn MapOracle) -> Self {
        let mut grid = Self::new();
        grid.rebuild(map);
        grid
    }

    /// Rescans the map oracle, replacing all prior state.
    ///
    /// Total and idempotent: prior entries are cleared first, so cells no
    /// longer classified as floor never linger after a regeneration.
    pub fn rebuild(&mut self, map: &dyn MapOracle) {
        self.walkable.clear();
        let dimensions = map.dimensions();
        for x in 0..dimensions.width as i32 {
            for y in 0..dimensions.height as i32 {
                let position = Position::new(x, y);
                if map.is_walkable(position) {
                    self.walkable.insert(position);
                }
            }
        }
    }

    /// True if the cell has floor and no wall. Unknown cells are not.
    pub fn is_walkable(&self, position: Position) -> bool {
        self.walkable.contains(&position)
    }

    /// Number of walkable cells.
    pub fn len(&self) -> usize {
        self.walkable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walkable.is_empty()
    }

    /// Walkable cells in deterministic (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.walkable.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{MapDimensions, StaticTile};

    struct TwoRooms;

    impl MapOracle for TwoRooms {
        fn dimensions(&self) -> MapDimensions {
            MapDimensions::new(4, 1)
        }

        fn tile(&self, position: Position) -> Option<StaticTile> {
            match position.x {
                0 | 3 => Some(StaticTile::FLOOR),
                1 => Some(StaticTile::WALL),
                2 => Some(StaticTile::VOID),
                _ => None,
            }
        }
    }

    #[test]
    fn rebuild_classifies_floor_without_wall() {
        let grid = NavGrid::from_map(&TwoRooms);
        assert!(grid.is_walkable(Position::new(0, 0)));
        assert!(!grid.is_walkable(Position::new(1, 0)));
        assert!(!grid.is_walkable(Position::new(2, 0)));
        assert!(grid.is_walkable(Position::new(3, 0)));
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn rebuild_clears_stale_entries() {
        let mut grid = NavGrid::from_cells([Position::new(9, 9), Position::new(8, 8)]);
        grid.rebuild(&TwoRooms);
        assert!(!grid.is_walkable(Position::new(9, 9)));
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn absent_cell_is_not_walkable() {
        let grid = NavGrid::from_map(&TwoRooms);
        assert!(!grid.is_walkable(Position::new(-1, 0)));
        assert!(!grid.is_walkable(Position::new(0, 5)));
    }
}
