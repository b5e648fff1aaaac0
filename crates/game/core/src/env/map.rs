use crate::state::Position;

/// Static map oracle exposing the immutable dungeon layout.
///
/// Produced by the external dungeon generator; the core only ever reads it.
pub trait MapOracle: Send + Sync {
    fn dimensions(&self) -> MapDimensions;
    fn tile(&self, position: Position) -> Option<StaticTile>;

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }

    /// Walkability as the generator classified it: floor present, no wall.
    /// Positions outside the layout are non-walkable, never an error.
    fn is_walkable(&self, position: Position) -> bool {
        self.tile(position).is_some_and(|tile| tile.is_walkable())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Immutable descriptor for one cell of the static layout.
///
/// The generator paints two layers: a floor layer and a wall overlay. A cell
/// is walkable iff it has floor and carries no wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticTile {
    has_floor: bool,
    has_wall: bool,
}

impl StaticTile {
    /// Open floor.
    pub const FLOOR: Self = Self {
        has_floor: true,
        has_wall: false,
    };

    /// Floor with a wall piece on top of it.
    pub const WALL: Self = Self {
        has_floor: true,
        has_wall: true,
    };

    /// Nothing painted at all (outside the generated rooms).
    pub const VOID: Self = Self {
        has_floor: false,
        has_wall: false,
    };

    pub const fn new(has_floor: bool, has_wall: bool) -> Self {
        Self {
            has_floor,
            has_wall,
        }
    }

    pub fn has_floor(self) -> bool {
        self.has_floor
    }

    pub fn has_wall(self) -> bool {
        self.has_wall
    }

    pub fn is_walkable(self) -> bool {
        self.has_floor && !self.has_wall
    }
}
