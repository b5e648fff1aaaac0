//! Static dungeon layout served through [`cryptfall_core::MapOracle`].

use std::collections::BTreeMap;

use cryptfall_core::{MapDimensions, MapOracle, Position, StaticTile};

use crate::error::RuntimeError;

/// MapOracle implementation holding an immutable generated layout.
///
/// Dynamic play state (actors, movement) lives in `GameState`; this only
/// ever answers what the generator painted.
#[derive(Clone, Debug)]
pub struct StaticMapOracle {
    dimensions: MapDimensions,
    tiles: BTreeMap<Position, StaticTile>,
}

impl StaticMapOracle {
    pub fn new(dimensions: MapDimensions, tiles: BTreeMap<Position, StaticTile>) -> Self {
        Self { dimensions, tiles }
    }

    /// An open floor rectangle. Handy for tests and sandbox sessions.
    pub fn open(width: u32, height: u32) -> Self {
        let mut tiles = BTreeMap::new();
        for x in 0..width as i32 {
            for y in 0..height as i32 {
                tiles.insert(Position::new(x, y), StaticTile::FLOOR);
            }
        }
        Self::new(MapDimensions::new(width, height), tiles)
    }

    /// Parses an ASCII layout: `.` floor, `#` wall, space void.
    ///
    /// The first text line is the top (highest y) row, so layouts read the
    /// way they render. Ragged lines are allowed; missing cells are void.
    pub fn from_ascii(layout: &str) -> Result<Self, RuntimeError> {
        let rows: Vec<&str> = layout
            .lines()
            .skip_while(|line| line.trim().is_empty())
            .collect();
        let height = rows.len() as u32;
        if height == 0 {
            return Err(RuntimeError::InvalidScenario(
                "layout has no rows".to_string(),
            ));
        }

        let mut width = 0u32;
        let mut tiles = BTreeMap::new();
        for (row_index, row) in rows.iter().enumerate() {
            let y = height as i32 - 1 - row_index as i32;
            for (x, glyph) in row.chars().enumerate() {
                let tile = match glyph {
                    '.' => StaticTile::FLOOR,
                    '#' => StaticTile::WALL,
                    ' ' => StaticTile::VOID,
                    other => {
                        return Err(RuntimeError::InvalidScenario(format!(
                            "unknown layout glyph {other:?} at column {x}, row {row_index}"
                        )));
                    }
                };
                tiles.insert(Position::new(x as i32, y), tile);
                width = width.max(x as u32 + 1);
            }
        }

        Ok(Self::new(MapDimensions::new(width, height), tiles))
    }
}

impl MapOracle for StaticMapOracle {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn tile(&self, position: Position) -> Option<StaticTile> {
        self.tiles.get(&position).copied()
    }
}
