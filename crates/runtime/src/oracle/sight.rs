//! Grid-based line of sight.
//!
//! The shipped game asks the engine's physics layer for linecasts; this
//! in-process stand-in walks the segment between two cell centers and calls
//! the line clear when every touched cell is walkable.

use cryptfall_core::{NavGrid, Position, SightOracle};

/// [`SightOracle`] over the navigation grid.
#[derive(Clone, Copy, Debug)]
pub struct GridSight<'a> {
    grid: &'a NavGrid,
}

impl<'a> GridSight<'a> {
    pub fn new(grid: &'a NavGrid) -> Self {
        Self { grid }
    }

    /// Cells touched by the segment, via an integer Bresenham walk.
    fn line_cells(from: Position, to: Position) -> impl Iterator<Item = Position> {
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };

        let mut current = from;
        let mut err = dx + dy;
        let mut done = false;

        std::iter::from_fn(move || {
            if done {
                return None;
            }
            let cell = current;
            if current == to {
                done = true;
            } else {
                let doubled = 2 * err;
                if doubled >= dy {
                    err += dy;
                    current.x += sx;
                }
                if doubled <= dx {
                    err += dx;
                    current.y += sy;
                }
            }
            Some(cell)
        })
    }
}

impl SightOracle for GridSight<'_> {
    fn clear_line(&self, from: Position, to: Position) -> bool {
        Self::line_cells(from, to).all(|cell| self.grid.is_walkable(cell))
    }
}
