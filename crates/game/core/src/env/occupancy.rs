use crate::state::Position;

/// Dynamic occupancy oracle backed by the actor registry.
///
/// Asked, never cached: actors move between searches, so every search call
/// queries a freshly built oracle. Within one search the answers are treated
/// as a frozen snapshot, which holds because all core operations run to
/// completion inside a single update tick.
pub trait OccupancyOracle: Send + Sync {
    /// True if any actor currently stands on the cell.
    fn is_occupied(&self, position: Position) -> bool;
}

/// An oracle reporting every cell as free. Useful for previews and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOccupancy;

impl OccupancyOracle for NoOccupancy {
    fn is_occupied(&self, _position: Position) -> bool {
        false
    }
}
