use crate::state::Position;

/// Line-of-sight oracle.
///
/// Stand-in for the engine's physics linecast: the core only consumes the
/// boolean answer. Used by enemy sighting and by the direct-move preview
/// that bypasses the pathfinder for a straight shot.
pub trait SightOracle: Send + Sync {
    /// True if nothing obstructs the straight line between the two cells.
    fn clear_line(&self, from: Position, to: Position) -> bool;
}
