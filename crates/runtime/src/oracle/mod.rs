//! Concrete oracle implementations backing the core's environment traits.
mod map;
mod occupancy;
mod scenario;
mod sight;

pub use map::StaticMapOracle;
pub use occupancy::OccupancySnapshot;
pub use scenario::{EntityKind, EntityPlacement, Scenario};
pub use sight::GridSight;
