//! Runtime orchestration for the deterministic dungeon-crawler core.
//!
//! This crate wires concrete oracles, intent providers, and the tick-driven
//! session loop around `cryptfall-core`. Consumers embed [`Session`] to
//! drive play: it owns the state, rebuilds the navigation grid after
//! generation, snapshots occupancy before every search, and sequences turns.
//!
//! Modules are organized by responsibility:
//! - [`oracle`] — static maps (ASCII layouts, RON scenarios), occupancy
//!   snapshots, grid-based line of sight
//! - [`providers`] — player and enemy intent sources behind one capability
//!   trait
//! - [`session`] — the frame loop and movement-preview throttling
pub mod oracle;
pub mod providers;
pub mod session;

mod error;

pub use error::RuntimeError;
pub use oracle::{
    EntityKind, EntityPlacement, GridSight, OccupancySnapshot, Scenario, StaticMapOracle,
};
pub use providers::{HunterProvider, Intent, IntentProvider, ScriptedProvider, WaitProvider};
pub use session::{MovePreview, Session, SessionEvent};
