//! Deterministic dungeon-crawler logic shared across clients.
//!
//! `cryptfall-core` defines the canonical rules: the navigation grid, A*
//! route planning with occupancy and corner-cutting, movement-range
//! previews, the action-point/initiative resource model, and turn
//! sequencing. All state mutation flows through [`engine::TurnEngine`], and
//! all world data arrives through the oracle traits in [`env`] — the crate
//! itself performs no I/O and holds no globals.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod geom;
pub mod grid;
pub mod movement;
pub mod path;
pub mod state;
pub mod stats;

pub use combat::{ATTACK_AP_COST, AttackAction, AttackError, AttackOutcome};
pub use config::GameConfig;
pub use engine::{TurnEngine, TurnError};
pub use env::{
    ConfigOracle, Env, GameEnv, MapDimensions, MapOracle, NoOccupancy, OccupancyOracle,
    OracleError, PcgRng, RngOracle, SightOracle, StaticTile, compute_seed,
};
pub use geom::CellGeometry;
pub use grid::{Direction, NavGrid};
pub use movement::{MovementState, StepOutcome};
pub use path::{
    CostModel, PathPlan, PathQuery, ReachableSet, compute_reachable, find_path,
};
pub use state::{
    ActorState, EntityId, GameMode, GameState, Position, ResourceMeter, StateError, Tick,
    TurnQueue,
};
pub use stats::{ActorResources, ApSpend, Attributes, ap_cost_for_path};
