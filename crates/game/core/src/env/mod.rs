//! Traits describing the world the core runs against.
//!
//! Oracles expose the static dungeon layout, live actor occupancy, physics
//! line-of-sight, configuration, and deterministic randomness. The [`Env`]
//! aggregate bundles them so the engine can reach everything it needs without
//! hard coupling to concrete implementations — and without ambient globals.
mod config;
mod error;
mod map;
mod occupancy;
mod rng;
mod sight;

pub use config::ConfigOracle;
pub use error::OracleError;
pub use map::{MapDimensions, MapOracle, StaticTile};
pub use occupancy::{NoOccupancy, OccupancyOracle};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use sight::SightOracle;

/// Aggregates the read-only oracles required by the engine and pathfinding.
#[derive(Clone, Copy, Debug)]
pub struct Env<'a, M, O, S, C, R>
where
    M: MapOracle + ?Sized,
    O: OccupancyOracle + ?Sized,
    S: SightOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    map: Option<&'a M>,
    occupancy: Option<&'a O>,
    sight: Option<&'a S>,
    config: Option<&'a C>,
    rng: Option<&'a R>,
}

pub type GameEnv<'a> = Env<
    'a,
    dyn MapOracle + 'a,
    dyn OccupancyOracle + 'a,
    dyn SightOracle + 'a,
    dyn ConfigOracle + 'a,
    dyn RngOracle + 'a,
>;

impl<'a, M, O, S, C, R> Env<'a, M, O, S, C, R>
where
    M: MapOracle + ?Sized,
    O: OccupancyOracle + ?Sized,
    S: SightOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(
        map: Option<&'a M>,
        occupancy: Option<&'a O>,
        sight: Option<&'a S>,
        config: Option<&'a C>,
        rng: Option<&'a R>,
    ) -> Self {
        Self {
            map,
            occupancy,
            sight,
            config,
            rng,
        }
    }

    pub fn with_all(
        map: &'a M,
        occupancy: &'a O,
        sight: &'a S,
        config: &'a C,
        rng: &'a R,
    ) -> Self {
        Self::new(
            Some(map),
            Some(occupancy),
            Some(sight),
            Some(config),
            Some(rng),
        )
    }

    pub fn empty() -> Self {
        Self {
            map: None,
            occupancy: None,
            sight: None,
            config: None,
            rng: None,
        }
    }

    /// Returns the MapOracle, or an error if not available.
    pub fn map(&self) -> Result<&'a M, OracleError> {
        self.map.ok_or(OracleError::MapNotAvailable)
    }

    /// Returns the OccupancyOracle, or an error if not available.
    pub fn occupancy(&self) -> Result<&'a O, OracleError> {
        self.occupancy.ok_or(OracleError::OccupancyNotAvailable)
    }

    /// Returns the SightOracle, or an error if not available.
    pub fn sight(&self) -> Result<&'a S, OracleError> {
        self.sight.ok_or(OracleError::SightNotAvailable)
    }

    /// Returns the ConfigOracle, or an error if not available.
    pub fn config(&self) -> Result<&'a C, OracleError> {
        self.config.ok_or(OracleError::ConfigNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

impl<'a, M, O, S, C, R> Env<'a, M, O, S, C, R>
where
    M: MapOracle + 'a,
    O: OccupancyOracle + 'a,
    S: SightOracle + 'a,
    C: ConfigOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based `GameEnv`.
    ///
    /// Cheap to call repeatedly: five pointer copies.
    pub fn as_game_env(&self) -> GameEnv<'a> {
        let map: Option<&'a dyn MapOracle> = self.map.map(|map| map as _);
        let occupancy: Option<&'a dyn OccupancyOracle> = self.occupancy.map(|occ| occ as _);
        let sight: Option<&'a dyn SightOracle> = self.sight.map(|sight| sight as _);
        let config: Option<&'a dyn ConfigOracle> = self.config.map(|config| config as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        Env::new(map, occupancy, sight, config, rng)
    }
}
