/// Errors produced when a required oracle is missing from the environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("map oracle not available")]
    MapNotAvailable,

    #[error("occupancy oracle not available")]
    OccupancyNotAvailable,

    #[error("sight oracle not available")]
    SightNotAvailable,

    #[error("config oracle not available")]
    ConfigNotAvailable,

    #[error("rng oracle not available")]
    RngNotAvailable,
}
