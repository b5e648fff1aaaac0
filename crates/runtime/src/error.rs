use cryptfall_core::{EntityId, TurnError};

/// Errors surfaced by the runtime layer.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("no provider registered for actor {0}")]
    MissingProvider(EntityId),

    #[error(transparent)]
    Turn(#[from] TurnError),
}
