//! Intent sources for turn-takers.
//!
//! The session asks the current combatant's [`IntentProvider`] what to do;
//! human input, scripted fixtures, and AI policies all implement the same
//! capability trait. The provider only decides — committing routes,
//! spending AP, and resolving attacks stay in the session and engine.
mod hunter;
mod scripted;

pub use hunter::HunterProvider;
pub use scripted::ScriptedProvider;

use cryptfall_core::{EntityId, GameEnv, GameState, NavGrid, Position};

/// One decided step of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Walk to a free cell, as far as the AP budget allows.
    MoveTo(Position),

    /// Close distance toward an actor, stopping on an adjacent cell.
    Approach(EntityId),

    /// Strike an adjacent actor.
    Attack(EntityId),

    /// Pass: nothing more to do this turn.
    EndTurn,
}

/// Capability trait for anything that can take a turn.
pub trait IntentProvider: Send {
    /// Decides the actor's next step. Called once per update tick while the
    /// actor is idle on its own turn; a turn typically spans several
    /// decisions (move, then attack, then pass).
    fn decide(
        &mut self,
        actor: EntityId,
        state: &GameState,
        grid: &NavGrid,
        env: &GameEnv<'_>,
    ) -> Intent;
}

/// Fallback provider that always sits its turn out. Useful as a stand-in
/// while an actor has no real controller wired up, and in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct WaitProvider;

impl IntentProvider for WaitProvider {
    fn decide(
        &mut self,
        _actor: EntityId,
        _state: &GameState,
        _grid: &NavGrid,
        _env: &GameEnv<'_>,
    ) -> Intent {
        Intent::EndTurn
    }
}
