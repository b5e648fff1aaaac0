use std::collections::VecDeque;

use cryptfall_core::{EntityId, GameEnv, GameState, NavGrid};

use super::{Intent, IntentProvider};

/// Replays a fixed queue of intents, then passes forever.
///
/// Stands in for player input in tests and headless sessions: real input
/// handling is an external collaborator that ultimately produces the same
/// intents.
#[derive(Clone, Debug, Default)]
pub struct ScriptedProvider {
    queue: VecDeque<Intent>,
}

impl ScriptedProvider {
    pub fn new(intents: impl IntoIterator<Item = Intent>) -> Self {
        Self {
            queue: intents.into_iter().collect(),
        }
    }

    /// Appends another intent to the script.
    pub fn push(&mut self, intent: Intent) {
        self.queue.push_back(intent);
    }

    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }
}

impl IntentProvider for ScriptedProvider {
    fn decide(
        &mut self,
        _actor: EntityId,
        _state: &GameState,
        _grid: &NavGrid,
        _env: &GameEnv<'_>,
    ) -> Intent {
        self.queue.pop_front().unwrap_or(Intent::EndTurn)
    }
}
