use cryptfall_core::{ATTACK_AP_COST, EntityId, GameEnv, GameState, NavGrid};

use super::{Intent, IntentProvider};

/// Enemy combat policy: strike the player when adjacent, otherwise close
/// distance, and pass once the AP pool cannot pay for anything else.
///
/// Sighting and patrol live in the session's exploration tick; this
/// provider only runs once combat is engaged.
#[derive(Clone, Copy, Debug, Default)]
pub struct HunterProvider;

impl IntentProvider for HunterProvider {
    fn decide(
        &mut self,
        actor: EntityId,
        state: &GameState,
        _grid: &NavGrid,
        _env: &GameEnv<'_>,
    ) -> Intent {
        let Some(me) = state.actor(actor) else {
            return Intent::EndTurn;
        };
        let Some(player) = state.player().filter(|player| player.is_alive()) else {
            return Intent::EndTurn;
        };

        let ap = me.resources.ap.current;

        if me.position.is_adjacent(player.position) {
            if ap >= ATTACK_AP_COST {
                return Intent::Attack(player.id);
            }
            return Intent::EndTurn;
        }

        // Any remaining AP buys at least a one-cell advance; the session
        // truncates the route to what the pool can pay for.
        if ap > 0 {
            return Intent::Approach(player.id);
        }

        Intent::EndTurn
    }
}
