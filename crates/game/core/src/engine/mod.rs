//! Turn sequencing and the operations it gates.
//!
//! [`TurnEngine`] is the authoritative mutator for [`GameState`]: mode
//! transitions, initiative, AP grants and spends, and stepped movement all
//! flow through it. It sequences actors but never decides their actions —
//! intent comes from the player's input handling or an AI policy, both
//! external to the core.

use crate::combat::{AttackAction, AttackError, AttackOutcome};
use crate::env::{GameEnv, OracleError, compute_seed};
use crate::grid::NavGrid;
use crate::movement::{MovementState, StepOutcome};
use crate::path::{PathPlan, PathQuery, ReachableSet, compute_reachable, find_path};
use crate::state::{EntityId, GameMode, GameState, Position};
use crate::stats::{ApSpend, ap_cost_for_path};

/// Errors surfaced by turn operations. "No path" and "not enough AP" are
/// deliberately absent: both are ordinary return values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("no combat is in progress")]
    NotInCombat,

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Turn orchestrator borrowing the session state.
pub struct TurnEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> TurnEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    /// The combatant whose turn it is. `None` outside combat.
    pub fn current_actor(&self) -> Option<EntityId> {
        match self.state.mode {
            GameMode::Exploration => None,
            GameMode::Combat => self.state.turn.current(),
        }
    }

    /// Engages combat: collects living combatants, rolls initiative for
    /// each, orders the queue descending (ties keep collection order), and
    /// begins the first turn.
    ///
    /// Idempotent: sighting events often fire more than once before state
    /// settles, so a call while already in combat is absorbed as a no-op —
    /// no re-roll, no queue reset. A call with no living hostiles is also a
    /// no-op: there is nobody to fight.
    pub fn enter_combat(&mut self, env: &GameEnv<'_>) -> Result<(), TurnError> {
        if self.state.mode == GameMode::Combat {
            return Ok(());
        }
        if self.state.living_hostiles().next().is_none() {
            return Ok(());
        }

        let rng = env.rng()?;
        let config = env.config()?.config();

        self.state.encounter += 1;
        let seed = self.state.seed;
        let encounter = self.state.encounter;

        let combatant_ids: Vec<EntityId> =
            self.state.living().map(|actor| actor.id).collect();

        let mut rolls = Vec::with_capacity(combatant_ids.len());
        for id in combatant_ids {
            let Some(actor) = self.state.actor_mut(id) else {
                continue;
            };
            let roll_seed = compute_seed(seed, encounter, id.0, 0);
            let initiative = actor.resources.roll_initiative(
                &actor.attributes,
                rng,
                roll_seed,
                config.initiative_die,
            );
            rolls.push((id, initiative));
        }

        self.state.turn.rebuild(rolls);
        self.state.mode = GameMode::Combat;
        self.begin_current_turn();
        Ok(())
    }

    /// Ends the active combatant's turn and hands the next one theirs.
    ///
    /// Dead combatants are dropped from the queue first. When no living
    /// hostiles remain (or the queue empties), combat disengages back to
    /// exploration and `None` is returned.
    pub fn end_turn(&mut self) -> Result<Option<EntityId>, TurnError> {
        if self.state.mode != GameMode::Combat {
            return Err(TurnError::NotInCombat);
        }

        self.drop_dead_combatants();

        if self.state.turn.is_empty() || self.state.living_hostiles().next().is_none() {
            self.leave_combat();
            return Ok(None);
        }

        let next = self.state.turn.advance();
        self.begin_current_turn();
        Ok(next)
    }

    /// Starts the current combatant's turn by granting a full AP pool.
    /// Deciding what to do with it belongs to the actor's intent provider.
    fn begin_current_turn(&mut self) {
        if let Some(id) = self.state.turn.current()
            && let Some(actor) = self.state.actor_mut(id)
        {
            actor.resources.restore_ap();
        }
    }

    fn drop_dead_combatants(&mut self) {
        let dead: Vec<EntityId> = self
            .state
            .turn
            .iter()
            .filter(|&id| {
                self.state
                    .actor(id)
                    .is_none_or(|actor| !actor.is_alive())
            })
            .collect();
        for id in dead {
            self.state.turn.remove(id);
        }
    }

    fn leave_combat(&mut self) {
        self.state.turn.clear();
        self.state.mode = GameMode::Exploration;
        for actor in &mut self.state.actors {
            actor.resources.clear_initiative();
        }
    }

    /// Movement-range preview for an actor at its current AP budget.
    ///
    /// The budget converts whole AP into preview steps using the straight
    /// step cost, so the preview never promises a cell the pool cannot pay
    /// for. No occupancy filtering here; routes check it when planned.
    pub fn reachable_for(
        &self,
        grid: &NavGrid,
        env: &GameEnv<'_>,
        actor: EntityId,
    ) -> Result<ReachableSet, TurnError> {
        let config = env.config()?.config();
        let actor = self
            .state
            .actor(actor)
            .ok_or(TurnError::ActorNotFound(actor))?;

        let straight = config.cost_model.straight_cost().max(1);
        let budget = actor.resources.ap.current * config.units_per_ap / straight;

        Ok(compute_reachable(grid, actor.position, budget))
    }

    /// Plans a route for an actor. `None` when no route exists — an
    /// ordinary answer, not an error.
    pub fn plan_path(
        &self,
        grid: &NavGrid,
        env: &GameEnv<'_>,
        actor: EntityId,
        goal: Position,
        ignore_occupancy_at_goal: bool,
    ) -> Result<Option<PathPlan>, TurnError> {
        let config = env.config()?.config();
        let occupancy = env.occupancy()?;
        let actor = self
            .state
            .actor(actor)
            .ok_or(TurnError::ActorNotFound(actor))?;

        let mut query = PathQuery::new(actor.position, goal);
        if ignore_occupancy_at_goal {
            query = query.ignoring_goal_occupancy();
        }

        Ok(find_path(grid, occupancy, config.cost_model, query))
    }

    /// Commits a planned route: deducts AP (ceiling conversion, clamped at
    /// zero with the shortfall reported) and starts stepped movement.
    pub fn commit_path(
        &mut self,
        env: &GameEnv<'_>,
        actor: EntityId,
        plan: &PathPlan,
    ) -> Result<ApSpend, TurnError> {
        let config = env.config()?.config();
        let cost = ap_cost_for_path(plan.cost(), config.units_per_ap);

        let actor = self
            .state
            .actor_mut(actor)
            .ok_or(TurnError::ActorNotFound(actor))?;
        let outcome = actor.resources.spend_ap(cost);
        actor.movement = MovementState::follow(plan);
        Ok(outcome)
    }

    /// Advances an actor's movement by one waypoint and updates its cell.
    /// Call once per update tick while the actor is following a route.
    pub fn advance_movement(&mut self, actor: EntityId) -> Result<StepOutcome, TurnError> {
        let actor = self
            .state
            .actor_mut(actor)
            .ok_or(TurnError::ActorNotFound(actor))?;
        let outcome = actor.movement.advance();
        if let StepOutcome::Stepped { to, .. } = outcome {
            actor.position = to;
        }
        Ok(outcome)
    }

    /// Cancels an actor's movement at the current waypoint boundary.
    pub fn cancel_movement(&mut self, actor: EntityId) -> Result<(), TurnError> {
        let actor = self
            .state
            .actor_mut(actor)
            .ok_or(TurnError::ActorNotFound(actor))?;
        actor.movement.cancel();
        Ok(())
    }

    /// Resolves an attack; a lethal hit drops the victim from the turn
    /// queue on the spot.
    pub fn attack(&mut self, action: AttackAction) -> Result<AttackOutcome, AttackError> {
        let outcome = action.resolve(self.state)?;
        if outcome.lethal {
            self.state.turn.remove(action.target);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::{Env, NoOccupancy, PcgRng, SightOracle};
    use crate::state::{ActorState, Position};
    use crate::stats::Attributes;

    struct OpenSight;

    impl SightOracle for OpenSight {
        fn clear_line(&self, _from: Position, _to: Position) -> bool {
            true
        }
    }

    fn test_env(config: &GameConfig) -> GameEnv<'_> {
        static RNG: PcgRng = PcgRng;
        static SIGHT: OpenSight = OpenSight;
        static OCCUPANCY: NoOccupancy = NoOccupancy;
        Env::new(
            None,
            Some(&OCCUPANCY as &dyn crate::env::OccupancyOracle),
            Some(&SIGHT as &dyn SightOracle),
            Some(config as &dyn crate::env::ConfigOracle),
            Some(&RNG as &dyn crate::env::RngOracle),
        )
    }

    fn skirmish_state() -> GameState {
        let mut state = GameState::with_seed(7);
        state
            .add_actor(ActorState::new(
                EntityId::PLAYER,
                Position::ORIGIN,
                Attributes::new(6, 14, 10),
            ))
            .unwrap();
        state
            .add_actor(
                ActorState::new(EntityId(1), Position::new(1, 0), Attributes::new(4, 9, 2))
                    .hostile(),
            )
            .unwrap();
        state
            .add_actor(
                ActorState::new(EntityId(2), Position::new(3, 3), Attributes::new(4, 11, 2))
                    .hostile(),
            )
            .unwrap();
        state
    }

    fn open_grid(width: i32, height: i32) -> NavGrid {
        NavGrid::from_cells(
            (0..width).flat_map(|x| (0..height).map(move |y| Position::new(x, y))),
        )
    }

    #[test]
    fn enter_combat_orders_initiative_descending() {
        let config = GameConfig::default();
        let env = test_env(&config);
        let mut state = skirmish_state();
        let mut engine = TurnEngine::new(&mut state);

        engine.enter_combat(&env).unwrap();
        assert_eq!(engine.mode(), GameMode::Combat);

        let initiatives: Vec<u32> = state
            .turn
            .iter()
            .map(|id| state.actor(id).unwrap().resources.initiative.unwrap())
            .collect();
        assert!(initiatives.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(state.turn.len(), 3);
    }

    #[test]
    fn enter_combat_twice_is_a_no_op() {
        let config = GameConfig::default();
        let env = test_env(&config);
        let mut state = skirmish_state();
        let mut engine = TurnEngine::new(&mut state);

        engine.enter_combat(&env).unwrap();
        let queue_before = state.turn.clone();
        let encounter_before = state.encounter;

        let mut engine = TurnEngine::new(&mut state);
        engine.enter_combat(&env).unwrap();
        assert_eq!(state.turn, queue_before);
        assert_eq!(state.encounter, encounter_before);
    }

    #[test]
    fn enter_combat_without_hostiles_stays_in_exploration() {
        let config = GameConfig::default();
        let env = test_env(&config);
        let mut state = GameState::with_seed(7);
        state
            .add_actor(ActorState::new(
                EntityId::PLAYER,
                Position::ORIGIN,
                Attributes::default(),
            ))
            .unwrap();

        let mut engine = TurnEngine::new(&mut state);
        engine.enter_combat(&env).unwrap();
        assert_eq!(state.mode, GameMode::Exploration);
    }

    #[test]
    fn begin_turn_restores_ap_to_max() {
        let config = GameConfig::default();
        let env = test_env(&config);
        let mut state = skirmish_state();
        for actor in &mut state.actors {
            actor.resources.spend_ap(u32::MAX);
        }

        let mut engine = TurnEngine::new(&mut state);
        engine.enter_combat(&env).unwrap();
        let first = engine.current_actor().unwrap();
        let actor = state.actor(first).unwrap();
        assert_eq!(actor.resources.ap.current, actor.resources.ap.maximum);
    }

    #[test]
    fn end_turn_wraps_through_the_queue() {
        let config = GameConfig::default();
        let env = test_env(&config);
        let mut state = skirmish_state();
        let mut engine = TurnEngine::new(&mut state);
        engine.enter_combat(&env).unwrap();

        let order: Vec<EntityId> = state.turn.iter().collect();
        let mut engine = TurnEngine::new(&mut state);
        let mut seen = vec![engine.current_actor().unwrap()];
        for _ in 0..order.len() {
            if let Some(next) = engine.end_turn().unwrap() {
                seen.push(next);
            }
        }
        assert_eq!(seen[0], order[0]);
        assert_eq!(seen.last(), Some(&order[0]));
    }

    #[test]
    fn combat_ends_when_no_hostiles_remain() {
        let config = GameConfig::default();
        let env = test_env(&config);
        let mut state = skirmish_state();
        let mut engine = TurnEngine::new(&mut state);
        engine.enter_combat(&env).unwrap();

        for actor in &mut state.actors {
            if actor.hostile {
                actor.resources.take_damage(u32::MAX);
            }
        }

        let mut engine = TurnEngine::new(&mut state);
        assert_eq!(engine.end_turn().unwrap(), None);
        assert_eq!(state.mode, GameMode::Exploration);
        assert!(state.turn.is_empty());
        assert!(
            state
                .actors
                .iter()
                .all(|actor| actor.resources.initiative.is_none())
        );
    }

    #[test]
    fn commit_path_deducts_ceiling_ap_and_starts_movement() {
        let config = GameConfig::default();
        let env = test_env(&config);
        let grid = open_grid(6, 6);
        let mut state = skirmish_state();
        let mut engine = TurnEngine::new(&mut state);

        // Two diagonal steps: cost 28 → ceil(28/10) = 3 AP.
        let plan = engine
            .plan_path(&grid, &env, EntityId::PLAYER, Position::new(2, 2), false)
            .unwrap()
            .unwrap();
        let spend = engine.commit_path(&env, EntityId::PLAYER, &plan).unwrap();
        assert_eq!(spend, ApSpend::Exact);

        let player = state.actor(EntityId::PLAYER).unwrap();
        assert_eq!(player.resources.ap.current, player.resources.ap.maximum - 3);
        assert!(player.movement.is_moving());
    }

    #[test]
    fn advance_movement_walks_the_actor() {
        let config = GameConfig::default();
        let env = test_env(&config);
        let grid = open_grid(6, 6);
        let mut state = skirmish_state();
        let mut engine = TurnEngine::new(&mut state);

        let plan = engine
            .plan_path(&grid, &env, EntityId::PLAYER, Position::new(0, 2), false)
            .unwrap()
            .unwrap();
        engine.commit_path(&env, EntityId::PLAYER, &plan).unwrap();

        engine.advance_movement(EntityId::PLAYER).unwrap();
        assert_eq!(
            state.actor(EntityId::PLAYER).unwrap().position,
            Position::new(0, 1)
        );

        let mut engine = TurnEngine::new(&mut state);
        engine.advance_movement(EntityId::PLAYER).unwrap();
        let player = state.actor(EntityId::PLAYER).unwrap();
        assert_eq!(player.position, Position::new(0, 2));
        assert!(!player.movement.is_moving());
    }

    #[test]
    fn reachable_preview_budget_matches_whole_ap() {
        let config = GameConfig::default();
        let env = test_env(&config);
        let grid = open_grid(12, 12);
        let mut state = skirmish_state();
        let engine = TurnEngine::new(&mut state);

        let reachable = engine
            .reachable_for(&grid, &env, EntityId::PLAYER)
            .unwrap();
        // 14 dexterity → 4 AP → 4 preview steps.
        assert!(reachable.contains(Position::new(0, 4)));
        assert!(!reachable.contains(Position::new(0, 5)));
    }

    #[test]
    fn lethal_attack_drops_victim_from_queue() {
        let config = GameConfig::default();
        let env = test_env(&config);
        let mut state = skirmish_state();
        let mut engine = TurnEngine::new(&mut state);
        engine.enter_combat(&env).unwrap();
        assert!(state.turn.contains(EntityId(1)));

        // Give the player enough AP regardless of whose turn it is.
        state
            .actor_mut(EntityId::PLAYER)
            .unwrap()
            .resources
            .restore_ap();
        let mut engine = TurnEngine::new(&mut state);
        let first = engine
            .attack(AttackAction::new(EntityId::PLAYER, EntityId(1)))
            .unwrap();
        assert!(!first.lethal);
        let second = engine
            .attack(AttackAction::new(EntityId::PLAYER, EntityId(1)))
            .unwrap();
        assert!(second.lethal);
        assert!(!state.turn.contains(EntityId(1)));
    }
}
