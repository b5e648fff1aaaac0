//! The frame-driven session loop.
//!
//! [`Session`] owns the state, the generated map, the navigation grid, and
//! the per-actor intent providers. Every call to [`Session::tick`] runs one
//! logical update to completion: sighting checks in exploration, one intent
//! or one movement waypoint in combat, and turn handoff. Nothing blocks or
//! suspends mid-computation.

use std::collections::BTreeMap;

use cryptfall_core::{
    AttackAction, AttackError, CellGeometry, Env, EntityId, GameConfig, GameMode, GameState,
    MovementState, NavGrid, PathPlan, PathQuery, PcgRng, Position, StepOutcome, Tick, TurnEngine,
    ap_cost_for_path, compute_reachable, compute_seed, find_path,
};

use crate::error::RuntimeError;
use crate::oracle::{GridSight, OccupancySnapshot, Scenario, StaticMapOracle};
use crate::providers::{HunterProvider, Intent, IntentProvider, ScriptedProvider};

/// Seed context tags, keeping each roll family independent.
const SEED_PATROL_X: u32 = 1;
const SEED_PATROL_Y: u32 = 2;

/// Something observable happened during a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    CombatStarted,
    TurnStarted(EntityId),
    Moved {
        actor: EntityId,
        to: Position,
    },
    Attacked {
        attacker: EntityId,
        target: EntityId,
        damage: u32,
        lethal: bool,
    },
    ActorDied(EntityId),
    CombatEnded,
}

/// A movement preview for the pointer's current cell.
#[derive(Clone, Debug, PartialEq)]
pub struct MovePreview {
    /// Waypoints start-to-target; two cells for a direct straight shot.
    pub cells: Vec<Position>,
    pub ap_cost: u32,
    /// True when line of sight allowed bypassing the pathfinder.
    pub direct: bool,
}

/// Bounds preview recalculation while the pointer is held down.
#[derive(Debug, Default)]
struct PreviewThrottle {
    next_allowed: Tick,
    cached: Option<MovePreview>,
}

/// One running play session.
pub struct Session {
    state: GameState,
    map: StaticMapOracle,
    grid: NavGrid,
    config: GameConfig,
    rng: PcgRng,
    providers: BTreeMap<EntityId, Box<dyn IntentProvider>>,
    throttle: PreviewThrottle,
}

impl Session {
    /// Builds a session from a scenario. Hostiles get the hunter policy;
    /// the player starts with an empty script (see [`Session::script_player`]).
    pub fn from_scenario(
        scenario: &Scenario,
        seed: u64,
        config: GameConfig,
    ) -> Result<Self, RuntimeError> {
        let (map, state) = scenario.build(seed)?;
        Ok(Self::new(map, state, config))
    }

    /// Builds a session from a scenario with a fresh random seed.
    pub fn from_scenario_random_seed(
        scenario: &Scenario,
        config: GameConfig,
    ) -> Result<Self, RuntimeError> {
        Self::from_scenario(scenario, rand::random(), config)
    }

    pub fn new(map: StaticMapOracle, state: GameState, config: GameConfig) -> Self {
        let grid = NavGrid::from_map(&map);
        let mut providers: BTreeMap<EntityId, Box<dyn IntentProvider>> = BTreeMap::new();
        for actor in &state.actors {
            if actor.hostile {
                providers.insert(actor.id, Box::new(HunterProvider));
            } else {
                providers.insert(actor.id, Box::new(ScriptedProvider::default()));
            }
        }

        Self {
            state,
            map,
            grid,
            config,
            rng: PcgRng,
            providers,
            throttle: PreviewThrottle::default(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn grid(&self) -> &NavGrid {
        &self.grid
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn current_actor(&self) -> Option<EntityId> {
        match self.state.mode {
            GameMode::Exploration => None,
            GameMode::Combat => self.state.turn.current(),
        }
    }

    /// Replaces an actor's intent provider.
    pub fn set_provider(&mut self, actor: EntityId, provider: Box<dyn IntentProvider>) {
        self.providers.insert(actor, provider);
    }

    /// Queues player intents for upcoming combat turns.
    pub fn script_player(&mut self, intents: impl IntoIterator<Item = Intent>) {
        self.providers.insert(
            EntityId::PLAYER,
            Box::new(ScriptedProvider::new(intents)),
        );
    }

    /// Rescans the map oracle after a regeneration. Idempotent.
    pub fn rebuild_grid(&mut self) {
        self.grid.rebuild(&self.map);
        self.throttle = PreviewThrottle::default();
    }

    /// Free movement outside combat: route the actor toward a cell,
    /// replacing any route in progress at the current waypoint boundary.
    /// Returns false when no route exists.
    pub fn command_move_to(
        &mut self,
        actor: EntityId,
        goal: Position,
    ) -> Result<bool, RuntimeError> {
        let occupancy = OccupancySnapshot::of_living(&self.state, Some(actor));
        let Some(mover) = self.state.actor(actor) else {
            return Ok(false);
        };

        let plan = find_path(
            &self.grid,
            &occupancy,
            self.config.cost_model,
            PathQuery::new(mover.position, goal),
        );

        let mut engine = TurnEngine::new(&mut self.state);
        engine.cancel_movement(actor)?;
        match plan {
            Some(plan) if !plan.is_trivial() => {
                if let Some(mover) = self.state.actor_mut(actor) {
                    mover.movement = MovementState::follow(&plan);
                    return Ok(true);
                }
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    /// Runs one logical update tick.
    pub fn tick(&mut self) -> Result<Vec<SessionEvent>, RuntimeError> {
        self.state.clock = self.state.clock + 1;
        let mut events = Vec::new();
        match self.state.mode {
            GameMode::Exploration => self.tick_exploration(&mut events)?,
            GameMode::Combat => self.tick_combat(&mut events)?,
        }
        Ok(events)
    }

    /// Movement preview for the pointer's world position, throttled to at
    /// most one recalculation per configured interval; calls inside the
    /// window replay the cached result.
    pub fn preview_move(&mut self, pointer: (f32, f32)) -> Option<MovePreview> {
        if self.state.clock < self.throttle.next_allowed {
            return self.throttle.cached.clone();
        }
        self.throttle.next_allowed = self.state.clock + self.config.preview_recalc_interval;

        self.throttle.cached = self.compute_preview(pointer);
        self.throttle.cached.clone()
    }

    fn compute_preview(&self, pointer: (f32, f32)) -> Option<MovePreview> {
        let player = self.state.player().filter(|player| player.is_alive())?;
        let geometry = CellGeometry::new(self.config.cell_size);
        let target = geometry.world_to_cell(pointer.0, pointer.1);

        if !self.grid.is_walkable(target) {
            return None;
        }

        // Reach is previewed without occupancy: a reachable cell may still
        // be blocked when the route is actually planned.
        let budget = self.preview_budget(player.resources.ap.current);
        let reachable = compute_reachable(&self.grid, player.position, budget);
        if !reachable.contains(target) {
            return None;
        }

        let sight = GridSight::new(&self.grid);
        if cryptfall_core::SightOracle::clear_line(&sight, player.position, target) {
            let distance = geometry.center_distance(player.position, target);
            let ap_cost = (distance / self.config.cell_size).ceil() as u32;
            return Some(MovePreview {
                cells: vec![player.position, target],
                ap_cost,
                direct: true,
            });
        }

        let occupancy = OccupancySnapshot::of_living(&self.state, Some(player.id));
        let plan = find_path(
            &self.grid,
            &occupancy,
            self.config.cost_model,
            PathQuery::new(player.position, target),
        )?;

        Some(MovePreview {
            cells: plan.cells().to_vec(),
            ap_cost: ap_cost_for_path(plan.cost(), self.config.units_per_ap),
            direct: false,
        })
    }

    fn preview_budget(&self, ap: u32) -> u32 {
        ap * self.config.units_per_ap / self.config.cost_model.straight_cost().max(1)
    }

    fn tick_exploration(&mut self, events: &mut Vec<SessionEvent>) -> Result<(), RuntimeError> {
        // Advance free movement one waypoint for everyone en route.
        let moving: Vec<EntityId> = self
            .state
            .living()
            .filter(|actor| actor.movement.is_moving())
            .map(|actor| actor.id)
            .collect();
        let mut engine = TurnEngine::new(&mut self.state);
        for actor in moving {
            if let StepOutcome::Stepped { to, .. } = engine.advance_movement(actor)? {
                events.push(SessionEvent::Moved { actor, to });
            }
        }

        if self.check_sighting(events)? {
            return Ok(());
        }

        self.patrol_idle_hostiles()?;
        Ok(())
    }

    /// A hostile sights the player when it is within the sight radius with
    /// a clear line. Sighting engages combat; duplicate triggers in the
    /// same tick are absorbed by the engine's idempotent entry.
    fn check_sighting(&mut self, events: &mut Vec<SessionEvent>) -> Result<bool, RuntimeError> {
        let Some(player) = self.state.player().filter(|player| player.is_alive()) else {
            return Ok(false);
        };
        let player_position = player.position;

        let sight = GridSight::new(&self.grid);
        let sighted = self.state.living_hostiles().any(|enemy| {
            enemy.position.chebyshev_distance(player_position) <= self.config.sight_radius
                && cryptfall_core::SightOracle::clear_line(
                    &sight,
                    enemy.position,
                    player_position,
                )
        });
        if !sighted {
            return Ok(false);
        }

        tracing::info!(clock = %self.state.clock, "hostile sighted the player, engaging combat");

        // Combat interrupts free movement at the waypoint boundary.
        let walkers: Vec<EntityId> = self.state.actors.iter().map(|actor| actor.id).collect();
        let occupancy = OccupancySnapshot::of_living(&self.state, None);
        let sight = GridSight::new(&self.grid);
        let env = Env::with_all(&self.map, &occupancy, &sight, &self.config, &self.rng)
            .as_game_env();
        let mut engine = TurnEngine::new(&mut self.state);
        for actor in walkers {
            engine.cancel_movement(actor)?;
        }
        engine.enter_combat(&env)?;

        events.push(SessionEvent::CombatStarted);
        if let Some(first) = self.state.turn.current() {
            tracing::debug!(actor = %first, "first turn");
            events.push(SessionEvent::TurnStarted(first));
        }
        Ok(true)
    }

    /// Idle hostiles pick a random destination around their spawn cell and
    /// wander toward it.
    fn patrol_idle_hostiles(&mut self) -> Result<(), RuntimeError> {
        let radius = self.config.patrol_radius as i32;
        let idle: Vec<(EntityId, Position)> = self
            .state
            .living_hostiles()
            .filter(|enemy| !enemy.movement.is_moving())
            .map(|enemy| (enemy.id, enemy.spawn))
            .collect();

        for (enemy, spawn) in idle {
            let seed_x = compute_seed(self.state.seed, self.state.clock.0, enemy.0, SEED_PATROL_X);
            let seed_y = compute_seed(self.state.seed, self.state.clock.0, enemy.0, SEED_PATROL_Y);
            let destination = Position::new(
                spawn.x + cryptfall_core::RngOracle::range(&self.rng, seed_x, -radius, radius),
                spawn.y + cryptfall_core::RngOracle::range(&self.rng, seed_y, -radius, radius),
            );
            if !self.grid.is_walkable(destination) {
                continue;
            }
            self.command_move_to(enemy, destination)?;
        }
        Ok(())
    }

    fn tick_combat(&mut self, events: &mut Vec<SessionEvent>) -> Result<(), RuntimeError> {
        let Some(current) = self.state.turn.current() else {
            // Queue drained outside end_turn (should not happen); disengage.
            let mut engine = TurnEngine::new(&mut self.state);
            let _ = engine.end_turn();
            return Ok(());
        };

        // A dead combatant forfeits; end_turn also sweeps the queue.
        if self.state.actor(current).is_none_or(|actor| !actor.is_alive()) {
            self.finish_turn(events)?;
            return Ok(());
        }

        // Movement in progress: one waypoint this tick, decisions resume
        // after arrival.
        if self
            .state
            .actor(current)
            .is_some_and(|actor| actor.movement.is_moving())
        {
            let mut engine = TurnEngine::new(&mut self.state);
            if let StepOutcome::Stepped { to, .. } = engine.advance_movement(current)? {
                events.push(SessionEvent::Moved { actor: current, to });
            }
            return Ok(());
        }

        let intent = self.decide(current)?;
        tracing::debug!(actor = %current, ?intent, "intent");
        match intent {
            Intent::MoveTo(goal) => self.execute_move(current, goal, events)?,
            Intent::Approach(target) => self.execute_approach(current, target, events)?,
            Intent::Attack(target) => self.execute_attack(current, target, events)?,
            Intent::EndTurn => self.finish_turn(events)?,
        }
        Ok(())
    }

    fn decide(&mut self, actor: EntityId) -> Result<Intent, RuntimeError> {
        let occupancy = OccupancySnapshot::of_living(&self.state, Some(actor));
        let sight = GridSight::new(&self.grid);
        let env = Env::with_all(&self.map, &occupancy, &sight, &self.config, &self.rng)
            .as_game_env();

        let provider = self
            .providers
            .get_mut(&actor)
            .ok_or(RuntimeError::MissingProvider(actor))?;
        Ok(provider.decide(actor, &self.state, &self.grid, &env))
    }

    /// Plans toward `goal`, walks as far as the AP pool pays for, and
    /// starts stepping. No route (or no affordable step) passes the turn.
    fn execute_move(
        &mut self,
        actor: EntityId,
        goal: Position,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), RuntimeError> {
        let plan = self.plan_for(actor, goal, false)?;
        match plan {
            Some(plan) => self.commit_affordable(actor, &plan, events),
            None => {
                tracing::debug!(actor = %actor, goal = %goal, "no route");
                self.finish_turn(events)
            }
        }
    }

    /// Plans toward an occupied target cell (goal occupancy exempted) and
    /// stops one cell short of it.
    fn execute_approach(
        &mut self,
        actor: EntityId,
        target: EntityId,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), RuntimeError> {
        let Some(goal) = self
            .state
            .actor(target)
            .filter(|victim| victim.is_alive())
            .map(|victim| victim.position)
        else {
            return self.finish_turn(events);
        };

        let Some(plan) = self.plan_for(actor, goal, true)? else {
            tracing::debug!(actor = %actor, target = %target, "no approach route");
            return self.finish_turn(events);
        };
        if plan.steps() <= 1 {
            // Already adjacent; nothing to walk.
            return self.finish_turn(events);
        }

        let cells = plan.cells();
        let last_step = self
            .config
            .cost_model
            .step_cost_between(cells[cells.len() - 2], cells[cells.len() - 1]);
        let short = plan.truncate_to_cost(self.config.cost_model, plan.cost() - last_step);
        self.commit_affordable(actor, &short, events)
    }

    fn plan_for(
        &self,
        actor: EntityId,
        goal: Position,
        ignore_occupancy_at_goal: bool,
    ) -> Result<Option<PathPlan>, RuntimeError> {
        let occupancy = OccupancySnapshot::of_living(&self.state, Some(actor));
        let Some(mover) = self.state.actor(actor) else {
            return Ok(None);
        };

        let mut query = PathQuery::new(mover.position, goal);
        if ignore_occupancy_at_goal {
            query = query.ignoring_goal_occupancy();
        }
        Ok(find_path(
            &self.grid,
            &occupancy,
            self.config.cost_model,
            query,
        ))
    }

    fn commit_affordable(
        &mut self,
        actor: EntityId,
        plan: &PathPlan,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), RuntimeError> {
        let ap = self
            .state
            .actor(actor)
            .map(|actor| actor.resources.ap.current)
            .unwrap_or(0);
        let affordable =
            plan.truncate_to_cost(self.config.cost_model, ap * self.config.units_per_ap);

        if affordable.is_trivial() {
            return self.finish_turn(events);
        }

        let occupancy = OccupancySnapshot::of_living(&self.state, Some(actor));
        let sight = GridSight::new(&self.grid);
        let env = Env::with_all(&self.map, &occupancy, &sight, &self.config, &self.rng)
            .as_game_env();
        let mut engine = TurnEngine::new(&mut self.state);
        let spend = engine.commit_path(&env, actor, &affordable)?;
        tracing::debug!(
            actor = %actor,
            steps = affordable.steps(),
            cost = affordable.cost(),
            clamped = spend.was_clamped(),
            "route committed"
        );
        Ok(())
    }

    fn execute_attack(
        &mut self,
        actor: EntityId,
        target: EntityId,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), RuntimeError> {
        let mut engine = TurnEngine::new(&mut self.state);
        match engine.attack(AttackAction::new(actor, target)) {
            Ok(outcome) => {
                tracing::info!(
                    attacker = %actor,
                    target = %target,
                    damage = outcome.damage,
                    lethal = outcome.lethal,
                    "attack landed"
                );
                events.push(SessionEvent::Attacked {
                    attacker: actor,
                    target,
                    damage: outcome.damage,
                    lethal: outcome.lethal,
                });
                if outcome.lethal {
                    events.push(SessionEvent::ActorDied(target));
                }
                Ok(())
            }
            Err(AttackError::InsufficientAp { .. }) => {
                // Ordinary outcome: the pool cannot pay, the turn is over.
                self.finish_turn(events)
            }
            Err(err) => {
                tracing::warn!(attacker = %actor, target = %target, %err, "attack rejected");
                self.finish_turn(events)
            }
        }
    }

    fn finish_turn(&mut self, events: &mut Vec<SessionEvent>) -> Result<(), RuntimeError> {
        let mut engine = TurnEngine::new(&mut self.state);
        match engine.end_turn()? {
            Some(next) => {
                tracing::debug!(actor = %next, "turn started");
                events.push(SessionEvent::TurnStarted(next));
            }
            None => {
                tracing::info!("no hostiles remain, combat disengaged");
                events.push(SessionEvent::CombatEnded);
            }
        }
        Ok(())
    }
}
