//! Stepped movement along a planned route.
//!
//! Movement is an interruptible, resumable process advanced one waypoint per
//! update tick by the orchestrator. Cancellation (re-target or stop) is a
//! transition back to [`MovementState::Idle`] and can only happen between
//! `advance` calls, so an actor is never stranded between cells.

use crate::path::PathPlan;
use crate::state::Position;

/// Where a follower is along its route.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementState {
    #[default]
    Idle,

    Following {
        /// Waypoints still to visit; excludes the cell the actor started on.
        path: Vec<Position>,
        /// Index of the next waypoint to step onto.
        next: usize,
    },
}

/// Result of advancing a follower by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing to do: idle or already finished.
    Idle,

    /// Stepped onto `to`. `arrived` is set on the final waypoint, at which
    /// point the follower is back in `Idle`.
    Stepped { to: Position, arrived: bool },
}

impl MovementState {
    /// Starts following a plan. The plan's start cell (where the actor
    /// already stands) is skipped; a trivial plan leaves the state idle.
    pub fn follow(plan: &PathPlan) -> Self {
        if plan.is_trivial() {
            return MovementState::Idle;
        }
        MovementState::Following {
            path: plan.cells()[1..].to_vec(),
            next: 0,
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, MovementState::Following { .. })
    }

    /// Waypoints not yet stepped onto.
    pub fn remaining(&self) -> &[Position] {
        match self {
            MovementState::Idle => &[],
            MovementState::Following { path, next } => &path[*next..],
        }
    }

    /// Advances one waypoint. Call once per tick while following.
    pub fn advance(&mut self) -> StepOutcome {
        let MovementState::Following { path, next } = self else {
            return StepOutcome::Idle;
        };

        let to = path[*next];
        *next += 1;
        let arrived = *next == path.len();
        if arrived {
            *self = MovementState::Idle;
        }

        StepOutcome::Stepped { to, arrived }
    }

    /// Stops following. Takes effect at the current waypoint boundary: the
    /// actor keeps the cell of its last completed step.
    pub fn cancel(&mut self) {
        *self = MovementState::Idle;
    }
}
