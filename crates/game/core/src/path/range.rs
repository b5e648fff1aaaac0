//! Movement-range previews.
//!
//! Uniform-cost search over 4-directional adjacency at one cost unit per
//! step. The preview deliberately ignores diagonal savings so AP accounting
//! stays simple and conservative, and it does not filter on occupancy:
//! reachability shows raw traversable distance, and a "reachable" cell may
//! still be unsteppable right now because someone stands on it. Occupancy is
//! enforced when the concrete route is planned.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::grid::{Direction, NavGrid};
use crate::state::Position;

/// Cells reachable within a cost budget, each with its minimal cost from the
/// start. Valid for one preview session: recompute whenever the actor moves
/// or its AP budget changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReachableSet {
    costs: BTreeMap<Position, u32>,
}

impl ReachableSet {
    pub fn contains(&self, position: Position) -> bool {
        self.costs.contains_key(&position)
    }

    /// Minimal step cost from the start cell, if reachable within budget.
    pub fn cost_of(&self, position: Position) -> Option<u32> {
        self.costs.get(&position).copied()
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Entries in deterministic (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, u32)> + '_ {
        self.costs.iter().map(|(&position, &cost)| (position, cost))
    }
}

/// Computes every walkable cell within `budget` steps of `start`.
///
/// The start cell is always included at cost 0 (even on budget 0 or when the
/// actor somehow stands on an unclassified cell). Each call fully replaces
/// any previous preview; results are never incremental. Growing the budget
/// only ever adds entries and never changes the cost of cells both budgets
/// reach.
pub fn compute_reachable(grid: &NavGrid, start: Position, budget: u32) -> ReachableSet {
    let mut costs = BTreeMap::new();
    let mut frontier = BinaryHeap::new();
    costs.insert(start, 0);
    frontier.push(Reverse((0u32, start)));

    while let Some(Reverse((cost, current))) = frontier.pop() {
        if costs.get(&current).is_some_and(|&best| cost > best) {
            continue;
        }

        for direction in Direction::CARDINAL {
            let neighbor = direction.step_from(current);
            if !grid.is_walkable(neighbor) {
                continue;
            }

            let next = cost + 1;
            if next > budget {
                continue;
            }

            if costs.get(&neighbor).is_none_or(|&existing| next < existing) {
                costs.insert(neighbor, next);
                frontier.push(Reverse((next, neighbor)));
            }
        }
    }

    ReachableSet { costs }
}
