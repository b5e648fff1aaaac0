//! Route planning over the navigation grid.
//!
//! A* with dynamic occupancy and corner-cutting prevention. Two historical
//! cost models are consolidated behind [`CostModel`]: the canonical
//! 8-directional octile model (straight 10, diagonal 14, Chebyshev×10
//! heuristic) and a 4-directional unit-cost model (Manhattan heuristic) that
//! matches the movement-range preview. Both heuristics are admissible and
//! consistent for their models, so returned routes are minimal-cost.

mod range;

pub use range::{ReachableSet, compute_reachable};

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::OccupancyOracle;
use crate::grid::{Direction, NavGrid};
use crate::state::Position;

/// Edge-cost model for route planning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CostModel {
    /// 8-directional movement: `straight` per cardinal step, `diagonal` per
    /// diagonal step. The defaults approximate √2 × 10.
    Octile { straight: u32, diagonal: u32 },

    /// 4-directional movement at one cost unit per step.
    Cardinal,
}

impl CostModel {
    /// The canonical model: 10 straight, 14 diagonal.
    pub const OCTILE: Self = Self::Octile {
        straight: 10,
        diagonal: 14,
    };

    /// Directions expanded from each search node.
    pub fn directions(&self) -> &'static [Direction] {
        match self {
            CostModel::Octile { .. } => &Direction::ALL,
            CostModel::Cardinal => &Direction::CARDINAL,
        }
    }

    /// Cost of one step in the given direction.
    pub fn step_cost(&self, direction: Direction) -> u32 {
        match self {
            CostModel::Octile { straight, diagonal } => {
                if direction.is_diagonal() {
                    *diagonal
                } else {
                    *straight
                }
            }
            CostModel::Cardinal => 1,
        }
    }

    /// Cost of the single step between two adjacent cells.
    pub fn step_cost_between(&self, from: Position, to: Position) -> u32 {
        match self {
            CostModel::Octile { straight, diagonal } => {
                if from.x != to.x && from.y != to.y {
                    *diagonal
                } else {
                    *straight
                }
            }
            CostModel::Cardinal => 1,
        }
    }

    /// The straight-step cost, the unit movement previews count in.
    pub fn straight_cost(&self) -> u32 {
        match self {
            CostModel::Octile { straight, .. } => *straight,
            CostModel::Cardinal => 1,
        }
    }

    /// Admissible, consistent distance estimate between two cells.
    ///
    /// Octile uses Chebyshev distance scaled by the straight cost (never
    /// overestimates since diagonal ≥ straight); Cardinal uses Manhattan.
    pub fn heuristic(&self, from: Position, to: Position) -> u32 {
        match self {
            CostModel::Octile { straight, .. } => straight * from.chebyshev_distance(to),
            CostModel::Cardinal => from.manhattan_distance(to),
        }
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::OCTILE
    }
}

/// One route request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathQuery {
    pub start: Position,
    pub goal: Position,

    /// When set, the goal cell is exempt from the occupancy check so an
    /// actor can path toward an occupied cell (approach-and-attack). The
    /// corner-cutting rule still applies in full.
    pub ignore_occupancy_at_goal: bool,
}

impl PathQuery {
    pub fn new(start: Position, goal: Position) -> Self {
        Self {
            start,
            goal,
            ignore_occupancy_at_goal: false,
        }
    }

    pub fn ignoring_goal_occupancy(mut self) -> Self {
        self.ignore_occupancy_at_goal = true;
        self
    }
}

/// A minimal-cost route: the full cell sequence including the start cell,
/// plus its total cost in the model's units.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathPlan {
    cells: Vec<Position>,
    cost: u32,
}

impl PathPlan {
    fn new(cells: Vec<Position>, cost: u32) -> Self {
        debug_assert!(!cells.is_empty());
        Self { cells, cost }
    }

    /// Every cell from start to goal inclusive.
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Total cost in the cost model's units.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Number of steps, i.e. cells after the start.
    pub fn steps(&self) -> usize {
        self.cells.len() - 1
    }

    pub fn start(&self) -> Position {
        self.cells[0]
    }

    pub fn goal(&self) -> Position {
        self.cells[self.cells.len() - 1]
    }

    /// The already-at-goal case: a one-cell plan with zero cost.
    pub fn is_trivial(&self) -> bool {
        self.cells.len() == 1
    }

    /// Longest prefix of this plan affordable within `max_cost` units.
    ///
    /// Step costs are recomputed from consecutive cells under `model`, so
    /// the prefix's cost is exact. Lets an actor walk as far as its AP
    /// budget reaches and finish the route next turn.
    pub fn truncate_to_cost(&self, model: CostModel, max_cost: u32) -> PathPlan {
        let mut cells = vec![self.cells[0]];
        let mut cost = 0;

        for window in self.cells.windows(2) {
            let (from, to) = (window[0], window[1]);
            let step = model.step_cost_between(from, to);
            if cost + step > max_cost {
                break;
            }
            cost += step;
            cells.push(to);
        }

        PathPlan::new(cells, cost)
    }
}

/// Open-set entry. `seq` is a monotonic insertion counter so that equal
/// f-scores pop in insertion order, keeping tie-breaking deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SearchNode {
    f: u32,
    seq: u64,
    g: u32,
    position: Position,
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        Reverse((self.f, self.seq)).cmp(&Reverse((other.f, other.seq)))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds a minimal-cost route from `query.start` to `query.goal`.
///
/// Returns `None` when no walkable route exists, when either endpoint is
/// non-walkable, or when the goal is occupied and the query does not exempt
/// it. `start == goal` short-circuits to the one-cell plan. The occupancy
/// oracle should exclude the moving actor itself; its own start cell is
/// never occupancy-checked.
///
/// The search never mutates the grid or the oracle, and "no path" is an
/// ordinary result, not an error.
pub fn find_path(
    grid: &NavGrid,
    occupancy: &dyn OccupancyOracle,
    model: CostModel,
    query: PathQuery,
) -> Option<PathPlan> {
    if query.start == query.goal {
        return Some(PathPlan::new(vec![query.start], 0));
    }

    if !grid.is_walkable(query.start) || !grid.is_walkable(query.goal) {
        return None;
    }
    if occupancy.is_occupied(query.goal) && !query.ignore_occupancy_at_goal {
        return None;
    }

    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut g_score: HashMap<Position, u32> = HashMap::new();
    let mut seq: u64 = 0;

    g_score.insert(query.start, 0);
    open.push(SearchNode {
        f: model.heuristic(query.start, query.goal),
        seq,
        g: 0,
        position: query.start,
    });

    while let Some(node) = open.pop() {
        // Lazy deletion: skip entries superseded by a cheaper route.
        if g_score
            .get(&node.position)
            .is_some_and(|&best| node.g > best)
        {
            continue;
        }

        if node.position == query.goal {
            return Some(reconstruct(&came_from, query.goal, node.g));
        }

        for (neighbor, step_cost) in expand(grid, occupancy, model, &query, node.position) {
            let tentative = node.g + step_cost;
            if g_score
                .get(&neighbor)
                .is_none_or(|&existing| tentative < existing)
            {
                came_from.insert(neighbor, node.position);
                g_score.insert(neighbor, tentative);
                seq += 1;
                open.push(SearchNode {
                    f: tentative + model.heuristic(neighbor, query.goal),
                    seq,
                    g: tentative,
                    position: neighbor,
                });
            }
        }
    }

    None
}

/// Legal neighbor cells of `current` with their step costs.
///
/// A neighbor must be walkable and unoccupied (the goal may be exempted by
/// the query). A diagonal additionally requires both orthogonal corner
/// cells to be walkable and unoccupied, so routes never cut a wall corner.
fn expand(
    grid: &NavGrid,
    occupancy: &dyn OccupancyOracle,
    model: CostModel,
    query: &PathQuery,
    current: Position,
) -> ArrayVec<(Position, u32), { GameConfig::MAX_NEIGHBORS }> {
    let mut neighbors = ArrayVec::new();

    for &direction in model.directions() {
        let neighbor = direction.step_from(current);

        if !grid.is_walkable(neighbor) {
            continue;
        }
        let goal_exempt = neighbor == query.goal && query.ignore_occupancy_at_goal;
        if occupancy.is_occupied(neighbor) && !goal_exempt {
            continue;
        }

        if direction.is_diagonal() {
            let (dx, dy) = direction.delta();
            let corner_a = current.offset(dx, 0);
            let corner_b = current.offset(0, dy);
            let corners_open = grid.is_walkable(corner_a)
                && grid.is_walkable(corner_b)
                && !occupancy.is_occupied(corner_a)
                && !occupancy.is_occupied(corner_b);
            if !corners_open {
                continue;
            }
        }

        neighbors.push((neighbor, model.step_cost(direction)));
    }

    neighbors
}

fn reconstruct(came_from: &HashMap<Position, Position>, goal: Position, cost: u32) -> PathPlan {
    let mut cells = vec![goal];
    let mut current = goal;
    while let Some(&previous) = came_from.get(&current) {
        current = previous;
        cells.push(current);
    }
    cells.reverse();
    PathPlan::new(cells, cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::NoOccupancy;
    use std::collections::BTreeSet;

    struct OccupiedCells(BTreeSet<Position>);

    impl OccupiedCells {
        fn new(cells: impl IntoIterator<Item = Position>) -> Self {
            Self(cells.into_iter().collect())
        }
    }

    impl OccupancyOracle for OccupiedCells {
        fn is_occupied(&self, position: Position) -> bool {
            self.0.contains(&position)
        }
    }

    fn open_grid(width: i32, height: i32) -> NavGrid {
        NavGrid::from_cells(
            (0..width).flat_map(|x| (0..height).map(move |y| Position::new(x, y))),
        )
    }

    #[test]
    fn start_equals_goal_yields_single_cell() {
        let grid = open_grid(3, 3);
        let plan = find_path(
            &grid,
            &NoOccupancy,
            CostModel::OCTILE,
            PathQuery::new(Position::new(1, 1), Position::new(1, 1)),
        )
        .unwrap();
        assert_eq!(plan.cells(), &[Position::new(1, 1)]);
        assert_eq!(plan.cost(), 0);
        assert!(plan.is_trivial());
    }

    #[test]
    fn open_grid_diagonal_run() {
        // 5×5 open grid, corner to corner: four diagonal steps, cost 4×14.
        let grid = open_grid(5, 5);
        let plan = find_path(
            &grid,
            &NoOccupancy,
            CostModel::OCTILE,
            PathQuery::new(Position::ORIGIN, Position::new(4, 4)),
        )
        .unwrap();
        assert_eq!(plan.steps(), 4);
        assert_eq!(plan.cost(), 56);
    }

    #[test]
    fn open_grid_octile_length_matches_chebyshev() {
        let grid = open_grid(6, 6);
        for goal in [Position::new(5, 2), Position::new(3, 5), Position::new(0, 4)] {
            let plan = find_path(
                &grid,
                &NoOccupancy,
                CostModel::OCTILE,
                PathQuery::new(Position::ORIGIN, goal),
            )
            .unwrap();
            assert_eq!(plan.steps() as u32, Position::ORIGIN.chebyshev_distance(goal));
        }
    }

    #[test]
    fn cardinal_length_matches_manhattan() {
        let grid = open_grid(6, 6);
        for goal in [Position::new(5, 2), Position::new(3, 5)] {
            let plan = find_path(
                &grid,
                &NoOccupancy,
                CostModel::Cardinal,
                PathQuery::new(Position::ORIGIN, goal),
            )
            .unwrap();
            assert_eq!(plan.steps() as u32, Position::ORIGIN.manhattan_distance(goal));
            assert_eq!(plan.cost(), plan.steps() as u32);
        }
    }

    #[test]
    fn occupied_cell_forces_detour() {
        // Occupying (2,2) pushes the corner-to-corner run off the main
        // diagonal; the route must lengthen but still arrive.
        let grid = open_grid(5, 5);
        let occupancy = OccupiedCells::new([Position::new(2, 2)]);
        let plan = find_path(
            &grid,
            &occupancy,
            CostModel::OCTILE,
            PathQuery::new(Position::ORIGIN, Position::new(4, 4)),
        )
        .unwrap();
        assert!(plan.steps() > 4);
        assert!(!plan.cells().contains(&Position::new(2, 2)));
    }

    #[test]
    fn no_route_returns_none() {
        // Two disconnected columns.
        let grid = NavGrid::from_cells([
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(3, 0),
            Position::new(3, 1),
        ]);
        let plan = find_path(
            &grid,
            &NoOccupancy,
            CostModel::OCTILE,
            PathQuery::new(Position::ORIGIN, Position::new(3, 1)),
        );
        assert!(plan.is_none());
    }

    #[test]
    fn unwalkable_endpoints_return_none() {
        let grid = open_grid(3, 3);
        let off = Position::new(7, 7);
        assert!(
            find_path(
                &grid,
                &NoOccupancy,
                CostModel::OCTILE,
                PathQuery::new(off, Position::ORIGIN)
            )
            .is_none()
        );
        assert!(
            find_path(
                &grid,
                &NoOccupancy,
                CostModel::OCTILE,
                PathQuery::new(Position::ORIGIN, off)
            )
            .is_none()
        );
    }

    #[test]
    fn occupied_goal_blocks_unless_exempted() {
        let grid = open_grid(4, 1);
        let occupancy = OccupiedCells::new([Position::new(3, 0)]);
        let query = PathQuery::new(Position::ORIGIN, Position::new(3, 0));

        assert!(find_path(&grid, &occupancy, CostModel::OCTILE, query).is_none());

        let plan = find_path(
            &grid,
            &occupancy,
            CostModel::OCTILE,
            query.ignoring_goal_occupancy(),
        )
        .unwrap();
        assert_eq!(plan.goal(), Position::new(3, 0));
    }

    #[test]
    fn never_cuts_blocked_corners() {
        // Wall at (1,0): stepping (0,0) → (1,1) diagonally would slide
        // through its corner, so the route must go up then over.
        let mut cells: Vec<Position> = (0..3)
            .flat_map(|x| (0..3).map(move |y| Position::new(x, y)))
            .collect();
        cells.retain(|&cell| cell != Position::new(1, 0));
        let grid = NavGrid::from_cells(cells);

        let plan = find_path(
            &grid,
            &NoOccupancy,
            CostModel::OCTILE,
            PathQuery::new(Position::ORIGIN, Position::new(2, 0)),
        )
        .unwrap();

        for window in plan.cells().windows(2) {
            let (from, to) = (window[0], window[1]);
            assert!(grid.is_walkable(to));
            let (dx, dy) = (to.x - from.x, to.y - from.y);
            if dx != 0 && dy != 0 {
                assert!(grid.is_walkable(from.offset(dx, 0)));
                assert!(grid.is_walkable(from.offset(0, dy)));
            }
        }
    }

    #[test]
    fn truncation_keeps_the_affordable_prefix() {
        let grid = open_grid(6, 6);
        let plan = find_path(
            &grid,
            &NoOccupancy,
            CostModel::OCTILE,
            PathQuery::new(Position::ORIGIN, Position::new(4, 4)),
        )
        .unwrap();

        // Budget 30 covers two 14-unit diagonals, not three.
        let prefix = plan.truncate_to_cost(CostModel::OCTILE, 30);
        assert_eq!(prefix.steps(), 2);
        assert_eq!(prefix.cost(), 28);
        assert_eq!(prefix.cells(), &plan.cells()[..3]);

        // Zero budget degrades to the trivial plan.
        let stuck = plan.truncate_to_cost(CostModel::OCTILE, 0);
        assert!(stuck.is_trivial());
    }

    #[test]
    fn equal_inputs_give_identical_routes() {
        let grid = open_grid(8, 8);
        let query = PathQuery::new(Position::ORIGIN, Position::new(7, 3));
        let first = find_path(&grid, &NoOccupancy, CostModel::OCTILE, query).unwrap();
        let second = find_path(&grid, &NoOccupancy, CostModel::OCTILE, query).unwrap();
        assert_eq!(first, second);
    }
}
