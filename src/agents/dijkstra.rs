use crate::agents::common::{Agent, AgentMetrics, AgentStatus, AgentView};
use crate::error::Result;
use crate::frontier::{CostQueue, Frontier};
use crate::grid::{Cell, GridEnvironment};
use crate::path::{edge_count, reconstruct_path, Parents};
use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// Output of the planning phase.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Cheapest route, start first; empty when the goal is unreachable.
    pub path: Vec<Cell>,
    /// Sum of the costs of every cell entered after the start.
    pub total_cost: Option<u64>,
    /// Cells settled (popped with a current cost) before planning stopped.
    pub explored: FxHashSet<Cell>,
}

impl Plan {
    pub fn found(&self) -> bool {
        self.total_cost.is_some()
    }
}

/// Dijkstra's algorithm over entered-cell costs.
///
/// Entries superseded by a cheaper push are skipped when popped. Costs are
/// positive, so the first settled pop of `goal` carries its minimum cost.
/// Totals accumulate in `u64` so long routes of large costs cannot overflow.
pub fn plan(env: &GridEnvironment, start: Cell, goal: Cell) -> Plan {
    let mut frontier = CostQueue::new();
    frontier.push((0, start));
    let mut best: FxHashMap<Cell, u64> = FxHashMap::default();
    best.insert(start, 0);
    let mut parents = Parents::default();
    parents.insert(start, None);
    let mut explored = FxHashSet::default();

    while let Some((cost, cell)) = frontier.pop() {
        if cost > best.get(&cell).copied().unwrap_or(u64::MAX) {
            trace!("dijkstra: skipping stale entry {} at cost {}", cell, cost);
            continue;
        }
        explored.insert(cell);

        if cell == goal {
            let path = reconstruct_path(&parents, goal);
            debug!(
                "dijkstra: planned {} moves to {} at cost {} ({} cells settled)",
                edge_count(&path),
                goal,
                cost,
                explored.len()
            );
            return Plan {
                path,
                total_cost: Some(cost),
                explored,
            };
        }

        for next in env.neighbors(cell) {
            let candidate = cost.saturating_add(u64::from(env.cost(next)));
            if candidate < best.get(&next).copied().unwrap_or(u64::MAX) {
                best.insert(next, candidate);
                parents.insert(next, Some(cell));
                frontier.push((candidate, next));
            }
        }
    }

    debug!("dijkstra: no route from {} to {}", start, goal);
    Plan {
        path: Vec::new(),
        total_cost: None,
        explored,
    }
}

/// Weighted shortest-path agent: plans the whole route at construction, then
/// replays it one cell per step. Acting never re-plans.
pub struct CostAwareDijkstraAgent {
    env: Arc<GridEnvironment>,
    goal: Cell,
    position: Cell,
    plan: Plan,
    cursor: usize,
    travelled_cost: u64,
    steps: usize,
    status: AgentStatus,
}

impl CostAwareDijkstraAgent {
    pub fn new(env: Arc<GridEnvironment>, start: Cell, goal: Cell) -> Result<Self> {
        env.ensure_free(start, "start")?;
        env.ensure_free(goal, "goal")?;

        let plan = plan(&env, start, goal);
        let status = if plan.found() {
            AgentStatus::Running
        } else {
            AgentStatus::NoPath
        };

        Ok(CostAwareDijkstraAgent {
            env,
            goal,
            position: start,
            plan,
            cursor: 0,
            travelled_cost: 0,
            steps: 0,
            status,
        })
    }

    /// Whether planning found a route.
    pub fn path_found(&self) -> bool {
        self.plan.found()
    }

    pub fn planned_path(&self) -> &[Cell] {
        &self.plan.path
    }

    /// Minimum cost to the goal, `None` when unreachable.
    pub fn total_cost(&self) -> Option<u64> {
        self.plan.total_cost
    }

    /// Cost of the cells entered so far while acting.
    pub fn travelled_cost(&self) -> u64 {
        self.travelled_cost
    }

    pub fn explored(&self) -> &FxHashSet<Cell> {
        &self.plan.explored
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl Agent for CostAwareDijkstraAgent {
    fn name(&self) -> &'static str {
        "dijkstra"
    }

    fn step(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        if self.position == self.goal {
            debug!("dijkstra: goal {} reached after {} moves", self.goal, self.steps);
            self.status = AgentStatus::GoalReached;
            return false;
        }

        match self.plan.path.get(self.cursor + 1) {
            Some(&next) => {
                self.cursor += 1;
                self.position = next;
                self.travelled_cost += u64::from(self.env.cost(next));
                self.steps += 1;
                trace!("dijkstra: moving to {}", next);
                true
            }
            None => {
                debug!("dijkstra: planned route ended at {} short of the goal", self.position);
                self.status = AgentStatus::Stuck;
                false
            }
        }
    }

    fn position(&self) -> Cell {
        self.position
    }

    fn status(&self) -> AgentStatus {
        self.status
    }

    fn goal(&self) -> Option<Cell> {
        Some(self.goal)
    }

    fn view(&self) -> AgentView<'_> {
        AgentView {
            goal: Some(self.goal),
            visited: Some(&self.plan.explored),
            path: &self.plan.path,
            ..AgentView::new(self.position)
        }
    }

    fn metrics(&self) -> AgentMetrics {
        AgentMetrics {
            steps: self.steps,
            visited: self.plan.explored.len(),
            path_length: edge_count(&self.plan.path),
            total_cost: self.plan.total_cost,
            ..AgentMetrics::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn costs(entries: &[((i32, i32), u32)]) -> FxHashMap<Cell, u32> {
        entries.iter().map(|&(c, cost)| (Cell::from(c), cost)).collect()
    }

    #[test]
    fn uniform_grid_costs_manhattan_distance() {
        let env = Arc::new(GridEnvironment::new(5, []).unwrap());
        let mut agent =
            CostAwareDijkstraAgent::new(env, Cell::new(0, 0), Cell::new(4, 4)).unwrap();
        assert!(agent.path_found());
        assert_eq!(agent.total_cost(), Some(8));
        assert_eq!(agent.planned_path().len(), 9);
        // planning happens up front; the agent has not moved yet
        assert_eq!(agent.position(), Cell::new(0, 0));

        let calls = agent.run_until_done(None);
        assert_eq!(calls, 9);
        assert_eq!(agent.position(), Cell::new(4, 4));
        assert_eq!(agent.travelled_cost(), 8);
        assert!(agent.found_goal());
    }

    #[test]
    fn detours_around_expensive_terrain() {
        // The direct corridor through (1,0) costs 9; going up and around costs 1 each.
        let env = GridEnvironment::new(3, [])
            .unwrap()
            .with_terrain(costs(&[((1, 0), 9)]))
            .unwrap();
        let plan = plan(&env, Cell::new(0, 0), Cell::new(2, 0));
        assert_eq!(plan.total_cost, Some(4));
        assert!(!plan.path.contains(&Cell::new(1, 0)));
        assert_eq!(plan.path.first(), Some(&Cell::new(0, 0)));
        assert_eq!(plan.path.last(), Some(&Cell::new(2, 0)));
    }

    #[test]
    fn pays_for_expensive_cell_when_cheaper_than_detour() {
        let env = GridEnvironment::new(3, [])
            .unwrap()
            .with_terrain(costs(&[((1, 0), 2)]))
            .unwrap();
        let plan = plan(&env, Cell::new(0, 0), Cell::new(2, 0));
        assert_eq!(plan.total_cost, Some(3));
        assert_eq!(
            plan.path,
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)]
        );
    }

    #[test]
    fn unreachable_goal_never_moves() {
        let wall = [Cell::new(1, 0), Cell::new(1, 1), Cell::new(1, 2)];
        let env = Arc::new(GridEnvironment::new(3, wall).unwrap());
        let mut agent =
            CostAwareDijkstraAgent::new(env, Cell::new(0, 0), Cell::new(2, 0)).unwrap();
        assert!(!agent.path_found());
        assert_eq!(agent.status(), AgentStatus::NoPath);
        assert_eq!(agent.total_cost(), None);
        assert!(!agent.step());
        assert_eq!(agent.position(), Cell::new(0, 0));
        assert_eq!(agent.explored().len(), 3);
    }

    #[test]
    fn route_cost_can_exceed_u32() {
        // Row y = 1 is blocked, so the only route runs along y = 0.
        let wall = [Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)];
        let env = Arc::new(
            GridEnvironment::new(3, wall)
                .unwrap()
                .with_terrain(costs(&[((1, 0), 3_000_000_000), ((2, 0), 3_000_000_000)]))
                .unwrap(),
        );
        let mut agent =
            CostAwareDijkstraAgent::new(Arc::clone(&env), Cell::new(0, 0), Cell::new(2, 0))
                .unwrap();
        assert!(agent.path_found());
        assert_eq!(agent.total_cost(), Some(6_000_000_000));
        assert_eq!(
            agent.planned_path(),
            &[Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)]
        );

        agent.run_until_done(None);
        assert!(agent.found_goal());
        assert_eq!(agent.travelled_cost(), 6_000_000_000);
        assert_eq!(
            crate::baseline::min_path_cost(&env, Cell::new(0, 0), Cell::new(2, 0)),
            Some(6_000_000_000)
        );
    }

    #[test]
    fn largest_finite_cost_is_still_traversable() {
        let wall = [Cell::new(0, 1), Cell::new(1, 1)];
        let env = Arc::new(
            GridEnvironment::new(2, wall)
                .unwrap()
                .with_terrain(costs(&[((1, 0), u32::MAX - 1)]))
                .unwrap(),
        );
        let agent = CostAwareDijkstraAgent::new(env, Cell::new(0, 0), Cell::new(1, 0)).unwrap();
        assert_eq!(agent.status(), AgentStatus::Running);
        assert_eq!(agent.total_cost(), Some(u64::from(u32::MAX - 1)));
    }

    #[test]
    fn start_on_goal_costs_nothing() {
        let env = Arc::new(GridEnvironment::new(2, []).unwrap());
        let mut agent =
            CostAwareDijkstraAgent::new(env, Cell::new(1, 1), Cell::new(1, 1)).unwrap();
        assert_eq!(agent.total_cost(), Some(0));
        assert!(!agent.step());
        assert_eq!(agent.status(), AgentStatus::GoalReached);
    }
}
