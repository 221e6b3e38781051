use crate::agents::common::{Agent, AgentMetrics, AgentStatus, AgentView};
use crate::error::Result;
use crate::grid::{Cell, GridEnvironment};
use crate::path::edge_count;
use log::{debug, trace};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Local best-first walker.
///
/// Each step moves to the neighbour minimising terrain cost plus Manhattan
/// distance to the goal, preferring unvisited neighbours and falling back to
/// visited ones. There is no global frontier: the walk can be suboptimal and
/// may oscillate, which is why a step limit can be attached.
pub struct GreedyUtilityAgent {
    env: Arc<GridEnvironment>,
    goal: Cell,
    position: Cell,
    visited: FxHashSet<Cell>,
    path: Vec<Cell>,
    total_cost: u64,
    steps: usize,
    revisits: usize,
    step_limit: Option<usize>,
    status: AgentStatus,
}

impl GreedyUtilityAgent {
    pub fn new(env: Arc<GridEnvironment>, start: Cell, goal: Cell) -> Result<Self> {
        env.ensure_free(start, "start")?;
        env.ensure_free(goal, "goal")?;

        let mut visited = FxHashSet::default();
        visited.insert(start);

        Ok(GreedyUtilityAgent {
            env,
            goal,
            position: start,
            visited,
            path: vec![start],
            total_cost: 0,
            steps: 0,
            revisits: 0,
            step_limit: None,
            status: AgentStatus::Running,
        })
    }

    /// Stops the walk with [`AgentStatus::StepLimit`] after `limit` moves.
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Every cell entered, start first. May contain repeats.
    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    /// Accumulated cost of every cell entered.
    pub fn total_cost(&self) -> u64 {
        self.total_cost
    }

    pub fn visited(&self) -> &FxHashSet<Cell> {
        &self.visited
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Picks the next cell by `(cost + distance, cost, distance, cell)`.
    fn choose(&self) -> Option<(Cell, u32)> {
        let neighbors: Vec<Cell> = self.env.neighbors(self.position).collect();
        let unvisited: Vec<Cell> = neighbors
            .iter()
            .copied()
            .filter(|n| !self.visited.contains(n))
            .collect();
        let candidates = if unvisited.is_empty() {
            neighbors
        } else {
            unvisited
        };

        candidates
            .into_iter()
            .map(|n| {
                let cost = self.env.cost(n);
                let distance = n.manhattan(self.goal);
                (cost.saturating_add(distance), cost, distance, n)
            })
            .min()
            .map(|(_, cost, _, n)| (n, cost))
    }
}

impl Agent for GreedyUtilityAgent {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn step(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        if self.position == self.goal {
            debug!(
                "greedy: goal {} reached after {} moves at cost {}",
                self.goal, self.steps, self.total_cost
            );
            self.status = AgentStatus::GoalReached;
            return false;
        }
        if self.step_limit.is_some_and(|limit| self.steps >= limit) {
            debug!("greedy: step limit hit at {}", self.position);
            self.status = AgentStatus::StepLimit;
            return false;
        }

        let Some((next, cost)) = self.choose() else {
            debug!("greedy: no neighbour to move to from {}", self.position);
            self.status = AgentStatus::Stuck;
            return false;
        };

        if !self.visited.insert(next) {
            self.revisits += 1;
        }
        self.total_cost += u64::from(cost);
        self.position = next;
        self.path.push(next);
        self.steps += 1;
        trace!("greedy: moving to {} (accumulated cost {})", next, self.total_cost);
        true
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
            visited: Some(&self.visited),
            path: &self.path,
            ..AgentView::new(self.position)
        }
    }

    fn metrics(&self) -> AgentMetrics {
        AgentMetrics {
            steps: self.steps,
            redundant_steps: self.revisits,
            visited: self.visited.len(),
            closed: 0,
            path_length: edge_count(&self.path),
            total_cost: Some(self.total_cost),
        }
    }
}
