use crate::agents::common::{Agent, AgentMetrics, AgentStatus, AgentView};
use crate::error::Result;
use crate::frontier::{Frontier, Stack};
use crate::grid::{Cell, GridEnvironment};
use log::{debug, trace};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Depth-first explorer with explicit backtracking.
///
/// The stack holds the active route from the start cell. Each step either
/// advances to the first unvisited neighbour or closes the current cell and
/// walks back to the new stack top. Exploration ends when the stack empties,
/// at which point every cell of the start's connected component is closed.
pub struct ExploringBacktrackAgent {
    env: Arc<GridEnvironment>,
    position: Cell,
    stack: Stack,
    visited: FxHashSet<Cell>,
    closed: Vec<Cell>,
    steps: usize,
    redundant_steps: usize,
    status: AgentStatus,
}

impl ExploringBacktrackAgent {
    pub fn new(env: Arc<GridEnvironment>, start: Cell) -> Result<Self> {
        env.ensure_free(start, "start")?;

        let mut stack = Stack::new();
        stack.push(start);
        let mut visited = FxHashSet::default();
        visited.insert(start);

        Ok(ExploringBacktrackAgent {
            env,
            position: start,
            stack,
            visited,
            closed: Vec::new(),
            steps: 0,
            redundant_steps: 0,
            status: AgentStatus::Running,
        })
    }

    pub fn visited(&self) -> &FxHashSet<Cell> {
        &self.visited
    }

    /// Fully expanded cells, in the order they were closed.
    pub fn closed(&self) -> &[Cell] {
        &self.closed
    }

    /// The route from the start cell to the current position.
    pub fn active_path(&self) -> &[Cell] {
        self.stack.as_slice()
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn redundant_steps(&self) -> usize {
        self.redundant_steps
    }

    /// Fraction of `reachable` cells visited so far, in `[0, 1]`.
    pub fn completeness(&self, reachable: usize) -> f64 {
        if reachable == 0 {
            return 0.0;
        }
        self.visited.len() as f64 / reachable as f64
    }
}

impl Agent for ExploringBacktrackAgent {
    fn name(&self) -> &'static str {
        "explore"
    }

    fn step(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        let next = self
            .env
            .neighbors(self.position)
            .find(|n| !self.visited.contains(n));

        if let Some(next) = next {
            self.stack.push(next);
            self.visited.insert(next);
            self.position = next;
            self.steps += 1;
            trace!("explore: advancing to {}", next);
            return true;
        }

        if let Some(done) = self.stack.pop() {
            self.closed.push(done);
        }

        match self.stack.peek() {
            Some(&top) => {
                trace!("explore: closed {}, backtracking to {}", self.position, top);
                self.position = top;
                self.steps += 1;
                self.redundant_steps += 1;
                true
            }
            None => {
                debug!(
                    "explore: finished, {} cells visited in {} steps",
                    self.visited.len(),
                    self.steps
                );
                self.status = AgentStatus::Explored;
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

    fn view(&self) -> AgentView<'_> {
        AgentView {
            visited: Some(&self.visited),
            closed: &self.closed,
            path: self.stack.as_slice(),
            ..AgentView::new(self.position)
        }
    }

    fn metrics(&self) -> AgentMetrics {
        AgentMetrics {
            steps: self.steps,
            redundant_steps: self.redundant_steps,
            visited: self.visited.len(),
            closed: self.closed.len(),
            path_length: self.steps - self.redundant_steps,
            total_cost: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_first_unvisited_neighbor() {
        let env = Arc::new(GridEnvironment::new(3, []).unwrap());
        let mut agent = ExploringBacktrackAgent::new(env, Cell::new(1, 1)).unwrap();
        assert!(agent.step());
        assert_eq!(agent.position(), Cell::new(1, 2));
        assert!(agent.step());
        assert_eq!(agent.position(), Cell::new(2, 2));
        assert_eq!(agent.active_path().len(), 3);
    }

    #[test]
    fn dead_end_corridor_backtracks() {
        // Row y = 0 is a corridor of width 3; everything above is blocked.
        let obstacles = [Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)];
        let env = Arc::new(GridEnvironment::new(3, obstacles).unwrap());
        let mut agent = ExploringBacktrackAgent::new(env, Cell::new(1, 0)).unwrap();

        agent.run_until_done(Some(100));

        assert_eq!(agent.status(), AgentStatus::Explored);
        // 1,0 -> 2,0 -> back 1,0 -> 0,0 -> back 1,0 -> done
        assert_eq!(agent.steps(), 4);
        assert_eq!(agent.redundant_steps(), 2);
        assert_eq!(agent.closed(), &[Cell::new(2, 0), Cell::new(0, 0), Cell::new(1, 0)]);
        assert_eq!(agent.position(), Cell::new(1, 0));
    }

    #[test]
    fn every_visited_cell_is_closed() {
        let obstacles = [Cell::new(1, 1), Cell::new(2, 2)];
        let env = Arc::new(GridEnvironment::new(4, obstacles).unwrap());
        let mut agent = ExploringBacktrackAgent::new(Arc::clone(&env), Cell::new(0, 0)).unwrap();
        agent.run_until_done(None);

        let closed: FxHashSet<Cell> = agent.closed().iter().copied().collect();
        assert_eq!(&closed, agent.visited());
        assert_eq!(agent.visited().len(), env.free_cell_count());
        assert!((agent.completeness(env.free_cell_count()) - 1.0).abs() < f64::EPSILON);
        assert!(agent.active_path().is_empty());
    }

    #[test]
    fn unreachable_pocket_is_not_visited() {
        // (0,0) is sealed off by (1,0) and (0,1).
        let obstacles = [Cell::new(1, 0), Cell::new(0, 1)];
        let env = Arc::new(GridEnvironment::new(3, obstacles).unwrap());
        let mut agent = ExploringBacktrackAgent::new(env, Cell::new(2, 2)).unwrap();
        agent.run_until_done(None);

        assert_eq!(agent.visited().len(), 6);
        assert!(!agent.visited().contains(&Cell::new(0, 0)));
        assert_eq!(agent.status(), AgentStatus::Explored);
    }

    #[test]
    fn isolated_start_finishes_on_first_step() {
        let obstacles = [Cell::new(1, 0), Cell::new(0, 1)];
        let env = Arc::new(GridEnvironment::new(2, obstacles).unwrap());
        let mut agent = ExploringBacktrackAgent::new(env, Cell::new(0, 0)).unwrap();
        assert!(!agent.step());
        assert_eq!(agent.closed(), &[Cell::new(0, 0)]);
        assert_eq!(agent.metrics().steps, 0);
    }
}
