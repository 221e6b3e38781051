use crate::agents::common::{Agent, AgentMetrics, AgentStatus, AgentView};
use crate::error::Result;
use crate::frontier::{Frontier, Queue};
use crate::grid::{Cell, GridEnvironment};
use crate::path::{edge_count, reconstruct_path, Parents};
use log::{debug, trace};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Breadth-first search towards a goal, one frontier pop per step.
///
/// A cell's parent is fixed the first time it is discovered, so the path
/// rebuilt on reaching the goal has the fewest possible moves.
pub struct ShortestPathBFSAgent {
    env: Arc<GridEnvironment>,
    goal: Cell,
    position: Cell,
    queue: Queue,
    visited: FxHashSet<Cell>,
    parents: Parents,
    path: Vec<Cell>,
    steps: usize,
    status: AgentStatus,
}

impl ShortestPathBFSAgent {
    pub fn new(env: Arc<GridEnvironment>, start: Cell, goal: Cell) -> Result<Self> {
        env.ensure_free(start, "start")?;
        env.ensure_free(goal, "goal")?;

        let mut queue = Queue::new();
        queue.push(start);
        let mut visited = FxHashSet::default();
        visited.insert(start);
        let mut parents = Parents::default();
        parents.insert(start, None);

        Ok(ShortestPathBFSAgent {
            env,
            goal,
            position: start,
            queue,
            visited,
            parents,
            path: Vec::new(),
            steps: 0,
            status: AgentStatus::Running,
        })
    }

    /// The shortest route, start first. Empty until the goal is reached.
    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    /// Moves along the shortest route, once found.
    pub fn path_length(&self) -> Option<usize> {
        self.found_goal().then(|| edge_count(&self.path))
    }

    pub fn visited(&self) -> &FxHashSet<Cell> {
        &self.visited
    }

    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl Agent for ShortestPathBFSAgent {
    fn name(&self) -> &'static str {
        "bfs"
    }

    fn step(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        let Some(current) = self.queue.pop() else {
            debug!("bfs: frontier exhausted, {} is unreachable", self.goal);
            self.status = AgentStatus::NoPath;
            return false;
        };
        self.position = current;
        self.steps += 1;

        if current == self.goal {
            self.path = reconstruct_path(&self.parents, current);
            debug!(
                "bfs: goal {} reached after {} expansions, path has {} moves",
                current,
                self.steps,
                edge_count(&self.path)
            );
            self.status = AgentStatus::GoalReached;
            return false;
        }

        for next in self.env.neighbors(current) {
            if self.visited.insert(next) {
                self.parents.insert(next, Some(current));
                self.queue.push(next);
                trace!("bfs: discovered {} from {}", next, current);
            }
        }
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
            frontier: self.queue.iter().copied().collect(),
            ..AgentView::new(self.position)
        }
    }

    fn metrics(&self) -> AgentMetrics {
        AgentMetrics {
            steps: self.steps,
            visited: self.visited.len(),
            path_length: edge_count(&self.path),
            ..AgentMetrics::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(size: usize, obstacles: &[Cell], start: Cell, goal: Cell) -> ShortestPathBFSAgent {
        let env = Arc::new(GridEnvironment::new(size, obstacles.iter().copied()).unwrap());
        ShortestPathBFSAgent::new(env, start, goal).unwrap()
    }

    #[test]
    fn expands_one_cell_per_step() {
        let mut bfs = agent(3, &[], Cell::new(0, 0), Cell::new(2, 2));
        assert!(bfs.step());
        assert_eq!(bfs.position(), Cell::new(0, 0));
        assert_eq!(bfs.view().frontier, vec![Cell::new(0, 1), Cell::new(1, 0)]);
        assert!(bfs.step());
        assert_eq!(bfs.position(), Cell::new(0, 1));
        assert!(bfs.path().is_empty());
    }

    #[test]
    fn finds_fewest_moves() {
        let mut bfs = agent(5, &[], Cell::new(0, 0), Cell::new(4, 4));
        bfs.run_until_done(None);
        assert!(bfs.found_goal());
        assert_eq!(bfs.path_length(), Some(8));
        assert_eq!(bfs.path().first(), Some(&Cell::new(0, 0)));
        assert_eq!(bfs.path().last(), Some(&Cell::new(4, 4)));
        assert!(bfs.path().windows(2).all(|w| w[0].is_adjacent(w[1])));
    }

    #[test]
    fn start_equal_to_goal_finishes_immediately() {
        let mut bfs = agent(3, &[], Cell::new(1, 1), Cell::new(1, 1));
        assert!(!bfs.step());
        assert_eq!(bfs.path(), &[Cell::new(1, 1)]);
        assert_eq!(bfs.path_length(), Some(0));
    }

    #[test]
    fn walled_off_goal_reports_no_path() {
        let wall = [Cell::new(1, 0), Cell::new(1, 1), Cell::new(1, 2)];
        let mut bfs = agent(3, &wall, Cell::new(0, 0), Cell::new(2, 2));
        bfs.run_until_done(None);
        assert_eq!(bfs.status(), AgentStatus::NoPath);
        assert!(!bfs.found_goal());
        assert_eq!(bfs.path_length(), None);
        assert_eq!(bfs.visited().len(), 3);
    }

    #[test]
    fn blocked_goal_is_rejected() {
        let env = Arc::new(GridEnvironment::new(3, [Cell::new(2, 2)]).unwrap());
        let err = ShortestPathBFSAgent::new(env, Cell::new(0, 0), Cell::new(2, 2))
            .err()
            .unwrap();
        assert_eq!(
            err,
            crate::error::GridError::CellNotFree {
                role: "goal",
                cell: Cell::new(2, 2)
            }
        );
    }
}
