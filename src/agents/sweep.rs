use crate::agents::common::{Agent, AgentMetrics, AgentStatus, AgentView};
use crate::error::Result;
use crate::grid::{Cell, Direction, GridEnvironment};
use log::{debug, trace};
use std::sync::Arc;

/// Reactive wall finder: walks each direction of [`Direction::ALL`] in turn
/// until the next cell is blocked, then switches to the next direction.
///
/// Keeps no map of cells, so it never backtracks; it is done once the last
/// direction has collided.
pub struct ReactiveSweepAgent {
    env: Arc<GridEnvironment>,
    position: Cell,
    direction_index: usize,
    collided: Vec<Direction>,
    steps: usize,
    moves: usize,
    status: AgentStatus,
}

impl ReactiveSweepAgent {
    pub fn new(env: Arc<GridEnvironment>, start: Cell) -> Result<Self> {
        env.ensure_free(start, "start")?;
        Ok(ReactiveSweepAgent {
            env,
            position: start,
            direction_index: 0,
            collided: Vec::with_capacity(Direction::ALL.len()),
            steps: 0,
            moves: 0,
            status: AgentStatus::Running,
        })
    }

    /// The direction currently being walked, `None` once every wall was hit.
    pub fn current_direction(&self) -> Option<Direction> {
        Direction::ALL.get(self.direction_index).copied()
    }

    /// Directions whose wall has been hit, in collision order.
    pub fn collided_directions(&self) -> &[Direction] {
        &self.collided
    }

    pub fn has_collided(&self, direction: Direction) -> bool {
        self.collided.contains(&direction)
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn moves(&self) -> usize {
        self.moves
    }
}

impl Agent for ReactiveSweepAgent {
    fn name(&self) -> &'static str {
        "sweep"
    }

    fn step(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        let Some(direction) = self.current_direction() else {
            self.status = AgentStatus::Explored;
            return false;
        };

        self.steps += 1;
        let next = self.position.step(direction);
        if self.env.is_free(next) {
            self.position = next;
            self.moves += 1;
            trace!("sweep: moving {} to {}", direction, next);
            return true;
        }

        debug!("sweep: hit the {} wall at {}", direction, self.position);
        self.collided.push(direction);
        self.direction_index += 1;
        if self.direction_index >= Direction::ALL.len() {
            debug!("sweep: all walls found after {} steps", self.steps);
            self.status = AgentStatus::Explored;
            return false;
        }
        true
    }

    fn position(&self) -> Cell {
        self.position
    }

    fn status(&self) -> AgentStatus {
        self.status
    }

    fn view(&self) -> AgentView<'_> {
        AgentView::new(self.position)
    }

    fn metrics(&self) -> AgentMetrics {
        AgentMetrics {
            steps: self.steps,
            path_length: self.moves,
            ..AgentMetrics::default()
        }
    }
}
