use crate::grid::Cell;
use rustc_hash::FxHashSet;
use std::fmt;

/// Where an agent is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentStatus {
    Running,
    /// The goal cell was reached.
    GoalReached,
    /// Nothing left to explore: every reachable cell or every wall was found.
    Explored,
    /// The search space was exhausted without reaching the goal.
    NoPath,
    /// A caller-imposed step limit ran out first.
    StepLimit,
    /// No move was available from the current cell.
    Stuck,
}

impl AgentStatus {
    pub fn is_terminal(self) -> bool {
        self != AgentStatus::Running
    }

    pub fn is_success(self) -> bool {
        matches!(self, AgentStatus::GoalReached | AgentStatus::Explored)
    }

    pub fn label(self) -> &'static str {
        match self {
            AgentStatus::Running => "running",
            AgentStatus::GoalReached => "goal reached",
            AgentStatus::Explored => "explored",
            AgentStatus::NoPath => "no path",
            AgentStatus::StepLimit => "step limit",
            AgentStatus::Stuck => "stuck",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Read-only snapshot of an agent's state for renderers.
#[derive(Debug, Clone)]
pub struct AgentView<'a> {
    pub position: Cell,
    pub goal: Option<Cell>,
    pub visited: Option<&'a FxHashSet<Cell>>,
    pub closed: &'a [Cell],
    pub path: &'a [Cell],
    pub frontier: Vec<Cell>,
}

impl<'a> AgentView<'a> {
    pub fn new(position: Cell) -> Self {
        AgentView {
            position,
            goal: None,
            visited: None,
            closed: &[],
            path: &[],
            frontier: Vec::new(),
        }
    }

    pub fn is_visited(&self, cell: Cell) -> bool {
        self.visited.is_some_and(|v| v.contains(&cell))
    }
}

/// Counters every agent reports once it stops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentMetrics {
    pub steps: usize,
    /// Moves onto cells already entered before (backtracking).
    pub redundant_steps: usize,
    pub visited: usize,
    pub closed: usize,
    /// Moves along the final or planned route.
    pub path_length: usize,
    pub total_cost: Option<u64>,
}

/// Common stepping interface shared by every strategy.
pub trait Agent {
    fn name(&self) -> &'static str;

    /// Performs one decision. Returns `true` while the agent wants to be
    /// called again; once it returns `false` the agent is terminal and
    /// further calls are no-ops.
    fn step(&mut self) -> bool;

    fn position(&self) -> Cell;

    fn status(&self) -> AgentStatus;

    fn view(&self) -> AgentView<'_>;

    fn metrics(&self) -> AgentMetrics;

    fn goal(&self) -> Option<Cell> {
        None
    }

    fn found_goal(&self) -> bool {
        self.status() == AgentStatus::GoalReached
    }

    /// Steps until the agent stops or `max_calls` invocations were made.
    /// Returns the number of `step` calls performed.
    fn run_until_done(&mut self, max_calls: Option<usize>) -> usize {
        let mut calls = 0;
        while max_calls.map_or(true, |max| calls < max) {
            calls += 1;
            if !self.step() {
                break;
            }
        }
        calls
    }
}
