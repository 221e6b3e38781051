use crate::agents::{AgentMetrics, AgentStatus};
use std::fmt;

/// Summary of one agent run, graded against the `pathfinding` baseline.
#[derive(Debug, Clone)]
pub struct Statistics {
    pub agent: &'static str,
    pub status: AgentStatus,
    pub metrics: AgentMetrics,
    pub num_obstacles: usize,
    pub reachable_cells: usize,
    pub optimal_path_length: Option<usize>,
    pub optimal_cost: Option<u64>,
    pub route_efficiency: f64,
}

impl Statistics {
    pub fn new(agent: &'static str, status: AgentStatus, metrics: AgentMetrics) -> Self {
        Statistics {
            agent,
            status,
            metrics,
            num_obstacles: 0,
            reachable_cells: 0,
            optimal_path_length: None,
            optimal_cost: None,
            route_efficiency: 0.0,
        }
    }

    /// Route moves divided by the optimal number of moves; 0 when undefined.
    pub fn calculate_efficiency(&mut self) {
        self.route_efficiency = match self.optimal_path_length {
            Some(optimal) if optimal > 0 && self.metrics.path_length > 0 => {
                self.metrics.path_length as f64 / optimal as f64
            }
            _ => 0.0,
        };
    }

    /// Visited share of the start's connected component, as a percentage.
    pub fn completeness(&self) -> f64 {
        if self.reachable_cells == 0 {
            0.0
        } else {
            self.metrics.visited as f64 / self.reachable_cells as f64 * 100.0
        }
    }

    /// How much more the route cost than the optimum, when both are known.
    pub fn extra_cost(&self) -> Option<u64> {
        let optimal = self.optimal_cost?;
        self.metrics
            .total_cost
            .map(|cost| cost.saturating_sub(optimal))
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Agent: {}", self.agent)?;
        writeln!(f, "Outcome: {}", self.status)?;
        writeln!(f, "Total Steps: {}", self.metrics.steps)?;
        writeln!(f, "Redundant Steps: {}", self.metrics.redundant_steps)?;
        writeln!(f, "Cells Visited: {}", self.metrics.visited)?;
        if self.metrics.closed > 0 {
            writeln!(f, "Cells Closed: {}", self.metrics.closed)?;
        }
        writeln!(f, "Number of Obstacles: {}", self.num_obstacles)?;
        writeln!(f, "Reachable Cells: {}", self.reachable_cells)?;
        writeln!(f, "Exploration Completeness: {:.2}%", self.completeness())?;
        writeln!(f, "Path Length: {}", self.metrics.path_length)?;
        if let Some(optimal) = self.optimal_path_length {
            writeln!(f, "Optimal Path Length: {}", optimal)?;
        }
        if let Some(cost) = self.metrics.total_cost {
            writeln!(f, "Total Path Cost: {}", cost)?;
        }
        if let Some(optimal) = self.optimal_cost {
            writeln!(f, "Optimal Path Cost: {}", optimal)?;
        }
        if self.route_efficiency > 0.0 {
            writeln!(f, "Route Efficiency: {:.3}", self.route_efficiency)?;
        }
        if let Some(extra) = self.extra_cost().filter(|&extra| extra > 0) {
            writeln!(f, "Note: route cost {} more than the cheapest path", extra)?;
        }
        Ok(())
    }
}
