use clap::{Parser, ValueEnum};
use std::fmt;

/// Which strategy the driver runs.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Sweep,
    Explore,
    Bfs,
    Dijkstra,
    Greedy,
}

impl AgentKind {
    /// Every strategy, in the order a comparison run uses.
    pub const ALL: [AgentKind; 5] = [
        AgentKind::Sweep,
        AgentKind::Explore,
        AgentKind::Bfs,
        AgentKind::Dijkstra,
        AgentKind::Greedy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AgentKind::Sweep => "sweep",
            AgentKind::Explore => "explore",
            AgentKind::Bfs => "bfs",
            AgentKind::Dijkstra => "dijkstra",
            AgentKind::Greedy => "greedy",
        }
    }

    /// Strategies that read terrain costs.
    pub fn is_cost_aware(self) -> bool {
        matches!(self, AgentKind::Dijkstra | AgentKind::Greedy)
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = 8)]
    pub grid_size: usize,

    #[arg(long, default_value_t = 10)]
    pub num_obstacles: usize,

    #[arg(long, value_enum, default_value_t = AgentKind::Bfs)]
    pub agent: AgentKind,

    /// Run every agent on the same scenario and compare them
    #[arg(long, default_value_t = false)]
    pub all: bool,

    #[arg(long, default_value_t = 200)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    /// Seed for obstacle, position and terrain generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Step cap for a single run (defaults to 4 * grid_size^2)
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Give every free cell cost 1 instead of random terrain
    #[arg(long, default_value_t = false)]
    pub uniform_terrain: bool,
}

impl Config {
    pub fn step_limit(&self) -> usize {
        self.max_steps
            .unwrap_or_else(|| self.grid_size.saturating_mul(self.grid_size).saturating_mul(4))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid_size: 8,
            num_obstacles: 10,
            agent: AgentKind::Bfs,
            all: false,
            delay_ms: 200,
            no_visualization: false,
            quiet: false,
            seed: None,
            max_steps: None,
            uniform_terrain: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let config = Config::try_parse_from([
            "grid_agents",
            "--grid-size",
            "5",
            "--agent",
            "dijkstra",
            "--seed",
            "42",
            "--no-visualization",
        ])
        .unwrap();
        assert_eq!(config.grid_size, 5);
        assert_eq!(config.agent, AgentKind::Dijkstra);
        assert_eq!(config.seed, Some(42));
        assert!(config.no_visualization);
        assert_eq!(config.step_limit(), 100);
    }

    #[test]
    fn defaults_match_cli_defaults() {
        let parsed = Config::try_parse_from(["grid_agents"]).unwrap();
        let default = Config::default();
        assert_eq!(parsed.grid_size, default.grid_size);
        assert_eq!(parsed.num_obstacles, default.num_obstacles);
        assert_eq!(parsed.agent, default.agent);
        assert_eq!(parsed.delay_ms, default.delay_ms);
    }

    #[test]
    fn rejects_unknown_agent() {
        assert!(Config::try_parse_from(["grid_agents", "--agent", "a_star"]).is_err());
    }

    #[test]
    fn comparison_flag() {
        let config = Config::try_parse_from(["grid_agents", "--all", "--uniform-terrain"]).unwrap();
        assert!(config.all);
        assert!(config.uniform_terrain);
        assert_eq!(AgentKind::ALL.len(), 5);
    }
}
