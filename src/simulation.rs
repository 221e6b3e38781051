use crate::agents::{
    Agent, AgentStatus, CostAwareDijkstraAgent, ExploringBacktrackAgent, GreedyUtilityAgent,
    ReactiveSweepAgent, ShortestPathBFSAgent,
};
use crate::baseline;
use crate::config::{AgentKind, Config};
use crate::error::{GridError, Result};
use crate::grid::{Cell, GridEnvironment};
use crate::render::render;
use crate::statistics::Statistics;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// A generated layout: obstacles, start, goal and optional terrain costs.
///
/// Everything is drawn from one seeded RNG so the same seed reproduces the
/// same scenario for every agent.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub grid_size: usize,
    pub start: Cell,
    pub goal: Cell,
    pub obstacles: FxHashSet<Cell>,
    pub terrain: Option<FxHashMap<Cell, u32>>,
    pub seed: u64,
}

impl Scenario {
    pub fn generate(config: &Config, seed: Option<u64>) -> Result<Self> {
        let size = config.grid_size;
        if size == 0 || i32::try_from(size).is_err() {
            return Err(GridError::InvalidSize(size));
        }
        let capacity = size * size;
        // start and goal need two distinct free cells
        if config.num_obstacles + 2 > capacity {
            return Err(GridError::TooManyObstacles {
                requested: config.num_obstacles,
                capacity: capacity.saturating_sub(2),
            });
        }

        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);

        let obstacles: FxHashSet<Cell> =
            rand::seq::index::sample(&mut rng, capacity, config.num_obstacles)
                .into_iter()
                .map(|i| Cell::new((i % size) as i32, (i / size) as i32))
                .collect();

        let env = GridEnvironment::new(size, obstacles.iter().copied())?;
        let start = random_free_cell(&mut rng, &env, None)?;
        let goal = random_free_cell(&mut rng, &env, Some(start))?;

        let terrain = if config.uniform_terrain {
            None
        } else {
            env.with_random_terrain(&mut rng).terrain().cloned()
        };

        info!(
            "generated scenario: {}x{} grid, {} obstacles, start {}, goal {}, seed {}",
            size,
            size,
            obstacles.len(),
            start,
            goal,
            seed
        );

        Ok(Scenario {
            grid_size: size,
            start,
            goal,
            obstacles,
            terrain,
            seed,
        })
    }

    /// The environment `kind` runs in. The sweep agent only models the outer
    /// walls, so it gets an obstacle-free grid; only cost-aware agents see terrain.
    pub fn environment(&self, kind: AgentKind) -> Result<GridEnvironment> {
        if kind == AgentKind::Sweep {
            return GridEnvironment::new(self.grid_size, []);
        }
        let env = GridEnvironment::new(self.grid_size, self.obstacles.iter().copied())?;
        match (&self.terrain, kind.is_cost_aware()) {
            (Some(terrain), true) => env.with_terrain(terrain.clone()),
            _ => Ok(env),
        }
    }
}

fn random_free_cell(
    rng: &mut StdRng,
    env: &GridEnvironment,
    exclude: Option<Cell>,
) -> Result<Cell> {
    let candidates: Vec<Cell> = env.free_cells().filter(|&c| Some(c) != exclude).collect();
    candidates.choose(rng).copied().ok_or(GridError::NoFreeCell)
}

/// Instantiates the agent for `kind`. The greedy walker gets `step_limit`
/// as its move budget since it has no termination guarantee of its own.
pub fn build_agent(
    kind: AgentKind,
    env: Arc<GridEnvironment>,
    start: Cell,
    goal: Cell,
    step_limit: usize,
) -> Result<Box<dyn Agent>> {
    let agent: Box<dyn Agent> = match kind {
        AgentKind::Sweep => Box::new(ReactiveSweepAgent::new(env, start)?),
        AgentKind::Explore => Box::new(ExploringBacktrackAgent::new(env, start)?),
        AgentKind::Bfs => Box::new(ShortestPathBFSAgent::new(env, start, goal)?),
        AgentKind::Dijkstra => Box::new(CostAwareDijkstraAgent::new(env, start, goal)?),
        AgentKind::Greedy => {
            Box::new(GreedyUtilityAgent::new(env, start, goal)?.with_step_limit(step_limit))
        }
    };
    Ok(agent)
}

/// Drives one agent over one scenario.
pub struct Simulation {
    config: Config,
    kind: AgentKind,
    scenario: Scenario,
    env: Arc<GridEnvironment>,
    agent: Box<dyn Agent>,
}

impl Simulation {
    pub fn new(config: Config) -> Result<Self> {
        let scenario = Scenario::generate(&config, config.seed)?;
        let kind = config.agent;
        Self::with_scenario(config, kind, scenario)
    }

    pub fn with_scenario(config: Config, kind: AgentKind, scenario: Scenario) -> Result<Self> {
        let env = Arc::new(scenario.environment(kind)?);
        let agent = build_agent(
            kind,
            Arc::clone(&env),
            scenario.start,
            scenario.goal,
            config.step_limit(),
        )?;
        Ok(Simulation {
            config,
            kind,
            scenario,
            env,
            agent,
        })
    }

    pub fn agent(&self) -> &dyn Agent {
        self.agent.as_ref()
    }

    pub fn environment(&self) -> &GridEnvironment {
        &self.env
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    fn visualize(&self) -> bool {
        !self.config.no_visualization && !self.config.quiet
    }

    /// Steps the agent until it stops or the configured step limit runs out.
    pub fn run(&mut self) -> Statistics {
        let limit = self.config.step_limit();
        let delay = Duration::from_millis(self.config.delay_ms);

        if self.visualize() {
            self.draw(0);
            thread::sleep(delay);
        }

        let mut calls = 0;
        loop {
            if calls >= limit {
                warn!(
                    "{}: stopped after {} steps without terminating",
                    self.kind, limit
                );
                break;
            }
            calls += 1;
            let more = self.agent.step();
            if self.visualize() {
                self.draw(calls);
                thread::sleep(delay);
            }
            if !more {
                break;
            }
        }

        let mut stats = self.report();
        if !stats.status.is_terminal() {
            stats.status = AgentStatus::StepLimit;
        }
        info!(
            "{}: {} after {} steps at {}",
            self.kind,
            stats.status,
            stats.metrics.steps,
            self.agent.position()
        );
        stats
    }

    /// Statistics for the agent's current state, graded against the baseline.
    pub fn report(&self) -> Statistics {
        let mut stats = Statistics::new(self.agent.name(), self.agent.status(), self.agent.metrics());
        stats.num_obstacles = self.env.obstacles().len();
        stats.reachable_cells = baseline::reachable_cells(&self.env, self.scenario.start);
        if self.agent.goal().is_some() {
            stats.optimal_path_length =
                baseline::shortest_path_len(&self.env, self.scenario.start, self.scenario.goal);
            if self.kind.is_cost_aware() {
                stats.optimal_cost =
                    baseline::min_path_cost(&self.env, self.scenario.start, self.scenario.goal);
            }
        }
        stats.calculate_efficiency();
        stats
    }

    fn draw(&self, step: usize) {
        // clear screen, cursor home
        print!("\x1B[2J\x1B[1;1H");
        println!("=== GRID AGENT SIMULATION ===");
        println!(
            "Agent: {} | Step: {} | Status: {}",
            self.kind,
            step,
            self.agent.status()
        );
        println!(
            "Position: {} | Start: {} | Goal: {}",
            self.agent.position(),
            self.scenario.start,
            self.scenario.goal
        );
        print!("{}", render(&self.env, &self.agent.view()));
    }

    /// Runs every strategy on one shared scenario.
    pub fn run_all_agents(config: Config) -> Result<Vec<Statistics>> {
        let scenario = Scenario::generate(&config, config.seed)?;
        info!(
            "comparing {} agents on seed {}",
            AgentKind::ALL.len(),
            scenario.seed
        );

        let mut results = Vec::with_capacity(AgentKind::ALL.len());
        for kind in AgentKind::ALL {
            let mut agent_config = config.clone();
            agent_config.agent = kind;
            agent_config.no_visualization = true;

            let mut simulation = Simulation::with_scenario(agent_config, kind, scenario.clone())?;
            results.push(simulation.run());
        }
        Ok(results)
    }

    /// Prints a comparison table of the given results.
    pub fn print_comparison_results(results: &[Statistics]) {
        println!("\n=== AGENT COMPARISON RESULTS ===\n");
        println!(
            "{:<10} {:<14} {:<7} {:<10} {:<9} {:<8} {:<8} {:<8} {:<10}",
            "Agent", "Outcome", "Steps", "Redundant", "Visited", "Path", "Optimal", "Cost", "Efficiency"
        );
        println!("{}", "-".repeat(92));

        for result in results {
            let optimal = result
                .optimal_path_length
                .map_or_else(|| "-".to_string(), |v| v.to_string());
            let cost = result
                .metrics
                .total_cost
                .map_or_else(|| "-".to_string(), |v| v.to_string());
            println!(
                "{:<10} {:<14} {:<7} {:<10} {:<9} {:<8} {:<8} {:<8} {:<10.3}",
                result.agent,
                result.status.label(),
                result.metrics.steps,
                result.metrics.redundant_steps,
                result.metrics.visited,
                result.metrics.path_length,
                optimal,
                cost,
                result.route_efficiency
            );
        }

        let goal_seekers: Vec<_> = results
            .iter()
            .filter(|r| r.optimal_path_length.is_some() && r.status.is_success())
            .collect();
        if let Some(best) = goal_seekers.iter().min_by_key(|r| r.metrics.path_length) {
            println!();
            println!(
                "Shortest route: {} ({} moves)",
                best.agent, best.metrics.path_length
            );
        }
        if let Some(cheapest) = goal_seekers
            .iter()
            .filter(|r| r.metrics.total_cost.is_some())
            .min_by_key(|r| r.metrics.total_cost)
        {
            println!(
                "Cheapest route: {} (cost {})",
                cheapest.agent,
                cheapest.metrics.total_cost.unwrap_or_default()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config(seed: u64) -> Config {
        Config {
            grid_size: 6,
            num_obstacles: 5,
            no_visualization: true,
            quiet: true,
            seed: Some(seed),
            ..Config::default()
        }
    }

    #[test]
    fn same_seed_same_scenario() {
        let config = quiet_config(11);
        let a = Scenario::generate(&config, config.seed).unwrap();
        let b = Scenario::generate(&config, config.seed).unwrap();
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!((a.start, a.goal), (b.start, b.goal));
        assert_eq!(a.terrain, b.terrain);
    }

    #[test]
    fn scenario_places_free_distinct_endpoints() {
        for seed in 0..20 {
            let scenario = Scenario::generate(&quiet_config(seed), Some(seed)).unwrap();
            assert_eq!(scenario.obstacles.len(), 5);
            assert_ne!(scenario.start, scenario.goal);
            assert!(!scenario.obstacles.contains(&scenario.start));
            assert!(!scenario.obstacles.contains(&scenario.goal));
        }
    }

    #[test]
    fn too_many_obstacles_is_rejected() {
        let config = Config {
            grid_size: 2,
            num_obstacles: 3,
            ..quiet_config(1)
        };
        assert_eq!(
            Scenario::generate(&config, Some(1)).unwrap_err(),
            GridError::TooManyObstacles {
                requested: 3,
                capacity: 2
            }
        );
    }

    #[test]
    fn scenario_terrain_covers_free_cells() {
        let scenario = Scenario::generate(&quiet_config(9), Some(9)).unwrap();
        let terrain = scenario.terrain.as_ref().unwrap();
        assert_eq!(terrain.len(), 6 * 6 - 5);
        assert!(terrain.keys().all(|c| !scenario.obstacles.contains(c)));
        assert!(terrain.values().all(|cost| (1..=3).contains(cost)));

        let uniform = Config {
            uniform_terrain: true,
            ..quiet_config(9)
        };
        let plain = Scenario::generate(&uniform, Some(9)).unwrap();
        assert!(plain.terrain.is_none());
        assert_eq!((plain.start, plain.goal), (scenario.start, scenario.goal));
    }

    #[test]
    fn terrain_only_reaches_cost_aware_agents() {
        let scenario = Scenario::generate(&quiet_config(3), Some(3)).unwrap();
        assert!(scenario.environment(AgentKind::Dijkstra).unwrap().has_terrain());
        assert!(!scenario.environment(AgentKind::Bfs).unwrap().has_terrain());
        let sweep_env = scenario.environment(AgentKind::Sweep).unwrap();
        assert!(sweep_env.obstacles().is_empty());
    }

    #[test]
    fn bfs_run_matches_baseline() {
        for seed in 0..10 {
            let config = Config {
                agent: AgentKind::Bfs,
                ..quiet_config(seed)
            };
            let mut sim = Simulation::new(config).unwrap();
            let stats = sim.run();
            match stats.optimal_path_length {
                Some(optimal) => {
                    assert_eq!(stats.status, AgentStatus::GoalReached);
                    assert_eq!(stats.metrics.path_length, optimal);
                }
                None => assert_eq!(stats.status, AgentStatus::NoPath),
            }
        }
    }

    #[test]
    fn comparison_runs_every_agent() {
        let results = Simulation::run_all_agents(quiet_config(5)).unwrap();
        let names: Vec<_> = results.iter().map(|r| r.agent).collect();
        assert_eq!(names, vec!["sweep", "explore", "bfs", "dijkstra", "greedy"]);
        assert!(results.iter().all(|r| r.status.is_terminal()));
    }
}
