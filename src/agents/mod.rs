//! Agent strategies sharing one [`GridEnvironment`](crate::grid::GridEnvironment).

pub mod bfs;
pub mod common;
pub mod dijkstra;
pub mod explorer;
pub mod greedy;
pub mod sweep;

pub use bfs::ShortestPathBFSAgent;
pub use common::{Agent, AgentMetrics, AgentStatus, AgentView};
pub use dijkstra::CostAwareDijkstraAgent;
pub use explorer::ExploringBacktrackAgent;
pub use greedy::GreedyUtilityAgent;
pub use sweep::ReactiveSweepAgent;
