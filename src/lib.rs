//! Grid exploration and pathfinding agents.
//!
//! A [`GridEnvironment`](grid::GridEnvironment) describes a bounded grid with
//! static obstacles and optional terrain costs. Five agent strategies step
//! over it through the common [`Agent`](agents::Agent) interface: a reactive
//! wall sweeper, a depth-first explorer, a breadth-first searcher, a
//! plan-then-walk Dijkstra agent and a greedy cost-plus-heuristic walker.

pub mod agents;
pub mod baseline;
pub mod config;
pub mod error;
pub mod frontier;
pub mod grid;
pub mod path;
pub mod render;
pub mod simulation;
pub mod statistics;

pub use error::{GridError, Result};
pub use grid::{Cell, Direction, GridEnvironment};
