//! Error types for grid construction and agent setup.

use crate::grid::{Cell, INFINITE_COST};
use thiserror::Error;

/// Errors raised before any stepping takes place.
///
/// Running out of frontier or failing to reach a goal are not errors; agents
/// report those through [`AgentStatus`](crate::agents::AgentStatus).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid size must be between 1 and {max}, got {0}", max = i32::MAX)]
    InvalidSize(usize),

    #[error("{role} cell {cell} is not a free cell")]
    CellNotFree { role: &'static str, cell: Cell },

    #[error("terrain cost {cost} for {cell} must be between 1 and {max}", max = INFINITE_COST - 1)]
    InvalidCost { cell: Cell, cost: u32 },

    #[error("cannot place {requested} obstacles, only {capacity} cells available")]
    TooManyObstacles { requested: usize, capacity: usize },

    #[error("no free cell available for placement")]
    NoFreeCell,
}

pub type Result<T> = std::result::Result<T, GridError>;
