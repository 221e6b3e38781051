//! Reference answers computed with the `pathfinding` crate, used to grade a run.

use crate::grid::{Cell, GridEnvironment};
use pathfinding::prelude::{bfs, bfs_reach, dijkstra};

/// Fewest moves from `start` to `goal`, `None` when unreachable.
pub fn shortest_path_len(env: &GridEnvironment, start: Cell, goal: Cell) -> Option<usize> {
    bfs(&start, |c: &Cell| env.neighbors(*c), |c| *c == goal).map(|path| path.len() - 1)
}

/// Minimum entered-cell cost from `start` to `goal`, `None` when unreachable.
pub fn min_path_cost(env: &GridEnvironment, start: Cell, goal: Cell) -> Option<u64> {
    dijkstra(
        &start,
        |c: &Cell| env.neighbors(*c).map(|n| (n, u64::from(env.cost(n)))),
        |c| *c == goal,
    )
    .map(|(_, cost)| cost)
}

/// Number of free cells in the connected component containing `start`.
pub fn reachable_cells(env: &GridEnvironment, start: Cell) -> usize {
    if !env.is_free(start) {
        return 0;
    }
    bfs_reach(start, |c: &Cell| env.neighbors(*c)).count()
}
