use crate::grid::Cell;
use rustc_hash::FxHashMap;

/// Parent pointers recorded during frontier expansion. The search root maps to `None`.
pub type Parents = FxHashMap<Cell, Option<Cell>>;

/// Walks `parents` back from `terminal` and returns the route root-first.
///
/// Stops at the first `None` parent or at a cell with no entry, so a map that
/// omits the root entirely still yields a path starting at the root.
pub fn reconstruct_path(parents: &Parents, terminal: Cell) -> Vec<Cell> {
    let mut path = vec![terminal];
    let mut current = terminal;
    while let Some(&Some(parent)) = parents.get(&current) {
        path.push(parent);
        current = parent;
        // A well-formed parent map is acyclic; bail out rather than spin on a bad one.
        if path.len() > parents.len() + 1 {
            break;
        }
    }
    path.reverse();
    path
}

/// Number of moves along `path`.
pub fn edge_count(path: &[Cell]) -> usize {
    path.len().saturating_sub(1)
}
