//! ASCII rendering of an environment and an agent snapshot.

use crate::agents::AgentView;
use crate::grid::{Cell, GridEnvironment};
use rustc_hash::FxHashSet;

/// Draws the grid with the northern row on top.
///
/// `X` agent, `#` obstacle, `G` goal, `*` path, `-` closed, `o` visited,
/// `+` frontier. Cost-aware grids show the terrain digit for untouched cells,
/// plain grids show `.`.
pub fn render(env: &GridEnvironment, view: &AgentView<'_>) -> String {
    let size = env.size() as i32;
    let closed: FxHashSet<Cell> = view.closed.iter().copied().collect();
    let path: FxHashSet<Cell> = view.path.iter().copied().collect();
    let frontier: FxHashSet<Cell> = view.frontier.iter().copied().collect();
    let border = "-".repeat(env.size() * 2 + 3);

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    for y in (0..size).rev() {
        out.push('|');
        for x in 0..size {
            let cell = Cell::new(x, y);
            let symbol = if cell == view.position {
                'X'
            } else if env.is_obstacle(cell) {
                '#'
            } else if view.goal == Some(cell) {
                'G'
            } else if path.contains(&cell) {
                '*'
            } else if closed.contains(&cell) {
                '-'
            } else if frontier.contains(&cell) {
                '+'
            } else if view.is_visited(cell) {
                'o'
            } else {
                match env.terrain_cost(cell) {
                    Some(cost) => char::from_digit(cost.min(9), 10).unwrap_or('9'),
                    None => '.',
                }
            };
            out.push(' ');
            out.push(symbol);
        }
        out.push_str(" |\n");
    }
    out.push_str(&border);
    out.push('\n');

    out.push_str("Legend: X = agent, # = obstacle, G = goal, * = path, - = closed, o = visited, + = frontier");
    if env.has_terrain() {
        out.push_str(", 1 = normal, 2 = sandy, 3 = rocky");
    } else {
        out.push_str(", . = free");
    }
    out.push('\n');
    out
}
