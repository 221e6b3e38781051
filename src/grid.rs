use crate::error::{GridError, Result};
use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

/// Cost reported for obstacle and out-of-bounds cells.
pub const INFINITE_COST: u32 = u32::MAX;

/// A discrete grid coordinate. `y` grows northwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// The orthogonally adjacent cell in `direction`, which may lie off the grid.
    pub fn step(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.offset();
        Cell::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn is_adjacent(self, other: Cell) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell::new(x, y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four orthogonal moves, in the canonical order every agent enumerates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Terrain classes used by random cost generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain {
    Normal,
    Sandy,
    Rocky,
}

impl Terrain {
    pub fn cost(self) -> u32 {
        match self {
            Terrain::Normal => 1,
            Terrain::Sandy => 2,
            Terrain::Rocky => 3,
        }
    }

    /// Draws a terrain class: 60% normal, 30% sandy, 10% rocky.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f64 = rng.gen();
        if roll < 0.6 {
            Terrain::Normal
        } else if roll < 0.9 {
            Terrain::Sandy
        } else {
            Terrain::Rocky
        }
    }
}

/// Bounded square grid with static obstacles and optional per-cell costs.
///
/// Read-only once built; agents share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct GridEnvironment {
    size: i32,
    obstacles: FxHashSet<Cell>,
    terrain: Option<FxHashMap<Cell, u32>>,
}

impl GridEnvironment {
    /// Creates a `size` x `size` grid. Obstacles outside the bounds are dropped.
    pub fn new<I>(size: usize, obstacles: I) -> Result<Self>
    where
        I: IntoIterator<Item = Cell>,
    {
        let size = match i32::try_from(size) {
            Ok(size) if size > 0 => size,
            _ => return Err(GridError::InvalidSize(size)),
        };

        let obstacles = obstacles
            .into_iter()
            .filter(|c| c.x >= 0 && c.x < size && c.y >= 0 && c.y < size)
            .collect();

        Ok(GridEnvironment {
            size,
            obstacles,
            terrain: None,
        })
    }

    /// Attaches an explicit cost table. Free cells absent from `terrain` cost 1;
    /// entries for blocked cells are discarded. Costs must lie in
    /// `1..INFINITE_COST`.
    pub fn with_terrain(mut self, terrain: FxHashMap<Cell, u32>) -> Result<Self> {
        let mut table = FxHashMap::default();
        for (cell, cost) in terrain {
            if !self.is_free(cell) {
                continue;
            }
            if cost == 0 || cost == INFINITE_COST {
                return Err(GridError::InvalidCost { cell, cost });
            }
            table.insert(cell, cost);
        }
        self.terrain = Some(table);
        Ok(self)
    }

    /// Assigns a random terrain class to every free cell.
    pub fn with_random_terrain<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        let table = self
            .free_cells()
            .map(|cell| (cell, Terrain::sample(rng).cost()))
            .collect();
        self.terrain = Some(table);
        self
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.size && cell.y >= 0 && cell.y < self.size
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.is_obstacle(cell)
    }

    /// Cost of entering `cell`; [`INFINITE_COST`] when it is not free.
    pub fn cost(&self, cell: Cell) -> u32 {
        if !self.is_free(cell) {
            return INFINITE_COST;
        }
        self.terrain
            .as_ref()
            .and_then(|t| t.get(&cell).copied())
            .unwrap_or(1)
    }

    /// The attached cost table, if any.
    pub fn terrain(&self) -> Option<&FxHashMap<Cell, u32>> {
        self.terrain.as_ref()
    }

    pub fn has_terrain(&self) -> bool {
        self.terrain.is_some()
    }

    /// The terrain cost of a free cell when a cost model is attached.
    pub fn terrain_cost(&self, cell: Cell) -> Option<u32> {
        if self.terrain.is_some() && self.is_free(cell) {
            Some(self.cost(cell))
        } else {
            None
        }
    }

    /// Free orthogonal neighbours of `cell` in [`Direction::ALL`] order.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |d| cell.step(d))
            .filter(move |&n| self.is_free(n))
    }

    pub fn obstacles(&self) -> &FxHashSet<Cell> {
        &self.obstacles
    }

    /// Free cells in row-major order, bottom row first.
    pub fn free_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size)
            .flat_map(move |y| (0..self.size).map(move |x| Cell::new(x, y)))
            .filter(move |&c| !self.is_obstacle(c))
    }

    pub fn free_cell_count(&self) -> usize {
        let total = (self.size as usize) * (self.size as usize);
        total - self.obstacles.len()
    }

    /// Rejects a start or goal cell that is not free.
    pub fn ensure_free(&self, cell: Cell, role: &'static str) -> Result<()> {
        if self.is_free(cell) {
            Ok(())
        } else {
            Err(GridError::CellNotFree { role, cell })
        }
    }
}
