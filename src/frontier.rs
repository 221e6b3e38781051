//! Containers holding discovered-but-unexpanded cells.
//!
//! Depth-first exploration uses a [`Stack`], breadth-first search a [`Queue`]
//! and Dijkstra a [`CostQueue`]. All three sit behind [`Frontier`] so the
//! agents only differ in expansion policy.

use crate::grid::Cell;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

pub trait Frontier {
    type Entry;

    fn push(&mut self, entry: Self::Entry);

    fn pop(&mut self) -> Option<Self::Entry>;

    /// The entry the next `pop` would return.
    fn peek(&self) -> Option<&Self::Entry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// LIFO frontier.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    cells: Vec<Cell>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bottom-to-top contents.
    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }
}

impl Frontier for Stack {
    type Entry = Cell;

    fn push(&mut self, entry: Cell) {
        self.cells.push(entry);
    }

    fn pop(&mut self) -> Option<Cell> {
        self.cells.pop()
    }

    fn peek(&self) -> Option<&Cell> {
        self.cells.last()
    }

    fn len(&self) -> usize {
        self.cells.len()
    }
}

/// FIFO frontier.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    cells: VecDeque<Cell>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Front-to-back contents.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }
}

impl Frontier for Queue {
    type Entry = Cell;

    fn push(&mut self, entry: Cell) {
        self.cells.push_back(entry);
    }

    fn pop(&mut self) -> Option<Cell> {
        self.cells.pop_front()
    }

    fn peek(&self) -> Option<&Cell> {
        self.cells.front()
    }

    fn len(&self) -> usize {
        self.cells.len()
    }
}

/// Min-priority frontier keyed by accumulated cost.
///
/// There is no decrease-key: a cell may be present several times and callers
/// discard stale entries on pop. Equal costs pop in ascending `Cell` order.
#[derive(Debug, Clone, Default)]
pub struct CostQueue {
    heap: BinaryHeap<Reverse<(u64, Cell)>>,
}

impl CostQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(u64, Cell)> + '_ {
        self.heap.iter().map(|Reverse(entry)| entry)
    }
}

impl Frontier for CostQueue {
    type Entry = (u64, Cell);

    fn push(&mut self, entry: (u64, Cell)) {
        self.heap.push(Reverse(entry));
    }

    fn pop(&mut self) -> Option<(u64, Cell)> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }

    fn peek(&self) -> Option<&(u64, Cell)> {
        self.heap.peek().map(|Reverse(entry)| entry)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}
