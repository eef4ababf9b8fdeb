//! Keyboard focus navigation over the grid
//!
//! Focus is UI-local state: it is never persisted and never recorded in
//! history.

use crate::grid::GridSize;

/// Arrow-key direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Editor command bound to a key pressed while the grid has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKey {
    Undo,
    Redo,
    /// Toggle-paint the focused cell
    Paint,
    Move(Direction),
}

impl GridKey {
    /// Map a `KeyboardEvent`; `shortcut` is Ctrl or Cmd held
    pub fn from_event(key: &str, shortcut: bool, shift: bool) -> Option<Self> {
        match key {
            "z" | "Z" if shortcut && shift => Some(GridKey::Redo),
            "z" | "Z" if shortcut => Some(GridKey::Undo),
            "y" | "Y" if shortcut => Some(GridKey::Redo),
            _ if shortcut => None,
            "Enter" | " " => Some(GridKey::Paint),
            other => Direction::from_key(other).map(GridKey::Move),
        }
    }
}

/// Move one cell in `direction`, stopping at the grid edge
pub fn step(index: usize, direction: Direction, size: GridSize) -> usize {
    let dim = size.dim();
    let index = index.min(size.cell_count() - 1);
    let (row, col) = (index / dim, index % dim);
    let (row, col) = match direction {
        Direction::Up => (row.saturating_sub(1), col),
        Direction::Down => ((row + 1).min(dim - 1), col),
        Direction::Left => (row, col.saturating_sub(1)),
        Direction::Right => (row, (col + 1).min(dim - 1)),
    };
    row * dim + col
}
