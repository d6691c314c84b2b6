//! Movement Actions
//!
//! Cardinal directions on the grid.

use serde::{Deserialize, Serialize};

use crate::components::world::Position;

/// A one-cell step on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Offset applied to a position. North increases y.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// The cell one step away from `from`, which may lie off the grid.
    pub fn step_from(&self, from: Position) -> Position {
        let (dx, dy) = self.delta();
        Position::new(from.x + dx, from.y + dy)
    }
}
