use super::types::{Cell, CollisionKind, Direction, Phase};

/// Read-only copy of the game handed to the presentation side after every change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    /// Head first.
    pub snake: Vec<Cell>,
    pub food: Option<Cell>,
    pub score: u32,
    pub phase: Phase,
    pub direction: Direction,
    pub tick: u64,
    pub grid_size: usize,
}

impl GameSnapshot {
    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOverNotification {
    pub score: u32,
    pub length: usize,
    pub reason: CollisionKind,
    pub ticks: u64,
}
