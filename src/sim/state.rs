//! Game state and core simulation types
//!
//! Everything a renderer or a headless run needs to observe lives here.

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Cell, grid_center, random_cell};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Snake is moving
    Running,
    /// Snake hit itself; only a restart leaves this state
    GameOver,
}

/// Heading of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn is_opposite_of(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Unit step on the grid (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
        }
    }

    /// Parse a direction from a loose text code ("left", "a", ...)
    ///
    /// Unknown codes yield `None` and are meant to be ignored by callers.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "left" | "a" => Some(Direction::Left),
            "right" | "d" => Some(Direction::Right),
            "up" | "w" => Some(Direction::Up),
            "down" | "s" => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Notable things that happened during a tick or spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Head entered the food cell; food moved to `new_food`
    AteFood { at: Cell, new_food: Cell },
    /// Head landed on an obstacle, which was removed
    HitObstacle { at: Cell },
    /// Head ran into the body; the run is over
    SelfCollision { at: Cell },
    /// A new obstacle appeared
    ObstacleSpawned { at: Cell },
}

/// Complete world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Snake cells, head first
    ///
    /// Never empty: construction starts it at one cell and a tick pushes the
    /// new head before it drops the tail. Code that replaces it must keep at
    /// least one cell, since `head()` indexes the front.
    pub snake: VecDeque<Cell>,
    /// Obstacle cells (duplicates allowed)
    pub obstacles: Vec<Cell>,
    /// Food cell
    pub food: Cell,
    /// Score (negative after enough obstacle hits)
    pub score: i64,
    /// Heading used by the next tick
    pub direction: Direction,
    /// Current phase
    pub run_state: RunState,
    /// Simulation ticks advanced in this run
    pub time_ticks: u64,
}

impl GameState {
    /// Create a fresh world, drawing the food position from `rng`
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut snake = VecDeque::with_capacity(16);
        snake.push_back(grid_center());

        Self {
            snake,
            obstacles: Vec::new(),
            food: random_cell(rng),
            score: 0,
            direction: Direction::Right,
            run_state: RunState::Running,
            time_ticks: 0,
        }
    }

    /// Throw the current run away and start over
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Self::new(rng);
    }

    /// Front cell of the snake (see the non-empty invariant on `snake`)
    pub fn head(&self) -> Cell {
        self.snake[0]
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.run_state == RunState::GameOver
    }

    /// Request a new heading
    ///
    /// Accepted only while running and when it does not reverse the snake.
    /// Returns whether the heading was stored.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if !self.is_running() || direction.is_opposite_of(self.direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Whether `cell` is part of the body behind the head
    pub fn body_contains(&self, cell: Cell) -> bool {
        self.snake.iter().skip(1).any(|&c| c == cell)
    }

    /// Read-only copy for renderers and headless output
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.snake.iter().copied().collect(),
            obstacles: self.obstacles.clone(),
            food: self.food,
            score: self.score,
            direction: self.direction,
            run_state: self.run_state,
            time_ticks: self.time_ticks,
        }
    }
}

/// Owned view of a world, consumed once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub snake: Vec<Cell>,
    pub obstacles: Vec<Cell>,
    pub food: Cell,
    pub score: i64,
    pub direction: Direction,
    pub run_state: RunState,
    pub time_ticks: u64,
}
