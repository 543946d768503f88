//! Hazard Snake - a snake game on a toroidal grid
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world state, tick, obstacle spawner, input)
//! - `driver`: Single-threaded scheduler feeding ticks, spawns and input into the world
//! - `clock`: Injectable time sources for the driver
//! - `term`: Terminal front end (drawing and key mapping)
//! - `settings`: Run configuration

pub mod clock;
pub mod driver;
pub mod settings;
pub mod sim;
pub mod term;

pub use driver::{Driver, FrameReport};
pub use settings::Settings;
pub use sim::SpawnPolicy;

use glam::IVec2;

/// A grid cell (x, y)
pub type Cell = IVec2;

/// Game configuration constants
pub mod consts {
    /// Grid dimensions (fixed by design)
    pub const GRID_WIDTH: i32 = 30;
    pub const GRID_HEIGHT: i32 = 20;

    /// Default simulation tick period
    pub const TICK_PERIOD_MS: u64 = 100;
    /// Default obstacle spawn period
    pub const OBSTACLE_PERIOD_MS: u64 = 10_000;
    /// Maximum periodic events fired per pump to prevent spiral of death
    pub const MAX_CATCH_UP: u32 = 8;

    /// Points for eating food
    pub const FOOD_SCORE: i64 = 1;
    /// Points lost when the head lands on an obstacle
    pub const OBSTACLE_PENALTY: i64 = 5;
}

/// Wrap a cell onto the toroidal grid
#[inline]
pub fn wrap_cell(cell: Cell) -> Cell {
    use consts::{GRID_HEIGHT, GRID_WIDTH};
    IVec2::new(cell.x.rem_euclid(GRID_WIDTH), cell.y.rem_euclid(GRID_HEIGHT))
}

/// Whether a cell lies inside the grid
#[inline]
pub fn in_bounds(cell: Cell) -> bool {
    use consts::{GRID_HEIGHT, GRID_WIDTH};
    (0..GRID_WIDTH).contains(&cell.x) && (0..GRID_HEIGHT).contains(&cell.y)
}

/// Center cell of the grid, where a new snake starts
#[inline]
pub fn grid_center() -> Cell {
    IVec2::new(consts::GRID_WIDTH / 2, consts::GRID_HEIGHT / 2)
}

/// Uniformly random cell anywhere on the grid
pub fn random_cell<R: rand::Rng + ?Sized>(rng: &mut R) -> Cell {
    IVec2::new(
        rng.random_range(0..consts::GRID_WIDTH),
        rng.random_range(0..consts::GRID_HEIGHT),
    )
}
