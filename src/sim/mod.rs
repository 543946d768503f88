//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, passed in by the caller
//! - No clocks, rendering or terminal dependencies

pub mod autopilot;
pub mod input;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autopilot::{choose_direction, toroidal_distance};
pub use input::{Command, apply_command};
pub use spawner::{SpawnPolicy, spawn_obstacle};
pub use state::{Direction, GameEvent, GameState, RunState, Snapshot};
pub use tick::tick;
