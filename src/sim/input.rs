//! Player commands: turning and restarting

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Direction, GameState};

/// A discrete command from the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Change heading (ignored if it would reverse the snake)
    Turn(Direction),
    /// Start a new run (only after game over)
    Restart,
}

impl Command {
    /// Map a loose text code to a command; unknown codes map to nothing
    ///
    /// This is the entry point for text-driven callers (scripts, embedding
    /// front ends). The terminal front end maps key events itself in
    /// `term::map_key` and does not go through here.
    pub fn from_code(code: &str) -> Option<Self> {
        if code.eq_ignore_ascii_case("r") || code.eq_ignore_ascii_case("restart") {
            return Some(Command::Restart);
        }
        Direction::from_code(code).map(Command::Turn)
    }
}

/// Apply a command to the world, returning whether it took effect
///
/// Rejected commands are silent no-ops: a turn while game over or into the
/// opposite heading, or a restart while the run is still going.
pub fn apply_command<R: Rng + ?Sized>(state: &mut GameState, command: Command, rng: &mut R) -> bool {
    match command {
        Command::Turn(direction) => state.set_direction(direction),
        Command::Restart => {
            if !state.is_game_over() {
                return false;
            }
            state.reset(rng);
            true
        }
    }
}
