//! Idle/demo mode - a simple AI that plays the game
//!
//! Greedy: head for the food along the shorter way around the torus, steer
//! clear of the body, and avoid obstacles when another move is as good.

use super::state::{Direction, GameState};
use crate::consts::{GRID_HEIGHT, GRID_WIDTH};
use crate::{Cell, wrap_cell};

/// Signed shortest offset from `from` to `to` on a ring of `size` cells
fn ring_offset(from: i32, to: i32, size: i32) -> i32 {
    let d = (to - from).rem_euclid(size);
    if d > size / 2 { d - size } else { d }
}

/// Manhattan distance on the torus
pub fn toroidal_distance(a: Cell, b: Cell) -> i32 {
    ring_offset(a.x, b.x, GRID_WIDTH).abs() + ring_offset(a.y, b.y, GRID_HEIGHT).abs()
}

/// Whether moving the head onto `next` this tick would end the run
fn is_fatal(state: &GameState, next: Cell) -> bool {
    let grows = next == state.food;
    let len = state.snake.len();
    // The tail moves out of the way unless the snake is about to grow
    let checked = if grows { len } else { len.saturating_sub(1) };
    state.snake.iter().take(checked).any(|&c| c == next)
}

/// Pick a heading for the next tick, or `None` once the run is over
pub fn choose_direction(state: &GameState) -> Option<Direction> {
    if !state.is_running() {
        return None;
    }

    let head = state.head();
    Direction::ALL
        .into_iter()
        .filter(|dir| !dir.is_opposite_of(state.direction))
        .min_by_key(|&dir| {
            let next = wrap_cell(head + dir.delta());
            (
                is_fatal(state, next),
                state.obstacles.contains(&next),
                toroidal_distance(next, state.food),
                dir != state.direction,
            )
        })
}
