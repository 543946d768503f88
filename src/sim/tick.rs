//! Fixed-period simulation tick
//!
//! Advances the world by one step: move, eat or shrink the tail, resolve
//! obstacles, then check for self-collision.

use rand::Rng;

use super::state::{GameEvent, GameState, RunState};
use crate::consts::{FOOD_SCORE, OBSTACLE_PENALTY};
use crate::{random_cell, wrap_cell};

/// Advance the game state by one tick
///
/// Does nothing once the run is over. Randomness (new food placement) is
/// drawn only from `rng`, so a seeded generator makes runs reproducible.
pub fn tick<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.run_state == RunState::GameOver {
        return events;
    }

    state.time_ticks += 1;

    let new_head = wrap_cell(state.head() + state.direction.delta());
    state.snake.push_front(new_head);

    if new_head == state.food {
        state.score += FOOD_SCORE;
        state.food = random_cell(rng);
        events.push(GameEvent::AteFood {
            at: new_head,
            new_food: state.food,
        });
    } else {
        state.snake.pop_back();
    }

    // Only the first matching obstacle goes, even if duplicates share the cell
    if let Some(idx) = state.obstacles.iter().position(|&o| o == new_head) {
        state.obstacles.remove(idx);
        state.score -= OBSTACLE_PENALTY;
        events.push(GameEvent::HitObstacle { at: new_head });
    }

    if state.body_contains(new_head) {
        state.run_state = RunState::GameOver;
        events.push(GameEvent::SelfCollision { at: new_head });
    }

    events
}
