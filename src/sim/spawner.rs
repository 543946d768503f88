//! Periodic obstacle spawner

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState};
use crate::random_cell;

/// Whether obstacles keep appearing after the run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Spawn on every firing, game over or not
    #[default]
    Always,
    /// Skip firings while the run is over
    WhileRunning,
}

impl SpawnPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnPolicy::Always => "always",
            SpawnPolicy::WhileRunning => "while-running",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "always" => Some(SpawnPolicy::Always),
            "while-running" | "while_running" | "running" => Some(SpawnPolicy::WhileRunning),
            _ => None,
        }
    }
}

/// Drop one obstacle on a uniformly random cell
///
/// Occupied cells are not excluded: the obstacle may land on the snake, the
/// food or another obstacle. Returns `None` when the policy skipped this
/// firing, in which case no randomness is drawn.
pub fn spawn_obstacle<R: Rng + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    policy: SpawnPolicy,
) -> Option<GameEvent> {
    if policy == SpawnPolicy::WhileRunning && state.is_game_over() {
        return None;
    }

    let at = random_cell(rng);
    state.obstacles.push(at);
    Some(GameEvent::ObstacleSpawned { at })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_bounds;
    use crate::sim::state::RunState;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_adds_exactly_one() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut state = GameState::new(&mut rng);

        for n in 1..=50 {
            let event = spawn_obstacle(&mut state, &mut rng, SpawnPolicy::Always);
            assert_eq!(state.obstacles.len(), n);
            let Some(GameEvent::ObstacleSpawned { at }) = event else {
                panic!("expected a spawn event, got {event:?}");
            };
            assert_eq!(state.obstacles.last(), Some(&at));
            assert!(in_bounds(at));
        }
    }

    #[test]
    fn test_spawn_policy_after_game_over() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut state = GameState::new(&mut rng);
        state.run_state = RunState::GameOver;

        assert!(spawn_obstacle(&mut state, &mut rng, SpawnPolicy::WhileRunning).is_none());
        assert!(state.obstacles.is_empty());

        assert!(spawn_obstacle(&mut state, &mut rng, SpawnPolicy::Always).is_some());
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_spawn_policy_parse() {
        assert_eq!(SpawnPolicy::from_str("Always"), Some(SpawnPolicy::Always));
        assert_eq!(
            SpawnPolicy::from_str("while-running"),
            Some(SpawnPolicy::WhileRunning)
        );
        assert_eq!(SpawnPolicy::from_str("never"), None);
        assert_eq!(SpawnPolicy::default(), SpawnPolicy::Always);
    }
}
