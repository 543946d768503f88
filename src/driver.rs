//! Single-threaded game driver
//!
//! Owns the world, the RNG and an input queue, and turns the clock into two
//! periodic triggers: the simulation tick and the obstacle spawn. Every
//! mutation goes through `pump`, so ticks, spawns and input never overlap.

use std::collections::VecDeque;
use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::clock::{Clock, ManualClock, PeriodicTimer};
use crate::consts::MAX_CATCH_UP;
use crate::settings::Settings;
use crate::sim::{
    Command, GameEvent, GameState, Snapshot, SpawnPolicy, apply_command, choose_direction,
    spawn_obstacle, tick,
};

/// What happened during one `pump`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Simulation ticks fired
    pub ticks: u32,
    /// Spawner firings (including ones the policy skipped)
    pub spawns: u32,
    /// Queued commands that took effect
    pub commands_applied: u32,
    /// Events in the order they happened
    pub events: Vec<GameEvent>,
}

impl FrameReport {
    pub fn is_empty(&self) -> bool {
        self.ticks == 0 && self.spawns == 0 && self.commands_applied == 0
    }
}

/// Game driver
pub struct Driver<C: Clock> {
    state: GameState,
    rng: Pcg32,
    seed: u64,
    clock: C,
    inputs: VecDeque<Command>,
    tick_timer: PeriodicTimer,
    spawn_timer: PeriodicTimer,
    spawn_policy: SpawnPolicy,
    autopilot: bool,
    paused: bool,
}

impl<C: Clock> Driver<C> {
    pub fn new(settings: &Settings, clock: C) -> Self {
        let seed = settings.resolve_seed();
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(&mut rng);
        let now = clock.now();

        log::info!(
            "Game initialized with seed: {} (tick {:?}, obstacles every {:?}, spawn policy {})",
            seed,
            settings.tick_period(),
            settings.obstacle_period(),
            settings.spawn_policy.as_str()
        );

        Self {
            state,
            rng,
            seed,
            clock,
            inputs: VecDeque::new(),
            tick_timer: PeriodicTimer::new(settings.tick_period(), now),
            spawn_timer: PeriodicTimer::new(settings.obstacle_period(), now),
            spawn_policy: settings.spawn_policy,
            autopilot: settings.autopilot,
            paused: false,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, on: bool) {
        if self.autopilot != on {
            log::info!("Idle mode: {}", on);
        }
        self.autopilot = on;
    }

    /// Queue a command; it is applied at the start of the next pump
    pub fn push_command(&mut self, command: Command) {
        self.inputs.push_back(command);
    }

    /// Pause or resume the periodic triggers
    ///
    /// Resuming restarts both schedules from the current time so the paused
    /// span is not replayed as a burst of ticks.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if self.paused {
            log::info!("Paused");
        } else {
            let now = self.clock.now();
            self.tick_timer.rebase(now);
            self.spawn_timer.rebase(now);
            log::info!("Resumed");
        }
    }

    /// Time left until the next periodic event (zero if one is already due)
    pub fn time_until_next(&self) -> Duration {
        let next = self.tick_timer.next_due().min(self.spawn_timer.next_due());
        next.saturating_sub(self.clock.now())
    }

    /// Apply queued input, then fire every periodic event that is due
    pub fn pump(&mut self) -> FrameReport {
        let mut report = FrameReport::default();

        while let Some(command) = self.inputs.pop_front() {
            if apply_command(&mut self.state, command, &mut self.rng) {
                report.commands_applied += 1;
                if command == Command::Restart {
                    log::info!("Game restarted");
                }
            } else {
                log::trace!("Ignored {:?}", command);
            }
        }

        if self.paused {
            return report;
        }

        let now = self.clock.now();
        let mut fired = 0;
        loop {
            let tick_due = self.tick_timer.is_due(now);
            let spawn_due = self.spawn_timer.is_due(now);
            if !tick_due && !spawn_due {
                break;
            }

            if fired >= MAX_CATCH_UP {
                log::warn!("Falling behind; dropping backlog after {} events", fired);
                if tick_due {
                    self.tick_timer.rebase(now);
                }
                if spawn_due {
                    self.spawn_timer.rebase(now);
                }
                break;
            }

            // Earliest deadline first; a tick wins a tie with a spawn
            let tick_first = tick_due
                && (!spawn_due || self.tick_timer.next_due() <= self.spawn_timer.next_due());
            if tick_first {
                self.tick_timer.fire();
                self.run_tick(&mut report);
            } else {
                self.spawn_timer.fire();
                self.run_spawn(&mut report);
            }
            fired += 1;
        }

        report
    }

    fn run_tick(&mut self, report: &mut FrameReport) {
        if self.autopilot {
            if self.state.is_game_over() {
                log::info!("Idle mode restarting after score {}", self.state.score);
                self.state.reset(&mut self.rng);
            } else if let Some(dir) = choose_direction(&self.state) {
                self.state.set_direction(dir);
            }
        }

        let events = tick(&mut self.state, &mut self.rng);
        report.ticks += 1;

        for event in &events {
            match event {
                GameEvent::AteFood { at, new_food } => {
                    log::debug!("Ate food at {}; next food at {}", at, new_food)
                }
                GameEvent::HitObstacle { at } => log::debug!("Hit obstacle at {}", at),
                GameEvent::SelfCollision { at } => log::info!(
                    "Game over at {} after {} ticks, score {}",
                    at,
                    self.state.time_ticks,
                    self.state.score
                ),
                GameEvent::ObstacleSpawned { .. } => {}
            }
        }
        report.events.extend(events);
    }

    fn run_spawn(&mut self, report: &mut FrameReport) {
        report.spawns += 1;
        match spawn_obstacle(&mut self.state, &mut self.rng, self.spawn_policy) {
            Some(event) => {
                log::debug!("{:?} ({} obstacles)", event, self.state.obstacles.len());
                report.events.push(event);
            }
            None => log::trace!("Spawn skipped while game over"),
        }
    }
}

impl Driver<ManualClock> {
    /// Run a game without a terminal for exactly `ticks` tick periods
    ///
    /// Obstacles spawn on their own period along the way. Identical settings
    /// (including the seed) always give the same final snapshot.
    pub fn run_headless(settings: &Settings, ticks: u64) -> Self {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let mut driver = Driver::new(settings, clock);

        for _ in 0..ticks {
            handle.advance(settings.tick_period());
            driver.pump();
        }

        driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Direction, RunState};
    use glam::IVec2;

    fn settings(tick_ms: u64, obstacle_ms: u64) -> Settings {
        Settings {
            tick_period_ms: tick_ms,
            obstacle_period_ms: obstacle_ms,
            seed: Some(12345),
            ..Default::default()
        }
    }

    fn driver(tick_ms: u64, obstacle_ms: u64) -> (Driver<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let handle = clock.clone();
        (Driver::new(&settings(tick_ms, obstacle_ms), clock), handle)
    }

    #[test]
    fn test_nothing_fires_before_first_period() {
        let (mut driver, clock) = driver(100, 10_000);
        clock.advance(Duration::from_millis(99));
        assert!(driver.pump().is_empty());
        assert_eq!(driver.state().time_ticks, 0);
        assert_eq!(driver.time_until_next(), Duration::from_millis(1));
    }

    #[test]
    fn test_tick_fires_on_period() {
        let (mut driver, clock) = driver(100, 10_000);
        clock.advance(Duration::from_millis(100));
        let report = driver.pump();
        assert_eq!(report.ticks, 1);
        assert_eq!(report.spawns, 0);
        assert_eq!(driver.state().head(), IVec2::new(16, 10));
    }

    #[test]
    fn test_input_applied_before_tick() {
        let (mut driver, clock) = driver(100, 10_000);
        driver.push_command(Command::Turn(Direction::Down));
        clock.advance(Duration::from_millis(100));
        let report = driver.pump();
        assert_eq!(report.commands_applied, 1);
        assert_eq!(driver.state().head(), IVec2::new(15, 11));
    }

    #[test]
    fn test_last_accepted_input_wins() {
        let (mut driver, _clock) = driver(100, 10_000);
        driver.push_command(Command::Turn(Direction::Up));
        driver.push_command(Command::Turn(Direction::Down));
        let report = driver.pump();
        assert_eq!(report.commands_applied, 1);
        assert_eq!(driver.state().direction, Direction::Up);

        driver.push_command(Command::Turn(Direction::Left));
        driver.push_command(Command::Turn(Direction::Down));
        driver.pump();
        assert_eq!(driver.state().direction, Direction::Down);
    }

    #[test]
    fn test_spawner_runs_on_its_own_period() {
        let (mut driver, clock) = driver(60_000, 1_000);
        clock.advance(Duration::from_millis(1_000));
        let report = driver.pump();
        assert_eq!(report.spawns, 1);
        assert_eq!(report.ticks, 0);
        assert_eq!(driver.state().obstacles.len(), 1);

        clock.advance(Duration::from_millis(3_000));
        let report = driver.pump();
        assert_eq!(report.spawns, 3);
        assert_eq!(driver.state().obstacles.len(), 4);
    }

    #[test]
    fn test_tick_and_spawn_same_deadline() {
        let (mut driver, clock) = driver(100, 100);
        // Food on the next head cell so the tick leaves its own event
        driver.state_mut().food = IVec2::new(16, 10);
        clock.advance(Duration::from_millis(100));
        let report = driver.pump();
        assert_eq!(report.ticks, 1);
        assert_eq!(report.spawns, 1);
        assert!(matches!(
            report.events.as_slice(),
            [
                GameEvent::AteFood { at, .. },
                GameEvent::ObstacleSpawned { .. }
            ] if *at == IVec2::new(16, 10)
        ));
        assert_eq!(driver.state().obstacles.len(), 1);
        assert_eq!(driver.state().score, 1);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let (mut driver, clock) = driver(10, 60_000);
        clock.advance(Duration::from_secs(1));
        let report = driver.pump();
        assert_eq!(report.ticks, MAX_CATCH_UP);

        // Backlog was dropped, not deferred
        assert!(driver.pump().is_empty());
        clock.advance(Duration::from_millis(10));
        assert_eq!(driver.pump().ticks, 1);
    }

    #[test]
    fn test_pause_holds_time() {
        let (mut driver, clock) = driver(100, 1_000);
        driver.toggle_pause();
        assert!(driver.is_paused());
        clock.advance(Duration::from_secs(5));
        assert!(driver.pump().is_empty());

        driver.toggle_pause();
        assert!(driver.pump().is_empty());
        clock.advance(Duration::from_millis(100));
        let report = driver.pump();
        assert_eq!(report.ticks, 1);
        assert_eq!(report.spawns, 0);
    }

    #[test]
    fn test_restart_through_queue() {
        let (mut driver, clock) = driver(100, 10_000);
        driver.push_command(Command::Restart);
        assert_eq!(driver.pump().commands_applied, 0);

        // Set up an immediate self-collision
        let state = driver.state_mut();
        state.snake = VecDeque::from([
            IVec2::new(5, 5),
            IVec2::new(6, 5),
            IVec2::new(6, 4),
            IVec2::new(5, 4),
            IVec2::new(4, 4),
        ]);
        state.direction = Direction::Up;
        state.food = IVec2::new(0, 0);
        clock.advance(Duration::from_millis(100));
        let report = driver.pump();
        assert!(
            report
                .events
                .contains(&GameEvent::SelfCollision { at: IVec2::new(5, 4) })
        );
        assert_eq!(driver.state().run_state, RunState::GameOver);

        driver.push_command(Command::Restart);
        assert_eq!(driver.pump().commands_applied, 1);
        assert_eq!(driver.state().run_state, RunState::Running);
        assert_eq!(driver.state().head(), IVec2::new(15, 10));
    }

    #[test]
    fn test_spawn_policy_while_running() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let settings = Settings {
            spawn_policy: SpawnPolicy::WhileRunning,
            ..settings(60_000, 1_000)
        };
        let mut driver = Driver::new(&settings, clock);
        driver.state_mut().run_state = RunState::GameOver;

        handle.advance(Duration::from_millis(2_000));
        let report = driver.pump();
        assert_eq!(report.spawns, 2);
        assert!(report.events.is_empty());
        assert!(driver.state().obstacles.is_empty());
    }

    #[test]
    fn test_autopilot_restarts() {
        let (mut driver, clock) = driver(100, 10_000);
        driver.set_autopilot(true);
        driver.state_mut().run_state = RunState::GameOver;
        driver.state_mut().score = 9;

        clock.advance(Duration::from_millis(100));
        driver.pump();
        assert_eq!(driver.state().run_state, RunState::Running);
        assert_eq!(driver.state().time_ticks, 1);
    }

    #[test]
    fn test_headless_is_deterministic() {
        let settings = Settings {
            autopilot: true,
            ..settings(100, 1_000)
        };
        let a = Driver::run_headless(&settings, 300);
        let b = Driver::run_headless(&settings, 300);
        assert_eq!(a.seed(), 12345);
        assert_eq!(a.snapshot(), b.snapshot());
        assert!(a.snapshot().time_ticks > 0);
    }
}
