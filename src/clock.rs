//! Time sources for the driver
//!
//! The driver never calls `Instant::now()` itself; it asks a `Clock`, so tests
//! and headless runs can step time by hand.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time elapsed since some fixed origin
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock time, measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock
///
/// Clones share the same time, so a test can keep a handle while the driver
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Fixed-period trigger tracking its next deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTimer {
    period: Duration,
    next_due: Duration,
}

impl PeriodicTimer {
    /// First firing is one full period after `start`
    pub fn new(period: Duration, start: Duration) -> Self {
        // A zero period would fire forever within one pump
        let period = period.max(Duration::from_millis(1));
        Self {
            period,
            next_due: start + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn next_due(&self) -> Duration {
        self.next_due
    }

    pub fn is_due(&self, now: Duration) -> bool {
        self.next_due <= now
    }

    /// Consume one firing and schedule the next
    pub fn fire(&mut self) {
        self.next_due += self.period;
    }

    /// Restart the schedule from `now`, discarding any backlog
    pub fn rebase(&mut self, now: Duration) {
        self.next_due = now + self.period;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), Duration::from_millis(250));
        clock.set(Duration::from_secs(3));
        assert_eq!(handle.now(), Duration::from_secs(3));
    }

    #[test]
    fn test_periodic_timer() {
        let mut timer = PeriodicTimer::new(Duration::from_millis(100), Duration::ZERO);
        assert!(!timer.is_due(Duration::from_millis(99)));
        assert!(timer.is_due(Duration::from_millis(100)));
        timer.fire();
        assert_eq!(timer.next_due(), Duration::from_millis(200));

        timer.rebase(Duration::from_millis(1000));
        assert_eq!(timer.next_due(), Duration::from_millis(1100));
    }

    #[test]
    fn test_zero_period_clamped() {
        let timer = PeriodicTimer::new(Duration::ZERO, Duration::ZERO);
        assert_eq!(timer.period(), Duration::from_millis(1));
    }
}
