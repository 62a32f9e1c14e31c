use std::time::Duration;

use super::{Clock, TimerStats};

/// Accumulates the time spent in one phase of a worker's update.
///
/// Owned by a single thread. A timer without a clock ignores every call,
/// letting the hot loop run uninstrumented.
#[derive(Debug)]
pub struct Timer {
    clock: Option<Clock>,
    started: Option<Duration>,
    stats: TimerStats,
}

impl Timer {
    /// Creates a new `Timer`.
    ///
    /// # Arguments
    /// * `clock` - What to measure with, `None` disables the timer.
    pub fn new(clock: Option<Clock>) -> Self {
        Self {
            clock,
            started: None,
            stats: TimerStats::default(),
        }
    }

    /// Starts measuring a new call of this phase.
    #[inline]
    pub fn start(&mut self) {
        if let Some(clock) = &self.clock {
            self.stats.count += 1;
            self.started = Some(clock.now());
        }
    }

    /// Keeps measuring the current call after a `pause`, without counting a new one.
    #[inline]
    pub fn resume(&mut self) {
        if let Some(clock) = &self.clock {
            self.started = Some(clock.now());
        }
    }

    /// Stops measuring and accumulates the elapsed time. A no-op if not running.
    #[inline]
    pub fn pause(&mut self) {
        if let (Some(clock), Some(started)) = (&self.clock, self.started.take()) {
            self.stats.total += clock.now().saturating_sub(started);
        }
    }

    pub fn stats(&self) -> TimerStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::instrumentation::ClockScope;

    #[test]
    fn accumulates_only_while_running() {
        let mut timer = Timer::new(Some(Clock::new(ClockScope::Wall)));

        timer.start();
        thread::sleep(Duration::from_millis(5));
        timer.pause();

        thread::sleep(Duration::from_millis(100));

        timer.resume();
        thread::sleep(Duration::from_millis(5));
        timer.pause();

        let stats = timer.stats();
        assert_eq!(stats.count, 1);
        assert!(stats.total >= Duration::from_millis(10));
        assert!(stats.total < Duration::from_millis(100));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn thread_scope_skips_blocked_time() {
        let mut timer = Timer::new(Some(Clock::new(ClockScope::Thread)));

        timer.start();
        thread::sleep(Duration::from_millis(50));
        timer.pause();

        let stats = timer.stats();
        assert_eq!(stats.count, 1);
        assert!(stats.total < Duration::from_millis(10));
    }

    #[test]
    fn pause_without_start_is_a_no_op() {
        let mut timer = Timer::new(Some(Clock::new(ClockScope::Wall)));
        timer.pause();

        assert_eq!(timer.stats(), TimerStats::default());
    }

    #[test]
    fn disabled_timer_measures_nothing() {
        let mut timer = Timer::new(None);

        timer.start();
        thread::sleep(Duration::from_millis(1));
        timer.pause();

        assert_eq!(timer.stats(), TimerStats::default());
    }
}
