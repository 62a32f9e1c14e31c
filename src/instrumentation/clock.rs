use std::time::{Duration, Instant};

use log::warn;
use serde::{Deserialize, Serialize};

/// What a `Clock` measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockScope {
    /// CPU time consumed by the calling thread. Time spent blocked or descheduled isn't counted.
    Thread,
    /// Elapsed wall time.
    Wall,
}

impl Default for ClockScope {
    fn default() -> Self {
        if cfg!(target_os = "linux") {
            Self::Thread
        } else {
            Self::Wall
        }
    }
}

/// A monotonic time source for phase timers.
///
/// A `Thread` clock reads the CPU time of whichever thread calls `now`, so it's
/// only meaningful when started and stopped on the same thread.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    scope: ClockScope,
    origin: Instant,
}

impl Clock {
    /// Creates a new `Clock`.
    ///
    /// Falls back to wall time when the platform has no per-thread CPU clock.
    pub fn new(scope: ClockScope) -> Self {
        let scope = match scope {
            ClockScope::Thread if thread_cpu_time().is_none() => {
                warn!("per-thread CPU clock unavailable, timing wall time instead");
                ClockScope::Wall
            }
            scope => scope,
        };

        Self {
            scope,
            origin: Instant::now(),
        }
    }

    pub fn scope(&self) -> ClockScope {
        self.scope
    }

    /// The current reading. Only differences between readings are meaningful.
    #[inline]
    pub fn now(&self) -> Duration {
        match self.scope {
            ClockScope::Thread => thread_cpu_time().unwrap_or_default(),
            ClockScope::Wall => self.origin.elapsed(),
        }
    }
}

#[cfg(target_os = "linux")]
fn thread_cpu_time() -> Option<Duration> {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };

    // SAFETY: `ts` is a valid, exclusively borrowed timespec for the duration of the call.
    let ret = unsafe { libc::clock_gettime(libc::CLOCK_THREAD_CPUTIME_ID, &mut ts) };
    if ret != 0 {
        return None;
    }

    Some(Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32))
}

#[cfg(not(target_os = "linux"))]
fn thread_cpu_time() -> Option<Duration> {
    None
}

#[cfg(test)]
mod tests {
    use std::{hint, thread};

    use super::*;

    #[test]
    fn wall_clock_counts_sleep() {
        let clock = Clock::new(ClockScope::Wall);

        let before = clock.now();
        thread::sleep(Duration::from_millis(20));

        assert!(clock.now() - before >= Duration::from_millis(20));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn thread_clock_ignores_sleep() {
        let clock = Clock::new(ClockScope::Thread);
        assert_eq!(clock.scope(), ClockScope::Thread);

        let before = clock.now();
        thread::sleep(Duration::from_millis(50));

        assert!(clock.now() - before < Duration::from_millis(10));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn thread_clock_counts_work() {
        let clock = Clock::new(ClockScope::Thread);

        let before = clock.now();
        let mut acc = 0u64;
        for i in 0..5_000_000u64 {
            acc = hint::black_box(acc.wrapping_mul(31).wrapping_add(i));
        }
        hint::black_box(acc);

        assert!(clock.now() > before);
    }

    #[cfg(not(target_os = "linux"))]
    #[test]
    fn thread_clock_falls_back_to_wall() {
        assert_eq!(Clock::new(ClockScope::Thread).scope(), ClockScope::Wall);
    }
}
