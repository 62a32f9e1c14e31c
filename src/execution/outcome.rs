use std::time::Duration;

use super::Log;
use crate::instrumentation::{TimerStats, WorkerStats};

/// Everything a finished run hands over to the result writers.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The iterate the run started from.
    pub initial: Vec<f64>,
    /// The iterate once every worker was joined.
    pub iterate: Vec<f64>,
    pub log: Log,
    /// One entry per worker, ordered by worker id.
    pub workers: Vec<WorkerStats>,
    /// A lower bound on the lost compare-and-swap attempts.
    pub collisions: u64,
    pub wall_time: Duration,
    /// The amount of updates actually performed, across all threads.
    pub iterations: usize,
}

impl RunOutcome {
    /// The gradient phase stats of all workers merged.
    pub fn gradient_stats(&self) -> TimerStats {
        self.merged(|w| &w.gradient)
    }

    /// The update phase stats of all workers merged.
    pub fn update_stats(&self) -> TimerStats {
        self.merged(|w| &w.update)
    }

    fn merged<F>(&self, phase: F) -> TimerStats
    where
        F: Fn(&WorkerStats) -> &TimerStats,
    {
        self.workers.iter().fold(TimerStats::default(), |mut acc, w| {
            acc.merge(phase(w));
            acc
        })
    }
}
