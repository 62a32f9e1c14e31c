use std::time::Duration;

/// Elapsed time and amount of calls of one phase.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TimerStats {
    pub total: Duration,
    pub count: u64,
}

impl TimerStats {
    /// The mean elapsed time per call, zero if there were no calls.
    pub fn mean(&self) -> Duration {
        match u32::try_from(self.count) {
            Ok(0) => Duration::ZERO,
            Ok(count) => self.total / count,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.count as f64),
        }
    }

    pub fn merge(&mut self, other: &TimerStats) {
        self.total += other.total;
        self.count += other.count;
    }
}

/// Everything measured by a single worker thread during a run.
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    pub worker_id: usize,
    pub iterations: usize,
    /// Time spent computing gradients.
    pub gradient: TimerStats,
    /// Time spent writing gradients into the iterate, contention included.
    pub update: TimerStats,
}
