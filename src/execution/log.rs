use std::time::Duration;

use crate::{
    error::{Error, Result},
    storage::SharedIterate,
};

/// A snapshot of the iterate taken at a global iteration checkpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// The global iteration count this snapshot was taken for.
    pub iteration: usize,
    /// The global iteration count published by the workers when the snapshot
    /// was taken, never below `iteration`. Updates are only counted once written,
    /// so the snapshot contains at least this many of them.
    pub observed: usize,
    /// Time since the run started.
    pub timestamp: Duration,
    pub iterate: Vec<f64>,
}

/// Fixed capacity, append only record of the iterate over time.
///
/// Snapshot buffers are allocated up front, so recording never allocates while
/// workers are running. Timestamps are strictly increasing.
#[derive(Debug, Clone, Default)]
pub struct Log {
    entries: Vec<LogEntry>,
    spare: Vec<Vec<f64>>,
}

impl Log {
    /// Creates a new `Log`, allocating every snapshot buffer.
    ///
    /// # Arguments
    /// * `capacity` - The maximum amount of entries.
    /// * `num_features` - The length of each snapshot.
    ///
    /// # Returns
    /// An `Allocation` error if the buffers can't be allocated.
    pub fn with_capacity(capacity: usize, num_features: usize) -> Result<Self> {
        let alloc_err = Error::alloc("log snapshots");

        let mut entries = Vec::new();
        entries.try_reserve_exact(capacity).map_err(alloc_err)?;

        let mut spare = Vec::new();
        spare.try_reserve_exact(capacity).map_err(alloc_err)?;

        for _ in 0..capacity {
            let mut buf = Vec::new();
            buf.try_reserve_exact(num_features).map_err(alloc_err)?;
            buf.resize(num_features, 0.);
            spare.push(buf);
        }

        Ok(Self { entries, spare })
    }

    /// Appends a snapshot of the iterate.
    ///
    /// If `timestamp` doesn't come strictly after the last entry's, it's bumped
    /// to one nanosecond after it.
    ///
    /// # Arguments
    /// * `iteration` - The checkpoint being recorded.
    /// * `observed` - The global iteration count seen when taking the snapshot.
    /// * `timestamp` - Time since the run started.
    /// * `iterate` - The iterate to copy, possibly torn.
    ///
    /// # Returns
    /// An `InvalidConfig` if the log is full, or a `DimensionMismatch` if the
    /// iterate's length differs from the one the log was created for.
    pub fn record(
        &mut self,
        iteration: usize,
        observed: usize,
        timestamp: Duration,
        iterate: &SharedIterate,
    ) -> Result<()> {
        let Some(mut buf) = self.spare.pop() else {
            return Err(Error::InvalidConfig(format!(
                "log is full, capacity is {}",
                self.entries.len()
            )));
        };

        iterate.snapshot_into(&mut buf)?;

        let timestamp = match self.entries.last() {
            Some(last) if timestamp <= last.timestamp => last.timestamp + Duration::from_nanos(1),
            _ => timestamp,
        };

        self.entries.push(LogEntry {
            iteration,
            observed: observed.max(iteration),
            timestamp,
            iterate: buf,
        });

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.len() + self.spare.len()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_until_full() {
        let iterate = SharedIterate::new(vec![1., 2.]).unwrap();
        let mut log = Log::with_capacity(2, 2).unwrap();

        log.record(1, 1, Duration::from_millis(1), &iterate).unwrap();
        iterate.store(0, 5.);
        log.record(2, 2, Duration::from_millis(2), &iterate).unwrap();

        assert!(log.record(3, 3, Duration::from_millis(3), &iterate).is_err());
        assert_eq!(log.len(), 2);
        assert_eq!(log.capacity(), 2);
        assert_eq!(log.entries()[0].iterate, [1., 2.]);
        assert_eq!(log.entries()[1].iterate, [5., 2.]);
    }

    #[test]
    fn observed_count_never_trails_the_checkpoint() {
        let iterate = SharedIterate::zeros(1).unwrap();
        let mut log = Log::with_capacity(2, 1).unwrap();

        log.record(10, 13, Duration::ZERO, &iterate).unwrap();
        log.record(20, 0, Duration::ZERO, &iterate).unwrap();

        assert_eq!(log.entries()[0].observed, 13);
        assert_eq!(log.entries()[1].observed, 20);
    }

    #[test]
    fn timestamps_are_strictly_increasing() {
        let iterate = SharedIterate::zeros(1).unwrap();
        let mut log = Log::with_capacity(3, 1).unwrap();
        let t = Duration::from_micros(10);

        log.record(1, 1, t, &iterate).unwrap();
        log.record(2, 2, t, &iterate).unwrap();
        log.record(3, 3, Duration::ZERO, &iterate).unwrap();

        let ts: Vec<_> = log.iter().map(|e| e.timestamp).collect();
        assert!(ts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn mismatched_iterate() {
        let mut log = Log::with_capacity(1, 3).unwrap();
        assert!(log.record(1, 1, Duration::ZERO, &SharedIterate::zeros(2).unwrap()).is_err());
    }
}
