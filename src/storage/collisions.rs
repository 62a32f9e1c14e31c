use std::sync::atomic::{AtomicU64, Ordering};

/// An approximate count of the lost compare-and-swap attempts on the iterate.
///
/// Recording is a plain read followed by a conditional write, not an atomic
/// increment. Two threads recording at the same time may read the same value
/// and both write it back plus one, losing one of the increments. The count is
/// therefore a lower bound on the real amount of collisions, never an
/// overcount. Writing through `fetch_max` keeps it from ever going backwards.
#[derive(Debug, Default)]
pub struct CollisionCounter(AtomicU64);

impl CollisionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one collision, possibly losing it to a concurrent record.
    #[inline]
    pub fn record(&self) {
        let seen = self.0.load(Ordering::Relaxed);
        self.0.fetch_max(seen + 1, Ordering::Relaxed);
    }

    /// Returns the current lower bound.
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn serial_records_are_exact() {
        let counter = CollisionCounter::new();
        (0..10).for_each(|_| counter.record());

        assert_eq!(counter.get(), 10);
    }

    #[test]
    fn concurrent_records_never_overcount() {
        const THREADS: usize = 8;
        const RECORDS: u64 = 10_000;

        let counter = CollisionCounter::new();

        thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| (0..RECORDS).for_each(|_| counter.record()));
            }

            let mut last = 0;
            for _ in 0..1000 {
                let now = counter.get();
                assert!(now >= last, "counter went backwards: {last} -> {now}");
                last = now;
            }
        });

        let total = counter.get();
        assert!(total >= RECORDS);
        assert!(total <= THREADS as u64 * RECORDS);
    }
}
