use std::sync::atomic::{AtomicUsize, Ordering};

/// A worker's completed iteration count, alone in its cache line.
///
/// Written only by its worker and read only by the orchestrating thread, so
/// publishing progress never contends with other workers. Reading a count also
/// makes visible every iterate write that happened before it was published.
#[derive(Debug, Default)]
#[repr(align(64))]
pub(super) struct Progress(AtomicUsize);

impl Progress {
    #[inline]
    pub fn publish(&self, done: usize) {
        self.0.store(done, Ordering::Release);
    }

    #[inline]
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }
}

/// Sums the progress of every worker.
pub(super) fn total(slots: &[Progress]) -> usize {
    slots.iter().map(Progress::get).sum()
}
