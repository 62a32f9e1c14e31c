/// The global iterations at which the iterate gets snapshotted.
///
/// Checkpoint `k`, for `1 <= k <= count`, is `ceil(k * total / count)`, the
/// last one always being the end of the run.
#[derive(Debug, Clone, Copy)]
pub(super) struct Checkpoints {
    total: usize,
    count: usize,
    taken: usize,
}

impl Checkpoints {
    /// Creates a new `Checkpoints` schedule.
    ///
    /// # Arguments
    /// * `total` - The amount of iterations of the whole run.
    /// * `count` - The amount of checkpoints, clamped to `total`.
    pub fn new(total: usize, count: usize) -> Self {
        Self {
            total,
            count: count.min(total),
            taken: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    /// The global iteration of the `k`-th checkpoint, 1-based.
    fn at(&self, k: usize) -> usize {
        let (k, total, count) = (k as u128, self.total as u128, self.count as u128);
        (k * total).div_ceil(count) as usize
    }

    /// Takes the next checkpoint if `done` iterations already reached it.
    pub fn take_due(&mut self, done: usize) -> Option<usize> {
        if self.taken == self.count {
            return None;
        }

        let next = self.at(self.taken + 1);
        if next > done {
            return None;
        }

        self.taken += 1;
        Some(next)
    }

    /// Takes the next checkpoint, reached or not.
    pub fn take_next(&mut self) -> Option<usize> {
        self.take_due(usize::MAX)
    }
}
