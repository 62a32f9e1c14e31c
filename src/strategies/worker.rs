use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    data::{Dataset, SparseVector},
    error::Result,
    instrumentation::{Clock, Timer, WorkerStats},
};

/// The state a single worker thread owns exclusively during a run.
///
/// Never shared, so none of it needs synchronization.
#[derive(Debug)]
pub struct WorkerState {
    worker_id: usize,
    rng: StdRng,
    /// Scratch buffer for the sample's gradient, sized for the densest sample.
    pub scratch: SparseVector,
    pub gradient_timer: Timer,
    pub update_timer: Timer,
}

impl WorkerState {
    /// Creates a new `WorkerState`.
    ///
    /// # Arguments
    /// * `worker_id` - The thread's index, also offsets the seed.
    /// * `seed` - The run's seed, shared by all workers.
    /// * `max_sparsity` - The capacity of the gradient scratch buffer.
    /// * `clock` - What to time the gradient and update phases with, `None` to skip timing.
    ///
    /// # Returns
    /// An `Allocation` error if the scratch buffer can't be reserved.
    pub fn new(
        worker_id: usize,
        seed: u64,
        max_sparsity: usize,
        clock: Option<Clock>,
    ) -> Result<Self> {
        Ok(Self {
            worker_id,
            rng: StdRng::seed_from_u64(seed.wrapping_add(worker_id as u64)),
            scratch: SparseVector::try_with_capacity(max_sparsity)?,
            gradient_timer: Timer::new(clock),
            update_timer: Timer::new(clock),
        })
    }

    /// Draws a sample uniformly at random with this worker's own generator.
    ///
    /// # Panics
    /// If the dataset is empty.
    #[inline]
    pub fn draw<'d>(&mut self, dataset: &'d Dataset) -> (&'d SparseVector, f64) {
        let i = self.rng.random_range(0..dataset.num_samples());
        dataset.sample(i)
    }

    /// Consumes the state into the stats measured during the run.
    pub fn into_stats(self, iterations: usize) -> WorkerStats {
        WorkerStats {
            worker_id: self.worker_id,
            iterations,
            gradient: self.gradient_timer.stats(),
            update: self.update_timer.stats(),
        }
    }
}
