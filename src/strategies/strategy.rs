use super::WorkerState;
use crate::{data::Dataset, problem::Gradient, problem::Problem, storage::SharedIterate};

/// Everything a worker reads or writes during a single update, besides its own state.
pub struct UpdateCtx<'a, G: Gradient> {
    pub iterate: &'a SharedIterate,
    pub dataset: &'a Dataset,
    pub problem: &'a Problem<G>,
}

// Manual impls, `G` itself doesn't need to be `Copy` for the references to be.
impl<G: Gradient> Clone for UpdateCtx<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: Gradient> Copy for UpdateCtx<'_, G> {}

/// The per-sample update algorithm run by every worker.
///
/// An implementation may only read the dataset and mutate the iterate. Any other
/// shared state must be allocated in `init` and owned by the strategy itself.
pub trait UpdateStrategy: Sync + Sized {
    /// A short name, used for logging and result files.
    const NAME: &'static str;

    /// Allocates the strategy's shared state for a run.
    ///
    /// # Arguments
    /// * `num_features` - The length of the iterate.
    /// * `num_threads` - The amount of workers that will call `update`.
    fn init(num_features: usize, num_threads: usize) -> Self;

    /// Draws one sample and applies its gradient to the iterate.
    ///
    /// # Arguments
    /// * `worker` - The calling thread's exclusively owned state.
    /// * `ctx` - The shared iterate, dataset and problem.
    fn update<G: Gradient>(&self, worker: &mut WorkerState, ctx: UpdateCtx<'_, G>);

    /// Releases the strategy's shared state once every worker has finished.
    fn deinit(self, _iterate: &SharedIterate) {}
}
