use super::{UpdateCtx, UpdateStrategy, WorkerState};
use crate::problem::Gradient;

/// Lock-free updates: every gradient entry is applied to its coordinate with a
/// compare-and-swap retry loop, coordinates are never coordinated with each other.
#[derive(Debug, Default)]
pub struct Hogwild;

impl UpdateStrategy for Hogwild {
    const NAME: &'static str = "hogwild";

    fn init(_num_features: usize, _num_threads: usize) -> Self {
        Self
    }

    #[inline]
    fn update<G: Gradient>(&self, worker: &mut WorkerState, ctx: UpdateCtx<'_, G>) {
        let UpdateCtx {
            iterate,
            dataset,
            problem,
        } = ctx;

        let (x, y) = worker.draw(dataset);

        worker.gradient_timer.start();
        problem.gradient().gradient(iterate, x, y, &mut worker.scratch);
        worker.gradient_timer.pause();

        let step = problem.step_size();

        worker.update_timer.start();
        for e in &worker.scratch {
            iterate.apply(e.index, step * e.value);
        }
        worker.update_timer.pause();
    }
}
