use super::{UpdateCtx, UpdateStrategy, WorkerState};
use crate::problem::Gradient;

/// No coordination whatsoever, not even compare-and-swap.
///
/// Each coordinate is read and then overwritten with its decremented value, a
/// concurrent write landing in between is silently lost. Nothing but the
/// worker's own state is involved, collisions aren't even detected.
#[derive(Debug, Default)]
pub struct Independent;

impl UpdateStrategy for Independent {
    const NAME: &'static str = "independent";

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
            iterate.store(e.index, iterate.get(e.index) - step * e.value);
        }
        worker.update_timer.pause();
    }
}
