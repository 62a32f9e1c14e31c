use parking_lot::Mutex;

use super::{UpdateCtx, UpdateStrategy, WorkerState};
use crate::problem::Gradient;

/// The fully locked baseline: a single lock serializes every gradient computation
/// together with its writes, so no update ever observes a torn iterate.
#[derive(Debug, Default)]
pub struct Naive {
    lock: Mutex<()>,
}

impl UpdateStrategy for Naive {
    const NAME: &'static str = "naive";

    fn init(_num_features: usize, _num_threads: usize) -> Self {
        Self::default()
    }

    fn update<G: Gradient>(&self, worker: &mut WorkerState, ctx: UpdateCtx<'_, G>) {
        let UpdateCtx {
            iterate,
            dataset,
            problem,
        } = ctx;

        let (x, y) = worker.draw(dataset);

        // Waiting on the lock is accounted as update time.
        worker.update_timer.start();
        let guard = self.lock.lock();
        worker.update_timer.pause();

        worker.gradient_timer.start();
        problem.gradient().gradient(iterate, x, y, &mut worker.scratch);
        worker.gradient_timer.pause();

        let step = problem.step_size();

        worker.update_timer.resume();
        for e in &worker.scratch {
            iterate.store(e.index, iterate.get(e.index) - step * e.value);
        }
        drop(guard);
        worker.update_timer.pause();
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::{
        data::{Dataset, SparseVector},
        problem::{LinearRegression, Problem},
        storage::SharedIterate,
    };

    #[test]
    fn serialized_updates_never_collide() {
        const THREADS: usize = 4;
        const UPDATES: usize = 2_000;

        // The label is far enough that every update adds almost exactly 2 to w0.
        let dataset = Dataset::new(vec![SparseVector::from_pairs([(0, 1.)])], vec![1e12], 1).unwrap();
        let problem = Problem::new(LinearRegression, 1e-12, THREADS * UPDATES, 1).unwrap();
        let iterate = SharedIterate::zeros(1).unwrap();
        let naive = Naive::init(1, THREADS);

        let ctx = UpdateCtx {
            iterate: &iterate,
            dataset: &dataset,
            problem: &problem,
        };

        thread::scope(|s| {
            for id in 0..THREADS {
                let naive = &naive;
                s.spawn(move || {
                    let mut worker = WorkerState::new(id, 0, 1, None).unwrap();
                    (0..UPDATES).for_each(|_| naive.update(&mut worker, ctx));
                });
            }
        });

        let expected = (2 * THREADS * UPDATES) as f64;
        assert_eq!(iterate.collisions(), 0);
        assert!((iterate.get(0) - expected).abs() < 1e-2);
    }
}
