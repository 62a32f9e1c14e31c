use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use super::{UpdateCtx, UpdateStrategy, WorkerState};
use crate::{problem::Gradient, storage::SharedIterate};

/// Hogwild with a single hot shared counter: every update bumps a global update
/// count and decays its step size with it, `step / (1 + k / num_features)`.
#[derive(Debug)]
pub struct Shared {
    updates: AtomicU64,
    decay: f64,
}

impl Shared {
    /// The step size of the `k`-th update, counting from zero.
    #[inline]
    fn decayed(&self, step: f64, k: u64) -> f64 {
        step / (1. + self.decay * k as f64)
    }
}

impl UpdateStrategy for Shared {
    const NAME: &'static str = "shared";

    fn init(num_features: usize, _num_threads: usize) -> Self {
        Self {
            updates: AtomicU64::new(0),
            decay: 1. / num_features.max(1) as f64,
        }
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

        worker.update_timer.start();
        let k = self.updates.fetch_add(1, Ordering::Relaxed);
        let step = self.decayed(problem.step_size(), k);

        for e in &worker.scratch {
            iterate.apply(e.index, step * e.value);
        }
        worker.update_timer.pause();
    }

    fn deinit(self, _iterate: &SharedIterate) {
        debug!(updates = self.updates.into_inner(); "shared counter released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{Dataset, SparseVector},
        problem::{LinearRegression, Problem},
    };

    #[test]
    fn step_decays_with_the_update_count() {
        let shared = Shared::init(4, 1);

        assert_eq!(shared.decayed(1., 0), 1.);
        assert_eq!(shared.decayed(1., 4), 0.5);
    }

    #[test]
    fn every_update_is_counted() {
        let dataset = Dataset::new(vec![SparseVector::from_pairs([(0, 1.)])], vec![-1.], 1).unwrap();
        let problem = Problem::new(LinearRegression, 0.1, 3, 1).unwrap();
        let iterate = SharedIterate::zeros(1).unwrap();
        let shared = Shared::init(1, 1);
        let mut worker = WorkerState::new(0, 0, 1, None).unwrap();

        let ctx = UpdateCtx {
            iterate: &iterate,
            dataset: &dataset,
            problem: &problem,
        };

        (0..3).for_each(|_| shared.update(&mut worker, ctx));

        assert_eq!(shared.updates.load(Ordering::Relaxed), 3);
        assert!(iterate.get(0) < 0.);
    }
}
