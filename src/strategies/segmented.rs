use parking_lot::Mutex;

use super::{UpdateCtx, UpdateStrategy, WorkerState};
use crate::problem::Gradient;

/// Partitions the coordinates into one contiguous segment per thread, each
/// guarded by its own lock.
///
/// Gradients are computed without locking, only the writes to a segment are
/// serialized, so threads touching disjoint segments never wait on each other.
#[derive(Debug)]
pub struct Segmented {
    segment_size: usize,
    segments: Box<[Mutex<()>]>,
}

impl Segmented {
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    fn segment_of(&self, index: usize) -> usize {
        index / self.segment_size
    }
}

impl UpdateStrategy for Segmented {
    const NAME: &'static str = "segmented";

    fn init(num_features: usize, num_threads: usize) -> Self {
        let segment_size = num_features.div_ceil(num_threads.max(1)).max(1);
        let num_segments = num_features.div_ceil(segment_size);

        Self {
            segment_size,
            segments: (0..num_segments).map(|_| Mutex::new(())).collect(),
        }
    }

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
        let mut rest = worker.scratch.entries();

        // Lock once per run of consecutive entries falling in the same segment.
        while let Some(first) = rest.first() {
            let segment = self.segment_of(first.index);
            let end = rest
                .iter()
                .position(|e| self.segment_of(e.index) != segment)
                .unwrap_or(rest.len());

            let (run, tail) = rest.split_at(end);
            let _guard = self.segments[segment].lock();

            for e in run {
                iterate.store(e.index, iterate.get(e.index) - step * e.value);
            }

            rest = tail;
        }
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
    fn segments_cover_every_coordinate() {
        let segmented = Segmented::init(10, 3);

        assert_eq!(segmented.segment_size, 4);
        assert_eq!(segmented.num_segments(), 3);
        assert_eq!(segmented.segment_of(9), 2);
    }

    #[test]
    fn more_threads_than_features() {
        let segmented = Segmented::init(2, 8);

        assert_eq!(segmented.segment_size, 1);
        assert_eq!(segmented.num_segments(), 2);
    }

    #[test]
    fn no_features_no_segments() {
        assert_eq!(Segmented::init(0, 4).num_segments(), 0);
    }

    #[test]
    fn locked_segments_lose_no_updates() {
        const THREADS: usize = 4;
        const UPDATES: usize = 2_000;
        const FEATURES: usize = 8;

        // Every sample touches every segment, with a label far enough that each
        // update adds almost exactly 2 to every coordinate.
        let x = SparseVector::from_pairs((0..FEATURES).map(|i| (i, 1.)));
        let dataset = Dataset::new(vec![x], vec![1e12], FEATURES).unwrap();
        let problem = Problem::new(LinearRegression, 1e-12, THREADS * UPDATES, 1).unwrap();
        let iterate = SharedIterate::zeros(FEATURES).unwrap();
        let segmented = Segmented::init(FEATURES, THREADS);

        let ctx = UpdateCtx {
            iterate: &iterate,
            dataset: &dataset,
            problem: &problem,
        };

        thread::scope(|s| {
            for id in 0..THREADS {
                let segmented = &segmented;
                s.spawn(move || {
                    let mut worker = WorkerState::new(id, 0, FEATURES, None).unwrap();
                    (0..UPDATES).for_each(|_| segmented.update(&mut worker, ctx));
                });
            }
        });

        let expected = (2 * THREADS * UPDATES) as f64;
        for w in iterate.to_vec().unwrap() {
            assert!((w - expected).abs() < 1.);
        }
        assert_eq!(iterate.collisions(), 0);
    }
}
