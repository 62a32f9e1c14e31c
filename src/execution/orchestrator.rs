use std::{
    num::NonZeroUsize,
    thread::{self, ScopedJoinHandle},
    time::{Duration, Instant},
};

use log::{debug, info, warn};
use rand::Rng;

use super::{
    Log, RunOutcome,
    checkpoints::Checkpoints,
    progress::{self, Progress},
};
use crate::{
    data::Dataset,
    error::{Error, Result},
    instrumentation::{Clock, ClockScope, WorkerStats},
    problem::{Gradient, Problem},
    storage::SharedIterate,
    strategies::{UpdateCtx, UpdateStrategy, WorkerState},
};

/// How long the main thread sleeps between checkpoint polls.
const POLL_INTERVAL: Duration = Duration::from_micros(200);

/// Drives a complete optimization run: spawns the workers, records the log and
/// collects every worker's stats.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    num_threads: NonZeroUsize,
    seed: Option<u64>,
    track_phases: bool,
    clock: ClockScope,
}

impl Orchestrator {
    /// Creates a new `Orchestrator` with phase timing enabled and a random seed.
    ///
    /// # Arguments
    /// * `num_threads` - The amount of worker threads.
    pub fn new(num_threads: NonZeroUsize) -> Self {
        Self {
            num_threads,
            seed: None,
            track_phases: true,
            clock: ClockScope::default(),
        }
    }

    /// Fixes the seed every worker's generator is derived from.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets whether to time the gradient and update phases of every worker.
    pub fn track_phases(mut self, enabled: bool) -> Self {
        self.track_phases = enabled;
        self
    }

    /// Sets what the phase timers measure.
    pub fn clock(mut self, scope: ClockScope) -> Self {
        self.clock = scope;
        self
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads.get()
    }

    /// Runs `problem` over `dataset` from a zero iterate.
    ///
    /// # Returns
    /// The run's outcome or an error if encountered.
    pub fn run<G, S>(&self, problem: &Problem<G>, dataset: &Dataset) -> Result<RunOutcome>
    where
        G: Gradient,
        S: UpdateStrategy,
    {
        let iterate = SharedIterate::zeros(dataset.num_features())?;
        self.run_from::<G, S>(problem, dataset, iterate)
    }

    /// Runs `problem` over `dataset` starting at the given iterate.
    ///
    /// Each worker performs `num_total_iterations / num_threads` updates, so the
    /// budget is rounded down to a multiple of the amount of threads.
    ///
    /// # Arguments
    /// * `problem` - The gradient, step size and budgets of the run.
    /// * `dataset` - The samples to draw from.
    /// * `iterate` - The starting point, one coordinate per feature.
    ///
    /// # Returns
    /// The run's outcome, or an error if the iterate and dataset disagree in size,
    /// the dataset is empty, allocation or thread creation failed, or a worker panicked.
    pub fn run_from<G, S>(
        &self,
        problem: &Problem<G>,
        dataset: &Dataset,
        iterate: SharedIterate,
    ) -> Result<RunOutcome>
    where
        G: Gradient,
        S: UpdateStrategy,
    {
        if iterate.len() != dataset.num_features() {
            return Err(Error::DimensionMismatch {
                expected: dataset.num_features(),
                got: iterate.len(),
            });
        }

        let threads = self.num_threads.get();
        let per_thread = problem.num_total_iterations() / threads;
        let iterations = per_thread * threads;

        if iterations != problem.num_total_iterations() {
            warn!(
                requested = problem.num_total_iterations(),
                effective = iterations;
                "iteration budget rounded down to a multiple of {threads} threads"
            );
        }

        if iterations > 0 && dataset.is_empty() {
            return Err(Error::InvalidConfig(
                "can't draw samples from an empty dataset".into(),
            ));
        }

        let mut checkpoints = Checkpoints::new(iterations, problem.num_log_points());
        let mut log = Log::with_capacity(checkpoints.len(), iterate.len())?;
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());

        let clock = self.track_phases.then(|| Clock::new(self.clock));
        let states = (0..threads)
            .map(|worker_id| WorkerState::new(worker_id, seed, dataset.max_sparsity(), clock))
            .collect::<Result<Vec<_>>>()?;

        let initial = iterate.to_vec()?;
        let strategy = S::init(iterate.len(), threads);
        let progress: Vec<Progress> = (0..threads).map(|_| Progress::default()).collect();
        let ctx = UpdateCtx {
            iterate: &iterate,
            dataset,
            problem,
        };

        info!(
            threads = threads,
            iterations = iterations,
            features = iterate.len(),
            seed = seed;
            "starting {} run", S::NAME
        );

        let start = Instant::now();

        let workers = thread::scope(|s| {
            let mut handles = Vec::with_capacity(threads);
            let mut spawned = Ok(());

            for (worker_id, (slot, mut worker)) in progress.iter().zip(states).enumerate() {
                let strategy = &strategy;

                let handle = thread::Builder::new()
                    .name(format!("hogwild-worker-{worker_id}"))
                    .spawn_scoped(s, move || {
                        for done in 1..=per_thread {
                            strategy.update(&mut worker, ctx);
                            slot.publish(done);
                        }

                        worker.into_stats(per_thread)
                    });

                match handle {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        spawned = Err(Error::Spawn(e));
                        break;
                    }
                }
            }

            let polled = spawned.and_then(|_| {
                poll_checkpoints(&handles, &progress, &mut checkpoints, &mut log, &iterate, start)
            });

            // Every handle is joined before reporting, a panic left unjoined
            // would resurface when the scope ends.
            let joined = join_all(handles);
            polled.and(joined)
        })?;

        let wall_time = start.elapsed();

        while let Some(iteration) = checkpoints.take_next() {
            log.record(iteration, iterations, start.elapsed(), &iterate)?;
        }

        strategy.deinit(&iterate);

        for stats in &workers {
            debug!(
                worker_id = stats.worker_id,
                iterations = stats.iterations,
                gradient_secs = stats.gradient.total.as_secs_f64(),
                update_secs = stats.update.total.as_secs_f64();
                "worker finished"
            );
        }

        let collisions = iterate.collisions();

        info!(
            collisions = collisions,
            wall_time_secs = wall_time.as_secs_f64(),
            log_entries = log.len();
            "{} run finished", S::NAME
        );

        Ok(RunOutcome {
            initial,
            iterate: iterate.to_vec()?,
            log,
            workers,
            collisions,
            wall_time,
            iterations,
        })
    }
}

/// Snapshots the iterate at every checkpoint the workers reach, until all of them finish.
fn poll_checkpoints<T>(
    handles: &[ScopedJoinHandle<'_, T>],
    progress: &[Progress],
    checkpoints: &mut Checkpoints,
    log: &mut Log,
    iterate: &SharedIterate,
    start: Instant,
) -> Result<()> {
    loop {
        let finished = handles.iter().all(|h| h.is_finished());
        let done = progress::total(progress);

        while let Some(iteration) = checkpoints.take_due(done) {
            let elapsed = start.elapsed();
            log.record(iteration, done, elapsed, iterate)?;
            debug!(
                iteration = iteration,
                observed = done,
                elapsed_secs = elapsed.as_secs_f64();
                "checkpoint recorded"
            );
        }

        if finished {
            return Ok(());
        }

        thread::sleep(POLL_INTERVAL);
    }
}

fn join_all(handles: Vec<ScopedJoinHandle<'_, WorkerStats>>) -> Result<Vec<WorkerStats>> {
    let results: Vec<_> = handles.into_iter().map(|h| h.join()).collect();

    results
        .into_iter()
        .enumerate()
        .map(|(worker_id, r)| r.map_err(|_| Error::WorkerPanicked { worker_id }))
        .collect()
}
