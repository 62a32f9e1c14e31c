use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::info;
use serde::Serialize;

use crate::{
    configs::RunConfig,
    data::Dataset,
    error::Result,
    execution::RunOutcome,
    instrumentation::{TimerStats, WorkerStats},
};

/// Elapsed time of one phase of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseReport {
    pub total_secs: f64,
    pub count: u64,
    pub mean_secs: f64,
}

impl From<TimerStats> for PhaseReport {
    fn from(stats: TimerStats) -> Self {
        Self {
            total_secs: stats.total.as_secs_f64(),
            count: stats.count,
            mean_secs: stats.mean().as_secs_f64(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub iterations: usize,
    pub gradient: PhaseReport,
    pub update: PhaseReport,
}

impl From<&WorkerStats> for WorkerReport {
    fn from(stats: &WorkerStats) -> Self {
        Self {
            worker_id: stats.worker_id,
            iterations: stats.iterations,
            gradient: stats.gradient.into(),
            update: stats.update.into(),
        }
    }
}

/// A log entry together with the dataset loss at that snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogPointReport {
    pub iteration: usize,
    /// Updates already published when the snapshot was taken.
    pub observed: usize,
    pub timestamp_secs: f64,
    pub loss: f64,
    pub iterate: Vec<f64>,
}

/// The serializable results of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub config: RunConfig,
    pub num_threads: usize,
    pub iterations: usize,
    pub wall_time_secs: f64,
    /// A lower bound, concurrent collisions may go uncounted.
    pub collisions: u64,
    pub initial_loss: f64,
    pub final_loss: f64,
    pub log: Vec<LogPointReport>,
    pub workers: Vec<WorkerReport>,
}

impl RunReport {
    /// Builds the report of a run, evaluating the dataset loss of every snapshot.
    ///
    /// Must be called once the run is over, loss evaluation uses every core.
    ///
    /// # Arguments
    /// * `config` - The configuration the run was executed with.
    /// * `dataset` - The dataset the run sampled from.
    /// * `outcome` - The run's outcome.
    pub fn new(config: &RunConfig, dataset: &Dataset, outcome: &RunOutcome) -> Self {
        let loss = |weights: &[f64]| config.gradient.loss(dataset, weights);

        let log = outcome
            .log
            .iter()
            .map(|entry| LogPointReport {
                iteration: entry.iteration,
                observed: entry.observed,
                timestamp_secs: entry.timestamp.as_secs_f64(),
                loss: loss(&entry.iterate),
                iterate: entry.iterate.clone(),
            })
            .collect();

        Self {
            config: config.clone(),
            num_threads: outcome.workers.len(),
            iterations: outcome.iterations,
            wall_time_secs: outcome.wall_time.as_secs_f64(),
            collisions: outcome.collisions,
            initial_loss: loss(&outcome.initial),
            final_loss: loss(&outcome.iterate),
            log,
            workers: outcome.workers.iter().map(WorkerReport::from).collect(),
        }
    }

    /// The name of the file this report is written to.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}t.json",
            self.config.strategy.name(),
            self.config.gradient.name(),
            self.num_threads
        )
    }
}

/// Writes `report` as pretty JSON into `dir`, creating it if needed.
///
/// # Returns
/// The path of the written file or an io error if encountered.
pub fn write_report<P: AsRef<Path>>(dir: P, report: &RunReport) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = dir.join(report.file_name());
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;

    info!(
        log_points = report.log.len(),
        final_loss = report.final_loss;
        "report written to {}", path.display()
    );

    Ok(path)
}
