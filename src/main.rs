use std::{env, path::PathBuf, process};

use anyhow::Context;
use log::info;

use hogwild::{
    Dataset, RunConfig, configs,
    report::{self, RunReport},
};

const RESULTS_DIR: &str = "results";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if !(3..=4).contains(&args.len()) {
        eprintln!("Usage: {} <num_threads> <data_file> [config.json]", args[0]);
        process::exit(1);
    }

    let threads: usize = match args[1].parse() {
        Ok(threads) if threads > 0 => threads,
        _ => {
            eprintln!("num_threads must be a positive integer, got {}", args[1]);
            process::exit(1);
        }
    };

    let mut config = match args.get(3) {
        Some(path) => RunConfig::from_path(path)
            .with_context(|| format!("failed to read config from {path}"))?,
        None => RunConfig::default(),
    };
    config.threads = threads;

    let dataset = Dataset::from_path(&args[2])
        .with_context(|| format!("failed to load dataset from {}", args[2]))?;

    let outcome = configs::run(&config, &dataset)?;
    let report = RunReport::new(&config, &dataset, &outcome);

    let dir = env::var_os("HOGWILD_RESULTS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(RESULTS_DIR));
    let path = report::write_report(&dir, &report)?;

    info!(
        initial_loss = report.initial_loss,
        final_loss = report.final_loss,
        collisions = report.collisions;
        "results written to {}", path.display()
    );

    Ok(())
}
