mod run_config;
mod runner;

pub use run_config::{GradientKind, InitSpec, RunConfig, StrategyKind};
pub use runner::run;
