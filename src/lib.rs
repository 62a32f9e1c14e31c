pub mod configs;
pub mod data;
pub mod error;
pub mod execution;
pub mod initialization;
pub mod instrumentation;
pub mod problem;
pub mod report;
pub mod storage;
pub mod strategies;

pub use configs::RunConfig;
pub use data::Dataset;
pub use error::{Error, Result};
pub use execution::{Orchestrator, RunOutcome};
pub use problem::{Gradient, Problem};
pub use report::RunReport;
pub use storage::SharedIterate;
pub use strategies::UpdateStrategy;
