mod checkpoints;
mod log;
mod orchestrator;
mod outcome;
mod progress;

pub use self::log::{Log, LogEntry};
pub use orchestrator::Orchestrator;
pub use outcome::RunOutcome;
