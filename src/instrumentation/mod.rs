mod clock;
mod stats;
mod timer;

pub use clock::{Clock, ClockScope};
pub use stats::{TimerStats, WorkerStats};
pub use timer::Timer;
