use std::{collections::TryReserveError, error, fmt, io};

/// The crate's result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that can abort a benchmark run before or around the hot loop.
///
/// Nothing in here is ever produced by a worker's update step, races on the
/// iterate are counted, not reported.
#[derive(Debug)]
pub enum Error {
    /// Invalid configuration, caught before a run starts.
    InvalidConfig(String),
    /// A malformed line in a dataset file.
    Parse { line: usize, msg: String },
    /// A sample references a feature outside of the dataset's dimensionality.
    FeatureOutOfRange {
        sample: usize,
        index: usize,
        num_features: usize,
    },
    /// Two buffers that must agree in length don't.
    DimensionMismatch { expected: usize, got: usize },
    /// The OS refused to create a worker thread.
    Spawn(io::Error),
    /// A worker thread panicked before finishing its share of the budget.
    WorkerPanicked { worker_id: usize },
    /// A random distribution couldn't be built from the given parameters.
    Distribution(String),
    /// A buffer sized up front couldn't be allocated.
    Allocation(String),
    Io(io::Error),
    Json(serde_json::Error),
}

impl Error {
    /// Maps a failed reservation for `what` into an `Allocation` error.
    pub(crate) fn alloc(what: &'static str) -> impl Fn(TryReserveError) -> Self + Copy {
        move |e| Self::Allocation(format!("{what}: {e}"))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Parse { line, msg } => write!(f, "parse error at line {line}: {msg}"),
            Self::FeatureOutOfRange {
                sample,
                index,
                num_features,
            } => write!(
                f,
                "sample {sample} references feature {index}, but there are only {num_features} features"
            ),
            Self::DimensionMismatch { expected, got } => {
                write!(f, "dimension mismatch: expected {expected}, got {got}")
            }
            Self::Spawn(e) => write!(f, "failed to spawn worker thread: {e}"),
            Self::WorkerPanicked { worker_id } => write!(f, "worker {worker_id} panicked"),
            Self::Distribution(msg) => write!(f, "invalid distribution: {msg}"),
            Self::Allocation(msg) => write!(f, "allocation failed: {msg}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Spawn(e) | Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
