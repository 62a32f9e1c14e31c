mod dataset;
mod loader;
mod sparse;
pub mod synthetic;

pub use dataset::Dataset;
pub use sparse::{SparseEntry, SparseVector};
pub use synthetic::{SyntheticSpec, Task};
