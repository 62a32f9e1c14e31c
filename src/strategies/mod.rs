mod hogwild;
mod independent;
mod naive;
mod segmented;
mod shared;
mod strategy;
mod worker;

pub use hogwild::Hogwild;
pub use independent::Independent;
pub use naive::Naive;
pub use segmented::Segmented;
pub use shared::Shared;
pub use strategy::{UpdateCtx, UpdateStrategy};
pub use worker::WorkerState;
