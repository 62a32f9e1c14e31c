mod collisions;
mod iterate;

pub use collisions::CollisionCounter;
pub use iterate::SharedIterate;
