//! Boundary contracts consumed from the host scene: physics colliders and
//! the ray-picking spatial index. Implementations live outside this crate.

pub mod collider;
pub mod spatial;

pub use collider::{ColliderFactory, ColliderHandle, NullColliderFactory, Transform};
pub use spatial::{NullSpatialIndex, SpatialIndex, SpatialItem, SpatialKey};
