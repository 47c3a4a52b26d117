//! Physics collider boundary contract

use crate::core::types::Vec3;
use crate::mesh::data::MeshData;

/// Placement of a chunk mesh in the world
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub scale: f32,
}

/// Handle to one registered triangle-mesh collider.
/// Dropping the handle releases the collider.
pub trait ColliderHandle {
    /// Move the collider to a new placement
    fn relocate(&mut self, transform: &Transform);
}

/// Builds colliders from chunk meshes. A chunk creates one collider per
/// build and drops it on rebuild or teardown.
pub trait ColliderFactory {
    fn create(&mut self, mesh: &MeshData, transform: &Transform) -> Box<dyn ColliderHandle>;
}

/// Factory for hosts that run without physics
pub struct NullColliderFactory;

struct NullColliderHandle;

impl ColliderHandle for NullColliderHandle {
    fn relocate(&mut self, _transform: &Transform) {}
}

impl ColliderFactory for NullColliderFactory {
    fn create(&mut self, _mesh: &MeshData, _transform: &Transform) -> Box<dyn ColliderHandle> {
        Box::new(NullColliderHandle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_factory_creates_handles() {
        let mut factory = NullColliderFactory;
        let transform = Transform {
            translation: Vec3::ZERO,
            scale: 1.0,
        };
        let mut handle = factory.create(&MeshData::default(), &transform);
        handle.relocate(&Transform {
            translation: Vec3::ONE,
            scale: 2.0,
        });
    }
}
