//! Ray-picking spatial index boundary contract

use crate::core::types::Vec3;
use crate::math::Aabb;
use crate::scene::collider::Transform;
use crate::voxel::chunk::ChunkCoord;

/// Key returned by a spatial index for a registered item
pub type SpatialKey = u64;

/// Geometry registered for one chunk so external ray picking can find it
#[derive(Clone, Debug)]
pub struct SpatialItem {
    /// Chunk that owns the geometry
    pub coord: ChunkCoord,
    /// World-space bounds of the mesh
    pub bounds: Aabb,
    /// Chunk placement
    pub transform: Transform,
    /// World-space vertex positions
    pub positions: Vec<Vec3>,
    /// Triangle index list
    pub indices: Vec<u32>,
}

/// Spatial acceleration structure keyed by world-space bounds.
/// Chunks insert one item per build and remove it on unbuild.
pub trait SpatialIndex {
    fn insert(&mut self, item: SpatialItem) -> SpatialKey;
    fn remove(&mut self, key: SpatialKey);
}

/// Index for hosts that run without ray picking
pub struct NullSpatialIndex {
    next_key: SpatialKey,
}

impl NullSpatialIndex {
    pub fn new() -> Self {
        Self { next_key: 0 }
    }
}

impl Default for NullSpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialIndex for NullSpatialIndex {
    fn insert(&mut self, _item: SpatialItem) -> SpatialKey {
        let key = self.next_key;
        self.next_key += 1;
        key
    }

    fn remove(&mut self, _key: SpatialKey) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_index_issues_distinct_keys() {
        let mut index = NullSpatialIndex::new();
        let item = SpatialItem {
            coord: ChunkCoord::new(0, 0),
            bounds: Aabb::new(Vec3::ZERO, Vec3::ONE),
            transform: Transform {
                translation: Vec3::ZERO,
                scale: 1.0,
            },
            positions: Vec::new(),
            indices: Vec::new(),
        };
        let a = index.insert(item.clone());
        let b = index.insert(item);
        assert_ne!(a, b);
        index.remove(a);
        index.remove(b);
    }
}
