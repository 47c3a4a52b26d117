//! Triangle mesh container produced by isosurface extraction

use crate::core::types::Vec3;

/// Indexed triangle mesh with per-vertex normals and material weights.
///
/// Positions come out of the extractor in voxel space; `Chunk::build`
/// rescales them into world space before registering the mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Smooth per-vertex normals, unit length
    pub normals: Vec<Vec3>,
    /// Per-vertex 3-channel material blend weights.
    /// Empty when the source grid carried no weight channel.
    pub weights: Vec<Vec3>,
    /// Triangle index list (3 indices per triangle)
    pub indices: Vec<u32>,
}

impl MeshData {
    /// True if the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mesh() {
        let mesh = MeshData::default();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_triangle_count() {
        let mesh = MeshData {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z; 3],
            weights: Vec::new(),
            indices: vec![0, 1, 2],
        };
        assert!(!mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
    }
}
