//! Dense voxel grid: signed density plus per-voxel material weights

use crate::core::types::Vec3;

/// Density written as exactly zero is stored as this small negative value
/// instead; a corner sitting exactly on the isosurface degenerates the
/// extractor's edge interpolation.
pub const DENSITY_EPSILON: f32 = 1.0e-5;

/// Flat density/weight arrays indexed `x + y*W + z*W*H`.
///
/// Negative density = inside solid, zero-or-positive = air. A fresh grid
/// is entirely air.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid {
    dims: (usize, usize, usize),
    density: Vec<f32>,
    weights: Vec<Vec3>,
}

impl VoxelGrid {
    /// Create an all-air grid. Panics on zero-sized dimensions.
    pub fn new(dims: (usize, usize, usize)) -> Self {
        let (w, h, d) = dims;
        assert!(w > 0 && h > 0 && d > 0, "zero-sized grid dims {dims:?}");
        let len = w * h * d;
        Self {
            dims,
            density: vec![1.0; len],
            weights: vec![Vec3::ZERO; len],
        }
    }

    /// Grid dimensions (width, height, depth)
    #[inline]
    pub fn dims(&self) -> (usize, usize, usize) {
        self.dims
    }

    /// Linear index of voxel (x, y, z)
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        let (w, h, d) = self.dims;
        debug_assert!(x < w && y < h && z < d, "voxel ({x},{y},{z}) out of {:?}", self.dims);
        x + y * w + z * w * h
    }

    /// Density at voxel (x, y, z)
    #[inline]
    pub fn density(&self, x: usize, y: usize, z: usize) -> f32 {
        self.density[self.index(x, y, z)]
    }

    /// Store a density value, nudging exact zero off the isosurface
    #[inline]
    pub fn set_density(&mut self, x: usize, y: usize, z: usize, value: f32) {
        let idx = self.index(x, y, z);
        self.density[idx] = if value == 0.0 { -DENSITY_EPSILON } else { value };
    }

    /// Material weights at voxel (x, y, z)
    #[inline]
    pub fn weights(&self, x: usize, y: usize, z: usize) -> Vec3 {
        self.weights[self.index(x, y, z)]
    }

    /// Store material weights for voxel (x, y, z)
    #[inline]
    pub fn set_weights(&mut self, x: usize, y: usize, z: usize, value: Vec3) {
        let idx = self.index(x, y, z);
        self.weights[idx] = value;
    }

    /// Full density array, extractor layout
    pub fn densities(&self) -> &[f32] {
        &self.density
    }

    /// Full weight array, extractor layout
    pub fn weight_channels(&self) -> &[Vec3] {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_air() {
        let grid = VoxelGrid::new((4, 8, 4));
        assert_eq!(grid.dims(), (4, 8, 4));
        assert_eq!(grid.densities().len(), 128);
        assert!(grid.densities().iter().all(|&d| d > 0.0));
    }

    #[test]
    fn test_index_layout() {
        let grid = VoxelGrid::new((4, 8, 4));
        assert_eq!(grid.index(0, 0, 0), 0);
        assert_eq!(grid.index(1, 0, 0), 1);
        assert_eq!(grid.index(0, 1, 0), 4);
        assert_eq!(grid.index(0, 0, 1), 32);
        assert_eq!(grid.index(3, 7, 3), 127);
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut grid = VoxelGrid::new((3, 3, 3));
        grid.set_density(1, 2, 0, -0.75);
        assert_eq!(grid.density(1, 2, 0), -0.75);

        grid.set_weights(1, 2, 0, Vec3::new(0.2, 0.3, 0.5));
        assert_eq!(grid.weights(1, 2, 0), Vec3::new(0.2, 0.3, 0.5));
    }

    #[test]
    fn test_zero_density_is_nudged() {
        let mut grid = VoxelGrid::new((2, 2, 2));
        grid.set_density(0, 0, 0, 0.0);
        assert_eq!(grid.density(0, 0, 0), -DENSITY_EPSILON);
        // Nonzero values pass through untouched.
        grid.set_density(0, 0, 0, 0.25);
        assert_eq!(grid.density(0, 0, 0), 0.25);
    }

    #[test]
    #[should_panic(expected = "zero-sized grid")]
    fn test_zero_dims_panic() {
        VoxelGrid::new((4, 0, 4));
    }
}
