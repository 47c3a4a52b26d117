//! Sculpt engine: applies brush edits to chunks and propagates them
//! across chunk borders.
//!
//! An edit near a chunk edge lands in voxels the neighboring chunks store
//! their own copies of, so the same brush is re-applied in each existing
//! neighbor's coordinate space. Propagation is an explicit two-level call:
//! the owning chunk first, then each neighbor with no further fan-out, so
//! it can never recurse.

use crate::core::types::{IVec3, Vec3};
use crate::sculpt::brush::{self, BrushMode};
use crate::terrain::config::BrushConfig;
use crate::voxel::chunk::ChunkCoord;
use crate::voxel::grid::VoxelGrid;
use crate::voxel::store::TerrainStore;

/// Fixed neighbor visiting order: axes first, then diagonals.
/// Kept stable so edit cascades are deterministic.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Applies sculpt edits to a terrain store
pub struct SculptEngine {
    intensity: f32,
    clamp_min: f32,
    clamp_max: f32,
}

impl SculptEngine {
    /// Create an engine from brush tuning
    pub fn new(config: &BrushConfig) -> Self {
        Self {
            intensity: config.intensity,
            clamp_min: config.clamp_min,
            clamp_max: config.clamp_max,
        }
    }

    /// Apply one sculpt edit at a world-space hit point.
    ///
    /// `radius` is in voxel units; `subtract` carves terrain away, filling
    /// it otherwise. The pick-ray surface `normal` is part of the host
    /// input shape and does not displace the brush center.
    ///
    /// The owning chunk rebuilds before any neighbor. A hit outside the
    /// generated world, or a radius reaching past it, affects only the
    /// chunks that exist.
    pub fn modify(
        &self,
        store: &mut TerrainStore,
        point: Vec3,
        normal: Vec3,
        radius: i32,
        subtract: bool,
    ) {
        let grid_config = store.config().grid;
        let coord = ChunkCoord::from_world_pos(point, &grid_config);
        let Some(chunk) = store.chunk_mut(coord) else {
            log::debug!("sculpt at {point:?} hit no generated chunk");
            return;
        };

        let mode = BrushMode::from_subtract(subtract);
        let sign = mode.density_sign();
        log::debug!(
            "sculpt {mode:?} r={radius} at {point:?} (normal {normal:?}) in chunk ({}, {})",
            coord.x,
            coord.z,
        );

        // Center voxel in the owning chunk's grid.
        let local = (point - chunk.world_origin()) / grid_config.scale;
        let center = IVec3::new(
            local.x.round() as i32,
            local.y.round() as i32,
            local.z.round() as i32,
        );

        if self.apply_brush(&mut chunk.grid, center, radius, sign) {
            store.rebuild(coord);
        }

        // Second level: re-express the center in each neighbor's grid and
        // apply there, with no further propagation.
        let inner = grid_config.inner_size as i32;
        for (dx, dz) in NEIGHBOR_OFFSETS {
            let neighbor_coord = coord.offset(dx, dz);
            let Some(neighbor) = store.chunk_mut(neighbor_coord) else {
                continue;
            };
            let neighbor_center = center - IVec3::new(dx * inner, 0, dz * inner);
            if self.apply_brush(&mut neighbor.grid, neighbor_center, radius, sign) {
                store.rebuild(neighbor_coord);
            }
        }
    }

    /// Add the falloff-weighted delta to every in-range voxel of one grid.
    /// Returns true if any stored density changed.
    fn apply_brush(&self, grid: &mut VoxelGrid, center: IVec3, radius: i32, sign: f32) -> bool {
        if radius <= 0 {
            return false;
        }
        let (w, h, d) = grid.dims();
        // Loop bounds clamp to the grid, absorbing out-of-range centers
        // and oversized radii.
        let x0 = (center.x - radius).max(0);
        let x1 = (center.x + radius).min(w as i32 - 1);
        let y0 = (center.y - radius).max(0);
        let y1 = (center.y + radius).min(h as i32 - 1);
        let z0 = (center.z - radius).max(0);
        let z1 = (center.z + radius).min(d as i32 - 1);

        let r = radius as f32;
        let r_sq = r * r;
        let mut changed = false;

        for z in z0..=z1 {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let delta_pos = IVec3::new(x, y, z) - center;
                    let dist_sq = delta_pos.dot(delta_pos) as f32;
                    if dist_sq > r_sq {
                        continue;
                    }
                    let delta = sign * self.intensity * brush::falloff(dist_sq.sqrt(), r);
                    let (xu, yu, zu) = (x as usize, y as usize, z as usize);
                    let old = grid.density(xu, yu, zu);
                    let new = (old + delta).clamp(self.clamp_min, self.clamp_max);
                    if new != old {
                        grid.set_density(xu, yu, zu, new);
                        changed = true;
                    }
                }
            }
        }
        changed
    }
}
