//! Noise-based signed density field.
//!
//! The field composes layered coherent noise into a target surface height,
//! then converts `(height - worldY)` into a smoothed, bounded density so
//! the zero isosurface sits at the intended terrain height. Negative
//! density is inside solid, zero-or-positive is air.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;

/// Parameters controlling the density field
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldParams {
    pub scale: f32,             // Horizontal noise scale (larger = smoother)
    pub height_scale: f32,      // Vertical range of the elevation band
    pub octaves: u32,           // FBM octaves (detail levels)
    pub persistence: f32,       // FBM persistence (0.5 typical)
    pub lacunarity: f32,        // FBM lacunarity (2.0 typical)
    pub sea_floor: f32,         // Height the terrain falls to off-island
    pub island_radius: f32,     // Radial falloff distance from world center
    pub detail_scale: f32,      // 3D surface-detail noise scale
    pub detail_amplitude: f32,  // 3D surface-detail amplitude
    pub surface_thickness: f32, // Density transition band in world units
    pub grass_depth: f32,       // Grass weight fades out over this depth
    pub soil_depth: f32,        // Rock takes over below this depth
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            scale: 48.0,
            height_scale: 24.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            sea_floor: 10.0,
            island_radius: 96.0,
            detail_scale: 9.0,
            detail_amplitude: 1.5,
            surface_thickness: 4.0,
            grass_depth: 1.5,
            soil_depth: 6.0,
        }
    }
}

/// Density-field variants, resolved once at configuration time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Noise island: FBM elevation with a radial falloff to the sea floor
    Island,
    /// Constant target height; useful for authoring and tests
    Flat { height: f32 },
}

/// One field evaluation: signed density plus a 3-channel material blend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSample {
    pub density: f32,
    pub weights: Vec3,
}

/// Signed density field built from layered coherent noise
pub struct DensityField {
    kind: FieldKind,
    params: FieldParams,
    elevation: Fbm<Perlin>,
    detail: Perlin,
}

impl DensityField {
    /// Create a field; all noise generators derive from `seed`
    pub fn new(kind: FieldKind, params: FieldParams, seed: u32) -> Self {
        let elevation = Fbm::<Perlin>::new(seed)
            .set_octaves(params.octaves as usize)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);
        let detail = Perlin::new(seed.wrapping_add(1));

        Self {
            kind,
            params,
            elevation,
            detail,
        }
    }

    /// Get field parameters
    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    /// Target surface height at world position (x, z), before 3D detail
    pub fn target_height(&self, x: f32, z: f32) -> f32 {
        let p = &self.params;
        match self.kind {
            FieldKind::Flat { height } => height,
            FieldKind::Island => {
                let nx = (x / p.scale) as f64;
                let nz = (z / p.scale) as f64;
                // Noise in [-1, 1] mapped to [0, height_scale]
                let normalized = (self.elevation.get([nx, nz]) as f32 + 1.0) * 0.5;
                let distance = (x * x + z * z).sqrt();
                let falloff = 1.0 - smoothstep(p.island_radius * 0.55, p.island_radius, distance);
                p.sea_floor + normalized * p.height_scale * falloff
            }
        }
    }

    /// Evaluate density and material weights at a world position
    pub fn sample(&self, wx: f32, wy: f32, wz: f32) -> FieldSample {
        let p = &self.params;
        let mut height = self.target_height(wx, wz);
        if self.kind == FieldKind::Island {
            let detail = self.detail.get([
                (wx / p.detail_scale) as f64,
                (wy / p.detail_scale) as f64,
                (wz / p.detail_scale) as f64,
            ]) as f32;
            height += detail * p.detail_amplitude;
        }

        // Signed depth through a smoothstep band: -1 deep inside, +1 well
        // above, zero exactly at the surface with nonzero slope.
        let s = ((height - wy) / p.surface_thickness).clamp(-1.0, 1.0);
        let t = (s + 1.0) * 0.5;
        let density = -(2.0 * (t * t * (3.0 - 2.0 * t)) - 1.0);

        FieldSample {
            density,
            weights: self.material_weights(height - wy),
        }
    }

    /// Material blend at `depth` below the surface: grass on top, soil
    /// in a band under it, rock beneath. Channels sum to 1.
    fn material_weights(&self, depth: f32) -> Vec3 {
        let p = &self.params;
        let grass = 1.0 - (depth / p.grass_depth).clamp(0.0, 1.0);
        let rock = ((depth - p.soil_depth) / p.soil_depth).clamp(0.0, 1.0);
        let soil = (1.0 - grass - rock).max(0.0);
        let sum = grass + soil + rock;
        if sum <= f32::EPSILON {
            Vec3::new(1.0, 0.0, 0.0)
        } else {
            Vec3::new(grass, soil, rock) / sum
        }
    }
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
