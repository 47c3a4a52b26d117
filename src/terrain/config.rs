//! World configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{Result, Vec3};
use crate::terrain::field::{FieldKind, FieldParams};

/// Voxel grid geometry shared by every chunk in a world.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GridConfig {
    /// Lateral voxels owned by a chunk (world repeats every `inner_size`)
    pub inner_size: usize,
    /// Vertical voxels; the world is not chunked along Y
    pub height: usize,
    /// Voxel layers duplicated from each lateral neighbor for seam-correct
    /// extraction
    pub border: usize,
    /// World units per voxel
    pub scale: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            inner_size: 16,
            height: 64,
            border: 2,
            scale: 1.0,
        }
    }
}

impl GridConfig {
    /// Stored grid dimensions including the duplicated border
    pub fn grid_dims(&self) -> (usize, usize, usize) {
        let lateral = self.inner_size + 2 * self.border;
        (lateral, self.height, lateral)
    }

    /// World-space extent of a chunk's owned region along X/Z
    pub fn chunk_span(&self) -> f32 {
        self.inner_size as f32 * self.scale
    }

    /// World-space origin of local voxel (0,0,0) for the chunk at `(cx, cz)`.
    /// Offset by the border so the owned region starts at `cx * inner_size`.
    pub fn chunk_origin(&self, cx: i32, cz: i32) -> Vec3 {
        let inner = self.inner_size as i32;
        let border = self.border as i32;
        Vec3::new(
            (cx * inner - border) as f32 * self.scale,
            0.0,
            (cz * inner - border) as f32 * self.scale,
        )
    }
}

/// Sculpt brush tuning.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BrushConfig {
    /// Density delta applied at the brush center (falls off linearly to
    /// zero at the radius)
    pub intensity: f32,
    /// Lower density clamp; stops unbounded drift under repeated edits
    pub clamp_min: f32,
    /// Upper density clamp
    pub clamp_max: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            clamp_min: -1.0,
            clamp_max: 1.0,
        }
    }
}

/// Configuration for a terrain world.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Random seed for all noise generators
    pub seed: u32,
    /// Chunks are generated for all coordinates in `[-radius, radius]²`
    pub world_radius: u32,
    /// Grid geometry
    pub grid: GridConfig,
    /// Density-field variant
    pub field_kind: FieldKind,
    /// Density-field noise parameters
    pub field: FieldParams,
    /// Sculpt brush parameters
    pub brush: BrushConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            world_radius: 3,
            grid: GridConfig::default(),
            field_kind: FieldKind::Island,
            field: FieldParams::default(),
            brush: BrushConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Save this configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dims_include_border() {
        let grid = GridConfig::default();
        assert_eq!(grid.grid_dims(), (20, 64, 20));
        assert_eq!(grid.chunk_span(), 16.0);
    }

    #[test]
    fn test_chunk_origin_offsets_border() {
        let grid = GridConfig::default();
        assert_eq!(grid.chunk_origin(0, 0), Vec3::new(-2.0, 0.0, -2.0));
        assert_eq!(grid.chunk_origin(1, -1), Vec3::new(14.0, 0.0, -18.0));
    }

    #[test]
    fn test_neighbor_chunks_abut() {
        let grid = GridConfig::default();
        // Chunk (1,0)'s first owned voxel continues exactly where chunk
        // (0,0)'s last owned voxel left off.
        let o0 = grid.chunk_origin(0, 0);
        let o1 = grid.chunk_origin(1, 0);
        let border = grid.border as f32 * grid.scale;
        assert_eq!(o0.x + border + grid.chunk_span(), o1.x + border);
    }

    #[test]
    fn test_config_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");

        let mut config = WorldConfig::default();
        config.seed = 99;
        config.world_radius = 5;
        config.save(&path).unwrap();

        let loaded = WorldConfig::load(&path).unwrap();
        assert_eq!(loaded.seed, 99);
        assert_eq!(loaded.world_radius, 5);
        assert_eq!(loaded.grid.inner_size, config.grid.inner_size);
    }

    #[test]
    fn test_config_load_missing_file() {
        let result = WorldConfig::load(Path::new("/nonexistent/world.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(WorldConfig::load(&path), Err(Error::Config(_))));
    }
}
