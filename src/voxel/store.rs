//! Terrain store: the map of generated chunks and world-level operations

use std::collections::HashMap;
use std::time::Instant;

use crate::core::types::Vec3;
use crate::scene::collider::ColliderFactory;
use crate::scene::spatial::SpatialIndex;
use crate::terrain::config::WorldConfig;
use crate::terrain::field::DensityField;
use crate::voxel::chunk::{Chunk, ChunkCoord};

/// Container for a world of chunks.
///
/// Owns the density field and the scene boundary objects; all chunk
/// generation, meshing, and rebuild plumbing goes through here. Single
/// threaded by design: every operation runs to completion on the calling
/// thread.
pub struct TerrainStore {
    config: WorldConfig,
    field: DensityField,
    chunks: HashMap<ChunkCoord, Chunk>,
    colliders: Box<dyn ColliderFactory>,
    spatial: Box<dyn SpatialIndex>,
    /// Coordinates whose grids changed since the last `take_modified`
    modified: Vec<ChunkCoord>,
}

impl TerrainStore {
    /// Create an empty store; the density field derives from the config seed
    pub fn new(
        config: WorldConfig,
        colliders: Box<dyn ColliderFactory>,
        spatial: Box<dyn SpatialIndex>,
    ) -> Self {
        let field = DensityField::new(config.field_kind, config.field.clone(), config.seed);
        Self {
            config,
            field,
            chunks: HashMap::new(),
            colliders,
            spatial,
            modified: Vec::new(),
        }
    }

    /// World configuration
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The density field chunks are generated from
    pub fn field(&self) -> &DensityField {
        &self.field
    }

    /// Generate and build all chunks in `[-radius, radius]²`.
    ///
    /// Two passes: every grid is generated before any chunk is meshed.
    /// Border data is regenerated per chunk rather than copied from
    /// neighbors, so the passes could interleave, but the split keeps
    /// generation and meshing separately measurable.
    pub fn populate(&mut self) {
        let start = Instant::now();
        let radius = self.config.world_radius as i32;

        for x in -radius..=radius {
            for z in -radius..=radius {
                let coord = ChunkCoord::new(x, z);
                let mut chunk = Chunk::new(coord, self.config.grid);
                chunk.generate(&self.field);
                self.chunks.insert(coord, chunk);
            }
        }

        let coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        let mut meshed = 0usize;
        for coord in coords {
            if self.build_chunk(coord) {
                meshed += 1;
            }
        }

        log::info!(
            "populated {} chunks ({} chunk radius), {} with geometry in {:.2}s",
            self.chunks.len(),
            radius,
            meshed,
            start.elapsed().as_secs_f32(),
        );
    }

    /// Look up a chunk by coordinate
    pub fn chunk_at(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Mutable chunk lookup, used by the sculpt engine
    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Look up the chunk whose owned region contains a world position
    pub fn chunk_at_world(&self, pos: Vec3) -> Option<&Chunk> {
        self.chunk_at(ChunkCoord::from_world_pos(pos, &self.config.grid))
    }

    /// Number of generated chunks
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterator over generated chunk coordinates
    pub fn loaded_coords(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.chunks.keys()
    }

    /// Re-extract and re-register a chunk after its grid changed.
    /// Missing coordinates are ignored.
    pub fn rebuild(&mut self, coord: ChunkCoord) {
        if !self.chunks.contains_key(&coord) {
            return;
        }
        self.build_chunk(coord);
        self.mark_modified(coord);
    }

    fn build_chunk(&mut self, coord: ChunkCoord) -> bool {
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };
        chunk.build(self.colliders.as_mut(), self.spatial.as_mut());
        chunk.is_built()
    }

    /// Record that a chunk's grid diverged from the generated state
    pub fn mark_modified(&mut self, coord: ChunkCoord) {
        if !self.modified.contains(&coord) {
            self.modified.push(coord);
        }
    }

    /// Drain the set of modified chunk coordinates.
    /// Hosts persisting edited terrain call this once per save.
    pub fn take_modified(&mut self) -> Vec<ChunkCoord> {
        std::mem::take(&mut self.modified)
    }

    /// Host tick. All work in this core is driven by explicit
    /// `populate`/`rebuild`/sculpt calls; the hook exists so hosts have a
    /// stable place to drive future time-sliced work from.
    pub fn update(&mut self, _delta_seconds: f32) {}

    /// Release every chunk's mesh and scene registrations and drop the
    /// chunks. Idempotent.
    pub fn clear(&mut self) {
        for chunk in self.chunks.values_mut() {
            chunk.unbuild(self.spatial.as_mut());
        }
        let released = self.chunks.len();
        self.chunks.clear();
        self.modified.clear();
        if released > 0 {
            log::info!("released {released} chunks");
        }
    }
}
