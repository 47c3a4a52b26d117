//! Voxel storage: grids, chunks, and the terrain store

pub mod grid;
pub mod chunk;
pub mod store;

pub use grid::VoxelGrid;
pub use chunk::{Chunk, ChunkCoord};
pub use store::TerrainStore;
