//! Chunk: one voxel grid with its extracted mesh and scene registrations

use crate::core::types::Vec3;
use crate::math::Aabb;
use crate::mesh::data::MeshData;
use crate::mesh::surface_nets;
use crate::scene::collider::{ColliderFactory, ColliderHandle, Transform};
use crate::scene::spatial::{SpatialIndex, SpatialItem, SpatialKey};
use crate::terrain::config::GridConfig;
use crate::terrain::field::DensityField;
use crate::voxel::grid::VoxelGrid;

/// Integer coordinate identifying a chunk in the lateral world grid.
/// The world is not chunked vertically: one chunk spans full height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// Create a new chunk coordinate
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Coordinate of the chunk whose owned region contains `pos`
    pub fn from_world_pos(pos: Vec3, grid: &GridConfig) -> Self {
        let span = grid.chunk_span();
        Self {
            x: (pos.x / span).floor() as i32,
            z: (pos.z / span).floor() as i32,
        }
    }

    /// Neighboring coordinate at the given lateral offset
    pub fn offset(&self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }
}

/// A chunk: voxel grid, extracted mesh, and the collider/spatial handles
/// registered for it.
///
/// The grid duplicates `border` voxel layers from each lateral neighbor
/// so extraction produces seam-correct vertices and normals without
/// cross-chunk reads. Lifecycle: `new` -> `generate` -> `build` ->
/// `modify`* -> `unbuild`.
pub struct Chunk {
    /// Coordinate of this chunk in the world grid
    pub coord: ChunkCoord,
    /// Voxel density/weight storage, border included
    pub grid: VoxelGrid,
    grid_config: GridConfig,
    /// World-space mesh, absent when extraction found no surface
    pub mesh: Option<MeshData>,
    collider: Option<Box<dyn ColliderHandle>>,
    spatial_key: Option<SpatialKey>,
}

impl Chunk {
    /// Create an empty (all-air) chunk at the given coordinate
    pub fn new(coord: ChunkCoord, grid_config: GridConfig) -> Self {
        Self {
            coord,
            grid: VoxelGrid::new(grid_config.grid_dims()),
            grid_config,
            mesh: None,
            collider: None,
            spatial_key: None,
        }
    }

    /// World-space position of local voxel (0, 0, 0)
    pub fn world_origin(&self) -> Vec3 {
        self.grid_config.chunk_origin(self.coord.x, self.coord.z)
    }

    /// World-space bounds of the stored grid, border included
    pub fn world_bounds(&self) -> Aabb {
        let (w, h, d) = self.grid.dims();
        let origin = self.world_origin();
        let size = Vec3::new(w as f32, h as f32, d as f32) * self.grid_config.scale;
        Aabb::new(origin, origin + size)
    }

    /// True once `build` has produced and registered a mesh
    pub fn is_built(&self) -> bool {
        self.mesh.is_some()
    }

    /// Fill the grid by sampling the density field at every voxel.
    /// Border voxels sample outside the owned region, duplicating what the
    /// neighbor also computes.
    pub fn generate(&mut self, field: &DensityField) {
        let (w, h, d) = self.grid.dims();
        let origin = self.world_origin();
        let scale = self.grid_config.scale;
        for z in 0..d {
            for y in 0..h {
                for x in 0..w {
                    let p = origin + Vec3::new(x as f32, y as f32, z as f32) * scale;
                    let sample = field.sample(p.x, p.y, p.z);
                    self.grid.set_density(x, y, z, sample.density);
                    self.grid.set_weights(x, y, z, sample.weights);
                }
            }
        }
    }

    /// Extract the grid's surface and register it with the scene.
    ///
    /// Tears down any previous mesh first. A grid that is entirely solid
    /// or entirely air leaves the chunk meshless; that is a valid state,
    /// not an error.
    pub fn build(
        &mut self,
        colliders: &mut dyn ColliderFactory,
        spatial: &mut dyn SpatialIndex,
    ) {
        self.unbuild(spatial);

        let border = self.grid_config.border;
        let mut mesh = surface_nets::extract(
            self.grid.densities(),
            self.grid.weight_channels(),
            self.grid.dims(),
            [border, 0, border],
        );
        if mesh.is_empty() {
            log::debug!("chunk ({}, {}) extracted no surface", self.coord.x, self.coord.z);
            return;
        }

        let origin = self.world_origin();
        let scale = self.grid_config.scale;
        for p in &mut mesh.positions {
            *p = *p * scale + origin;
        }

        let transform = Transform {
            translation: origin,
            scale,
        };
        let bounds = Aabb::from_points(mesh.positions.iter().copied());
        self.collider = Some(colliders.create(&mesh, &transform));
        self.spatial_key = Some(spatial.insert(SpatialItem {
            coord: self.coord,
            bounds,
            transform,
            positions: mesh.positions.clone(),
            indices: mesh.indices.clone(),
        }));
        self.mesh = Some(mesh);
    }

    /// Release the mesh, collider, and spatial registration. Idempotent.
    pub fn unbuild(&mut self, spatial: &mut dyn SpatialIndex) {
        if let Some(key) = self.spatial_key.take() {
            spatial.remove(key);
        }
        self.collider = None;
        self.mesh = None;
    }
}
