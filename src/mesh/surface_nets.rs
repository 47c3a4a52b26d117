//! Surface Nets isosurface extraction.
//!
//! Converts a signed density grid into an indexed triangle mesh with one
//! vertex per sign-changing cell (contrast Marching Cubes, which emits a
//! vertex per crossed edge). Density convention: negative = inside solid,
//! zero-or-positive = air. Faces wind so normals point from solid to air.
//!
//! Cells inside a configurable border band still contribute vertices and
//! normal accumulation, but their faces are dropped from the final index
//! list: chunked callers duplicate a few voxel layers from each neighbor
//! so the seam vertices and normals match, and the neighbor owns the
//! surface there.

use crate::core::types::Vec3;
use crate::mesh::data::MeshData;

/// The 12 cube edges as pairs of corner indices.
/// Corner `k` sits at offset `(k & 1, k >> 1 & 1, k >> 2 & 1)`.
const CUBE_EDGES: [usize; 24] = cube_edges();

/// Maps an 8-bit corner-sign mask to the 12-bit set of crossed edges.
const EDGE_TABLE: [u16; 256] = edge_table();

const fn cube_edges() -> [usize; 24] {
    let mut edges = [0usize; 24];
    let mut n = 0;
    let mut corner = 0;
    while corner < 8 {
        let mut axis_bit = 1;
        while axis_bit <= 4 {
            let other = corner ^ axis_bit;
            if corner < other {
                edges[n] = corner;
                edges[n + 1] = other;
                n += 2;
            }
            axis_bit <<= 1;
        }
        corner += 1;
    }
    edges
}

const fn edge_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut mask = 0;
    while mask < 256 {
        let mut crossed = 0u16;
        let mut edge = 0;
        while edge < 12 {
            let a = (mask >> CUBE_EDGES[edge * 2]) & 1;
            let b = (mask >> CUBE_EDGES[edge * 2 + 1]) & 1;
            if a != b {
                crossed |= 1 << edge;
            }
            edge += 1;
        }
        table[mask] = crossed;
        mask += 1;
    }
    table
}

#[inline]
fn corner_offset(corner: usize) -> Vec3 {
    Vec3::new(
        (corner & 1) as f32,
        ((corner >> 1) & 1) as f32,
        ((corner >> 2) & 1) as f32,
    )
}

/// Extract the zero isosurface of `density` over a grid of `dims`
/// `(width, height, depth)` voxels, indexed `x + y*W + z*W*H`.
///
/// `weights` is either empty or a parallel per-voxel material array; when
/// present it is interpolated to one value per vertex. `border` gives the
/// per-axis width of the band whose faces are discarded after normal
/// accumulation; pass `[0, 0, 0]` to keep every face.
///
/// A grid with no sign change produces an empty mesh. Mismatched slice
/// lengths are a caller bug and panic.
pub fn extract(
    density: &[f32],
    weights: &[Vec3],
    dims: (usize, usize, usize),
    border: [usize; 3],
) -> MeshData {
    let (w, h, d) = dims;
    assert!(w >= 2 && h >= 2 && d >= 2, "grid {dims:?} too small to extract");
    assert_eq!(density.len(), w * h * d, "density length does not match dims {dims:?}");
    let has_weights = !weights.is_empty();
    if has_weights {
        assert_eq!(weights.len(), w * h * d, "weights length does not match dims {dims:?}");
    }

    let strides = [1usize, w, w * h];

    let mut positions: Vec<Vec3> = Vec::new();
    let mut vertex_weights: Vec<Vec3> = Vec::new();
    // Dense cell-stride -> vertex-index table for O(1) face assembly.
    let mut stride_to_index: Vec<u32> = vec![u32::MAX; w * h * d];
    let mut triangles: Vec<[u32; 3]> = Vec::new();
    let mut keep: Vec<bool> = Vec::new();

    for z in 0..d - 1 {
        for y in 0..h - 1 {
            for x in 0..w - 1 {
                let stride = x + y * w + z * w * h;

                let mut corner_density = [0.0f32; 8];
                let mut mask = 0usize;
                for k in 0..8 {
                    let ci = stride
                        + (k & 1) * strides[0]
                        + ((k >> 1) & 1) * strides[1]
                        + ((k >> 2) & 1) * strides[2];
                    let g = density[ci];
                    corner_density[k] = g;
                    if g < 0.0 {
                        mask |= 1 << k;
                    }
                }
                // Entirely solid or entirely air: no surface here.
                if mask == 0x00 || mask == 0xff {
                    continue;
                }

                let crossed = EDGE_TABLE[mask];

                let mut position_sum = Vec3::ZERO;
                let mut weight_sum = Vec3::ZERO;
                let mut crossings = 0u32;
                for edge in 0..12 {
                    if crossed & (1 << edge) == 0 {
                        continue;
                    }
                    let c0 = CUBE_EDGES[edge * 2];
                    let c1 = CUBE_EDGES[edge * 2 + 1];
                    let g0 = corner_density[c0];
                    let g1 = corner_density[c1];
                    let denom = g0 - g1;
                    if denom == 0.0 {
                        // Equal corner values: no resolvable crossing.
                        continue;
                    }
                    let t = g0 / denom;
                    let p0 = corner_offset(c0);
                    let p1 = corner_offset(c1);
                    position_sum += p0 + (p1 - p0) * t;
                    if has_weights {
                        let ci0 = stride
                            + (c0 & 1) * strides[0]
                            + ((c0 >> 1) & 1) * strides[1]
                            + ((c0 >> 2) & 1) * strides[2];
                        let ci1 = stride
                            + (c1 & 1) * strides[0]
                            + ((c1 >> 1) & 1) * strides[1]
                            + ((c1 >> 2) & 1) * strides[2];
                        weight_sum += weights[ci0].lerp(weights[ci1], t);
                    }
                    crossings += 1;
                }
                if crossings == 0 {
                    continue;
                }

                let inv = 1.0 / crossings as f32;
                let vertex = Vec3::new(x as f32, y as f32, z as f32) + position_sum * inv;
                let index = positions.len() as u32;
                positions.push(vertex);
                if has_weights {
                    vertex_weights.push(weight_sum * inv);
                }
                stride_to_index[stride] = index;

                let in_border = x < border[0] || x >= w - border[0]
                    || y < border[1] || y >= h - border[1]
                    || z < border[2] || z >= d - border[2];

                // One face per principal axis whose min-corner edge crosses.
                let cell = [x, y, z];
                for axis in 0..3 {
                    if crossed & (1 << axis) == 0 {
                        continue;
                    }
                    let iu = (axis + 1) % 3;
                    let iv = (axis + 2) % 3;
                    // The quad's other three vertices live at -iu/-iv
                    // neighbors, which only exist away from the low faces.
                    if cell[iu] == 0 || cell[iv] == 0 {
                        continue;
                    }
                    let du = strides[iu];
                    let dv = strides[iv];
                    let v0 = stride_to_index[stride];
                    let v1 = stride_to_index[stride - du];
                    let v2 = stride_to_index[stride - du - dv];
                    let v3 = stride_to_index[stride - dv];
                    if v1 == u32::MAX || v2 == u32::MAX || v3 == u32::MAX {
                        continue;
                    }
                    // Corner-0 solidity decides winding so the surface
                    // faces from solid toward air.
                    let quad = if mask & 1 != 0 {
                        [v0, v1, v2, v3]
                    } else {
                        [v0, v3, v2, v1]
                    };
                    triangles.push([quad[0], quad[1], quad[2]]);
                    triangles.push([quad[0], quad[2], quad[3]]);
                    keep.push(!in_border);
                    keep.push(!in_border);
                }
            }
        }
    }

    // Accumulate smooth normals over the full triangle list, border faces
    // included, so seam vertices see their true local neighborhood.
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in &triangles {
        let [a, b, c] = *tri;
        let e1 = positions[b as usize] - positions[a as usize];
        let e2 = positions[c as usize] - positions[a as usize];
        let n = e1.cross(e2);
        normals[a as usize] += n;
        normals[b as usize] += n;
        normals[c as usize] += n;
    }
    for n in &mut normals {
        let len = n.length();
        if len > f32::EPSILON {
            *n /= len;
        } else {
            *n = Vec3::Y;
        }
    }

    let mut indices = Vec::with_capacity(triangles.len() * 3);
    for (tri, kept) in triangles.iter().zip(&keep) {
        if *kept {
            indices.extend_from_slice(tri);
        }
    }

    MeshData {
        positions,
        normals,
        weights: vertex_weights,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn fill<F: Fn(f32, f32, f32) -> f32>(dims: (usize, usize, usize), f: F) -> Vec<f32> {
        let (w, h, d) = dims;
        let mut density = vec![0.0; w * h * d];
        for z in 0..d {
            for y in 0..h {
                for x in 0..w {
                    density[x + y * w + z * w * h] = f(x as f32, y as f32, z as f32);
                }
            }
        }
        density
    }

    #[test]
    fn test_edge_table_symmetry() {
        // Inverting every corner sign crosses the exact same edges.
        for mask in 0..256usize {
            assert_eq!(EDGE_TABLE[mask], EDGE_TABLE[!mask & 0xff], "mask {mask:#04x}");
        }
    }

    #[test]
    fn test_edge_table_extremes() {
        assert_eq!(EDGE_TABLE[0x00], 0);
        assert_eq!(EDGE_TABLE[0xff], 0);
        // Only corner 0 solid: exactly its three incident edges cross.
        assert_eq!(EDGE_TABLE[0x01].count_ones(), 3);
    }

    #[test]
    fn test_cube_edges_are_axis_pairs() {
        for e in 0..12 {
            let a = CUBE_EDGES[e * 2];
            let b = CUBE_EDGES[e * 2 + 1];
            let diff = a ^ b;
            assert!(diff == 1 || diff == 2 || diff == 4, "edge {e} spans corners {a},{b}");
        }
    }

    #[test]
    fn test_uniform_grids_produce_no_surface() {
        let dims = (6, 6, 6);
        let solid = vec![-1.0; 216];
        let air = vec![1.0; 216];
        assert!(extract(&solid, &[], dims, [0; 3]).is_empty());
        assert!(extract(&air, &[], dims, [0; 3]).is_empty());
    }

    #[test]
    fn test_sphere_is_closed_manifold() {
        let dims = (8, 8, 8);
        let center = 3.5;
        let radius = 2.5;
        let density = fill(dims, |x, y, z| {
            let dx = x - center;
            let dy = y - center;
            let dz = z - center;
            (dx * dx + dy * dy + dz * dz).sqrt() - radius
        });
        let mesh = extract(&density, &[], dims, [0; 3]);

        assert!(mesh.vertex_count() > 0);
        assert!(mesh.triangle_count() > 0);

        // Every undirected edge must be shared by exactly two triangles.
        let mut edge_uses: HashMap<(u32, u32), u32> = HashMap::new();
        for tri in mesh.indices.chunks(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                *edge_uses.entry(key).or_insert(0) += 1;
            }
        }
        for (edge, uses) in &edge_uses {
            assert_eq!(*uses, 2, "edge {edge:?} used {uses} times");
        }
    }

    #[test]
    fn test_sphere_normals_unit_length_and_outward() {
        let dims = (8, 8, 8);
        let center = Vec3::splat(3.5);
        let density = fill(dims, |x, y, z| (Vec3::new(x, y, z) - center).length() - 2.5);
        let mesh = extract(&density, &[], dims, [0; 3]);

        let mut referenced = vec![false; mesh.vertex_count()];
        for &i in &mesh.indices {
            referenced[i as usize] = true;
        }
        for (i, n) in mesh.normals.iter().enumerate() {
            if !referenced[i] {
                continue;
            }
            assert!((n.length() - 1.0).abs() < 1e-5, "normal {i} not unit length");
            // Outward from the sphere: normal roughly parallel to the radius.
            let radial = (mesh.positions[i] - center).normalize();
            assert!(n.dot(radial) > 0.5, "normal {i} points inward");
        }
    }

    #[test]
    fn test_flat_floor_faces_up() {
        let dims = (10, 10, 10);
        let density = fill(dims, |_, y, _| y - 4.5);
        let mesh = extract(&density, &[], dims, [0; 3]);

        assert!(!mesh.is_empty());
        let mut referenced = vec![false; mesh.vertex_count()];
        for &i in &mesh.indices {
            referenced[i as usize] = true;
        }
        for (i, n) in mesh.normals.iter().enumerate() {
            if referenced[i] {
                assert!(n.y > 0.99, "floor normal {n:?} does not face air");
            }
        }
        // Surface sits at the zero crossing between y=4 and y=5.
        for (i, p) in mesh.positions.iter().enumerate() {
            if referenced[i] {
                assert!((p.y - 4.5).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_border_faces_are_discarded() {
        let dims = (10, 6, 10);
        let density = fill(dims, |_, y, _| y - 2.5);
        let full = extract(&density, &[], dims, [0; 3]);
        let trimmed = extract(&density, &[], dims, [2, 0, 2]);

        assert!(trimmed.triangle_count() > 0);
        assert!(trimmed.triangle_count() < full.triangle_count());
        // Vertices are untouched by the discard pass.
        assert_eq!(trimmed.vertex_count(), full.vertex_count());

        // Surviving faces come only from owned cells: with a flat floor,
        // every kept triangle references vertices at x,z in [2, dims-2].
        for &i in &trimmed.indices {
            let p = trimmed.positions[i as usize];
            assert!(p.x >= 1.0 && p.x <= 8.0, "kept face leaks into border at {p:?}");
            assert!(p.z >= 1.0 && p.z <= 8.0, "kept face leaks into border at {p:?}");
        }
    }

    #[test]
    fn test_weights_interpolated_per_vertex() {
        let dims = (6, 6, 6);
        let density = fill(dims, |_, y, _| y - 2.5);
        let weights: Vec<Vec3> = (0..216).map(|i| {
            let y = (i / 6) % 6;
            if y <= 2 { Vec3::new(1.0, 0.0, 0.0) } else { Vec3::new(0.0, 1.0, 0.0) }
        }).collect();
        let mesh = extract(&density, &weights, dims, [0; 3]);

        assert_eq!(mesh.weights.len(), mesh.vertex_count());
        for w in &mesh.weights {
            // Crossing halfway between the two bands blends them evenly.
            assert!((w.x - 0.5).abs() < 1e-4);
            assert!((w.y - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_empty_weights_pass_through() {
        let dims = (6, 6, 6);
        let density = fill(dims, |_, y, _| y - 2.5);
        let mesh = extract(&density, &[], dims, [0; 3]);
        assert!(!mesh.is_empty());
        assert!(mesh.weights.is_empty());
    }

    #[test]
    #[should_panic(expected = "density length")]
    fn test_mismatched_density_length_panics() {
        extract(&[0.0; 10], &[], (4, 4, 4), [0; 3]);
    }

    #[test]
    #[should_panic(expected = "too small")]
    fn test_degenerate_dims_panic() {
        extract(&[0.0; 4], &[], (4, 1, 1), [0; 3]);
    }
}
