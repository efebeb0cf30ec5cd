use grove_geom::{Vec2, Vec3, lerp};
use grove_mesh::{MeshBuffer, compute_vertex_normals};
use grove_noise::{DEFAULT_FIELD_SEED, NoiseField};

use crate::config::{TerrainParams, TerrainShape};

/// Regular `(segments + 1)²` height grid centred on the origin, row-major with `iz` outer.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightfield {
    pub width: f32,
    pub depth: f32,
    pub segments: u32,
    pub heights: Vec<f32>,
    /// Flat `x,y,z` stream, one unit normal per grid vertex.
    pub normals: Vec<f32>,
}

impl Heightfield {
    /// Samples and shapes every grid vertex. Parameters are assumed validated.
    pub fn generate(params: &TerrainParams, shape: &TerrainShape) -> Self {
        let n = params.segments as usize + 1;
        let (field, seed) = NoiseField::seeded(DEFAULT_FIELD_SEED, params.seed);
        let mut heights = Vec::with_capacity(n * n);
        for iz in 0..n {
            for ix in 0..n {
                let (x, z) = grid_xz(params.width, params.depth, params.segments, ix, iz);
                let (sx, sz) = (x / params.scale, z / params.scale);
                heights.push(shape_height(&field, shape, sx, sz, seed) * params.height_multiplier);
            }
        }
        if shape.smoothing {
            heights = smooth(&heights, n, shape.smoothing_blend);
        }
        let mut hf = Self {
            width: params.width,
            depth: params.depth,
            segments: params.segments,
            heights,
            normals: Vec::new(),
        };
        hf.normals = compute_vertex_normals(&hf.positions(), &hf.indices());
        hf
    }

    /// Vertices per side.
    #[inline]
    pub fn side(&self) -> usize {
        self.segments as usize + 1
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.heights.len()
    }

    #[inline]
    pub fn height(&self, ix: usize, iz: usize) -> f32 {
        self.heights[iz * self.side() + ix]
    }

    #[inline]
    pub fn vertex(&self, ix: usize, iz: usize) -> Vec3 {
        let (x, z) = grid_xz(self.width, self.depth, self.segments, ix, iz);
        Vec3::new(x, self.height(ix, iz), z)
    }

    pub fn min_height(&self) -> f32 {
        self.heights.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max_height(&self) -> f32 {
        self.heights.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Bilinear height lookup at world `(x, z)`; points outside the footprint clamp to the edge.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let seg = self.segments as f32;
        let fx = ((x / self.width + 0.5) * seg).clamp(0.0, seg);
        let fz = ((z / self.depth + 0.5) * seg).clamp(0.0, seg);
        let ix = (fx.floor() as usize).min(self.segments as usize - 1);
        let iz = (fz.floor() as usize).min(self.segments as usize - 1);
        let tx = fx - ix as f32;
        let tz = fz - iz as f32;
        let near = lerp(self.height(ix, iz), self.height(ix + 1, iz), tx);
        let far = lerp(self.height(ix, iz + 1), self.height(ix + 1, iz + 1), tx);
        lerp(near, far, tz)
    }

    /// Surface UV under world `(x, z)`, the same mapping `to_mesh` writes; clamped to `[0, 1]`.
    pub fn uv_at(&self, x: f32, z: f32) -> Vec2 {
        Vec2::new(
            (x / self.width + 0.5).clamp(0.0, 1.0),
            (0.5 - z / self.depth).clamp(0.0, 1.0),
        )
    }

    pub fn positions(&self) -> Vec<f32> {
        let n = self.side();
        let mut pos = Vec::with_capacity(n * n * 3);
        for iz in 0..n {
            for ix in 0..n {
                let v = self.vertex(ix, iz);
                pos.extend_from_slice(&[v.x, v.y, v.z]);
            }
        }
        pos
    }

    pub fn indices(&self) -> Vec<u32> {
        grid_indices(self.segments)
    }

    /// Surface mesh with positions, normals, and `(ix/seg, 1 - iz/seg)` UVs.
    pub fn to_mesh(&self) -> MeshBuffer {
        let n = self.side();
        let seg = self.segments as f32;
        let mut mb = MeshBuffer::new();
        mb.pos.reserve(n * n * 3);
        mb.norm.reserve(n * n * 3);
        mb.uv.reserve(n * n * 2);
        for iz in 0..n {
            for ix in 0..n {
                let i = iz * n + ix;
                let nrm = Vec3::new(
                    self.normals[i * 3],
                    self.normals[i * 3 + 1],
                    self.normals[i * 3 + 2],
                );
                let uv = Vec2::new(ix as f32 / seg, 1.0 - iz as f32 / seg);
                mb.push_vertex(self.vertex(ix, iz), nrm, uv);
            }
        }
        mb.idx = self.indices();
        mb
    }
}

#[inline]
fn grid_xz(width: f32, depth: f32, segments: u32, ix: usize, iz: usize) -> (f32, f32) {
    let seg = segments as f32;
    (
        ix as f32 * width / seg - width * 0.5,
        iz as f32 * depth / seg - depth * 0.5,
    )
}

fn shape_height(field: &NoiseField, shape: &TerrainShape, x: f32, z: f32, seed: f32) -> f32 {
    let base = field.fractal_with(x, z, seed, &shape.fractal);
    let mut h = if shape.ridge {
        lerp(base, 1.0 - base.abs(), shape.ridge_mix)
    } else {
        base
    };
    if shape.valley {
        let valley = (x * 0.5).sin() * (z * 0.5).cos() * field.sample(x * 0.1, 0.0, z * 0.1 + seed) * 8.0;
        h += shape.valley_weight * valley;
    }
    h
}

/// One Jacobi pass: every vertex moves `blend` of the way toward the mean of its
/// (up to eight) neighbours, all read from the input grid.
fn smooth(heights: &[f32], n: usize, blend: f32) -> Vec<f32> {
    let mut out = Vec::with_capacity(heights.len());
    for iz in 0..n {
        for ix in 0..n {
            let mut sum = 0.0;
            let mut count = 0u32;
            for dz in -1i32..=1 {
                for dx in -1i32..=1 {
                    if dx == 0 && dz == 0 {
                        continue;
                    }
                    let (nx, nz) = (ix as i32 + dx, iz as i32 + dz);
                    if nx < 0 || nz < 0 || nx >= n as i32 || nz >= n as i32 {
                        continue;
                    }
                    sum += heights[nz as usize * n + nx as usize];
                    count += 1;
                }
            }
            let h = heights[iz * n + ix];
            if count == 0 {
                out.push(h);
            } else {
                out.push(lerp(h, sum / count as f32, blend));
            }
        }
    }
    out
}

/// Two counter-clockwise (seen from +Y) triangles per grid cell.
pub fn grid_indices(segments: u32) -> Vec<u32> {
    let n = segments + 1;
    let mut idx = Vec::with_capacity((segments * segments * 6) as usize);
    for iz in 0..segments {
        for ix in 0..segments {
            let a = iz * n + ix;
            let b = (iz + 1) * n + ix;
            let c = (iz + 1) * n + ix + 1;
            let d = iz * n + ix + 1;
            idx.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(segments: u32) -> Heightfield {
        let params = TerrainParams {
            segments,
            seed: 42.0,
            ..TerrainParams::default()
        };
        Heightfield::generate(&params, &TerrainShape::default())
    }

    #[test]
    fn grid_faces_up() {
        let hf = Heightfield {
            width: 2.0,
            depth: 2.0,
            segments: 2,
            heights: vec![0.0; 9],
            normals: Vec::new(),
        };
        let pos = hf.positions();
        let at = |i: u32| Vec3::new(pos[i as usize * 3], pos[i as usize * 3 + 1], pos[i as usize * 3 + 2]);
        for tri in hf.indices().chunks_exact(3) {
            let n = (at(tri[1]) - at(tri[0])).cross(at(tri[2]) - at(tri[0]));
            assert!(n.y > 0.0);
        }
    }

    #[test]
    fn corners_span_footprint() {
        let hf = small(4);
        assert_eq!(hf.vertex(0, 0).x, -50.0);
        assert_eq!(hf.vertex(0, 0).z, -50.0);
        assert_eq!(hf.vertex(4, 4).x, 50.0);
        assert_eq!(hf.vertex(4, 4).z, 50.0);
    }

    #[test]
    fn height_at_matches_grid_vertices() {
        let hf = small(8);
        for iz in 0..=8 {
            for ix in 0..=8 {
                let v = hf.vertex(ix, iz);
                assert!((hf.height_at(v.x, v.z) - v.y).abs() < 1e-4);
            }
        }
        // Outside the footprint clamps to the corner.
        assert_eq!(hf.height_at(-1e4, -1e4), hf.height(0, 0));
    }

    #[test]
    fn smoothing_reads_original_heights() {
        let mut h = vec![0.0; 9];
        h[4] = 9.0;
        let out = smooth(&h, 3, 1.0);
        // Centre averages eight zero neighbours; corners see the unsmoothed centre.
        assert_eq!(out[4], 0.0);
        assert_eq!(out[0], 3.0);
    }

    #[test]
    fn smoothing_narrows_range() {
        let params = TerrainParams {
            segments: 16,
            seed: 5.0,
            ..TerrainParams::default()
        };
        let rough = TerrainShape {
            smoothing: false,
            ..TerrainShape::default()
        };
        let a = Heightfield::generate(&params, &rough);
        let b = Heightfield::generate(&params, &TerrainShape::default());
        assert!(b.max_height() - b.min_height() <= a.max_height() - a.min_height());
    }

    fn distinct_heights_down_column(seed: f64) -> usize {
        let params = TerrainParams {
            segments: 64,
            seed,
            ..TerrainParams::default()
        };
        let shape = TerrainShape {
            smoothing: false,
            valley: false,
            ..TerrainShape::default()
        };
        let hf = Heightfield::generate(&params, &shape);
        let mut column: Vec<u32> = (0..hf.side()).map(|iz| hf.height(10, iz).to_bits()).collect();
        column.sort_unstable();
        column.dedup();
        column.len()
    }

    #[test]
    fn large_seeds_keep_row_resolution() {
        assert!(distinct_heights_down_column(42.0) >= 64);
        assert!(distinct_heights_down_column(1e8) >= 64);
        assert!(distinct_heights_down_column(-3.5e12) >= 64);
    }

    #[test]
    fn uv_layout() {
        let hf = small(2);
        let mb = hf.to_mesh();
        assert_eq!(&mb.uv[0..2], &[0.0, 1.0]);
        let last = mb.uv.len() - 2;
        assert_eq!(&mb.uv[last..], &[1.0, 0.0]);
        for i in 0..mb.vertex_count() {
            let p = mb.position(i);
            let uv = hf.uv_at(p.x, p.z);
            assert!((uv.x - mb.uv[i * 2]).abs() < 1e-6);
            assert!((uv.y - mb.uv[i * 2 + 1]).abs() < 1e-6);
        }
    }
}
