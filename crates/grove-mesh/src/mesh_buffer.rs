use grove_geom::{Aabb, Vec2, Vec3};

use crate::assembly::quad_indices;

/// Parallel vertex streams plus a triangle list. `norm` and `uv` are empty when absent.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshBuffer {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    IndexOutOfRange { index: u32, vertex_count: usize },
    RaggedIndices { len: usize },
    AttributeLength {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(
                f,
                "index {} out of range for {} vertices",
                index, vertex_count
            ),
            MeshError::RaggedIndices { len } => {
                write!(f, "index count {} is not a multiple of 3", len)
            }
            MeshError::AttributeLength {
                attribute,
                expected,
                found,
            } => write!(
                f,
                "{} stream has {} floats, expected {}",
                attribute, found, expected
            ),
        }
    }
}

impl std::error::Error for MeshError {}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 3);
        self.norm.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.idx.reserve(n_quads * 6);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn has_normals(&self) -> bool {
        !self.norm.is_empty()
    }

    #[inline]
    pub fn has_uvs(&self) -> bool {
        !self.uv.is_empty()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Index of the next vertex to be pushed.
    #[inline]
    pub fn next_index(&self) -> u32 {
        self.vertex_count() as u32
    }

    #[inline]
    pub fn push_position(&mut self, p: Vec3) {
        self.pos.extend_from_slice(&[p.x, p.y, p.z]);
    }

    #[inline]
    pub fn push_vertex(&mut self, p: Vec3, n: Vec3, uv: Vec2) {
        self.pos.extend_from_slice(&[p.x, p.y, p.z]);
        self.norm.extend_from_slice(&[n.x, n.y, n.z]);
        self.uv.extend_from_slice(&[uv.x, uv.y]);
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(self.pos[i * 3], self.pos[i * 3 + 1], self.pos[i * 3 + 2])
    }

    #[inline]
    pub fn normal(&self, i: usize) -> Vec3 {
        Vec3::new(self.norm[i * 3], self.norm[i * 3 + 1], self.norm[i * 3 + 2])
    }

    /// Appends a quad `a, b, c, d` (in perimeter order) whose front face points along `n`.
    /// The winding is flipped when the given order faces away from `n`.
    pub fn add_quad_uv(
        &mut self,
        a: Vec3,
        b: Vec3,
        c: Vec3,
        d: Vec3,
        n: Vec3,
        mut uvs: [(f32, f32); 4],
    ) {
        let base = self.next_index();
        let mut vs = [a, b, c, d];
        let cross = (vs[1] - vs[0]).cross(vs[2] - vs[0]);
        if cross.dot(n) < 0.0 {
            vs.swap(1, 3);
            uvs.swap(1, 3);
        }
        for i in 0..4 {
            self.push_vertex(vs[i], n, Vec2::new(uvs[i].0, uvs[i].1));
        }
        self.idx.extend_from_slice(&quad_indices(base));
    }

    /// Appends `other` with its positions scaled by `scale` then moved by `offset`.
    /// Streams absent on either side are dropped from the result.
    pub fn append_transformed(&mut self, other: &MeshBuffer, offset: Vec3, scale: f32) {
        let base = self.next_index();
        let keep_norm = (self.is_empty() || self.has_normals()) && other.has_normals();
        let keep_uv = (self.is_empty() || self.has_uvs()) && other.has_uvs();
        for p in other.pos.chunks_exact(3) {
            let v = Vec3::new(p[0], p[1], p[2]) * scale + offset;
            self.push_position(v);
        }
        if keep_norm {
            self.norm.extend_from_slice(&other.norm);
        } else {
            self.norm.clear();
        }
        if keep_uv {
            self.uv.extend_from_slice(&other.uv);
        } else {
            self.uv.clear();
        }
        self.idx.extend(other.idx.iter().map(|&i| i + base));
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_positions(&self.pos)
    }

    /// Checks stream lengths and that every index names an existing vertex.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.pos.len() % 3 != 0 {
            return Err(MeshError::AttributeLength {
                attribute: "position",
                expected: self.vertex_count() * 3,
                found: self.pos.len(),
            });
        }
        let n = self.vertex_count();
        if self.has_normals() && self.norm.len() != n * 3 {
            return Err(MeshError::AttributeLength {
                attribute: "normal",
                expected: n * 3,
                found: self.norm.len(),
            });
        }
        if self.has_uvs() && self.uv.len() != n * 2 {
            return Err(MeshError::AttributeLength {
                attribute: "uv",
                expected: n * 2,
                found: self.uv.len(),
            });
        }
        if self.idx.len() % 3 != 0 {
            return Err(MeshError::RaggedIndices {
                len: self.idx.len(),
            });
        }
        if let Some(&index) = self.idx.iter().find(|&&i| i as usize >= n) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: n,
            });
        }
        Ok(())
    }
}
