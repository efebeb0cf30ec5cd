//! Topology-only stitching. Nothing here draws randomness or touches vertex data it wasn't given.

use grove_geom::Vec3;

/// Two counter-clockwise triangles over four consecutive vertices starting at `base`.
#[inline]
pub fn quad_indices(base: u32) -> [u32; 6] {
    [base, base + 1, base + 2, base, base + 2, base + 3]
}

/// Triangle list for an open cylinder made of `sections + 1` rings of `segments + 1` vertices
/// (the last vertex of each ring duplicates the first for UV wrap). Outward-facing when rings
/// advance along the local +Y axis and ring vertices run from +X toward +Z.
pub fn tube_indices(offset: u32, sections: u32, segments: u32) -> Vec<u32> {
    let n = segments + 1;
    let mut idx = Vec::with_capacity((sections * segments * 6) as usize);
    for i in 0..sections {
        for j in 0..segments {
            let v1 = offset + i * n + j;
            let v2 = v1 + 1;
            let v3 = v1 + n;
            let v4 = v2 + n;
            idx.extend_from_slice(&[v1, v3, v2, v2, v3, v4]);
        }
    }
    idx
}

/// Unit octahedron stencil: bottom, top, then the four equatorial points.
pub const OCTAHEDRON_STENCIL: [[f32; 3]; 6] = [
    [0.0, -1.0, 0.0],
    [0.0, 1.0, 0.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, -1.0],
    [1.0, 0.0, -1.0],
];

/// Eight outward triangles over the six stencil vertices starting at `base`.
pub fn octahedron_indices(base: u32) -> [u32; 24] {
    const TRIS: [u32; 24] = [
        0, 3, 2, 0, 5, 3, 0, 4, 5, 0, 2, 4, //
        1, 2, 3, 1, 3, 5, 1, 5, 4, 1, 4, 2,
    ];
    let mut out = TRIS;
    for i in out.iter_mut() {
        *i += base;
    }
    out
}

/// Area-weighted vertex normals for an indexed triangle list.
/// Vertices referenced by no (non-degenerate) triangle get +Y.
pub fn compute_vertex_normals(pos: &[f32], idx: &[u32]) -> Vec<f32> {
    let n = pos.len() / 3;
    let mut acc = vec![Vec3::ZERO; n];
    let at = |i: usize| Vec3::new(pos[i * 3], pos[i * 3 + 1], pos[i * 3 + 2]);
    for tri in idx.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        // Unnormalized cross product; its length is twice the triangle area.
        let face = (at(b) - at(a)).cross(at(c) - at(a));
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }
    let mut out = Vec::with_capacity(n * 3);
    for v in acc {
        let nrm = v.try_normalize().unwrap_or(Vec3::Y);
        out.extend_from_slice(&[nrm.x, nrm.y, nrm.z]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tube_index_count_and_range() {
        let idx = tube_indices(10, 3, 4);
        assert_eq!(idx.len(), 3 * 4 * 6);
        let max = *idx.iter().max().unwrap();
        // (sections + 1) rings of (segments + 1) vertices.
        assert_eq!(max, 10 + 4 * 5 - 1);
        assert!(idx.iter().all(|&i| i >= 10));
    }

    #[test]
    fn octahedron_faces_outward() {
        let idx = octahedron_indices(0);
        for tri in idx.chunks_exact(3) {
            let p = |i: u32| Vec3::from_array(OCTAHEDRON_STENCIL[i as usize]);
            let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
            let n = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(n.dot(centroid) > 0.0, "inward triangle {:?}", tri);
        }
    }

    #[test]
    fn flat_grid_normals_point_up() {
        let pos = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0];
        let n = compute_vertex_normals(&pos, &[0, 1, 2]);
        for v in n.chunks_exact(3) {
            assert!((v[1] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn orphan_vertex_gets_up_normal() {
        let pos = [0.0; 6];
        let n = compute_vertex_normals(&pos, &[]);
        assert_eq!(n, vec![0.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
    }
}
