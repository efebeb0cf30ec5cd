use grove_geom::Vec3;
use grove_mesh::MeshBuffer;

use crate::heightfield::Heightfield;

const UV_FULL: [(f32, f32); 4] = [(0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)];

/// Axis-aligned box under the whole footprint with its top face at `base_height`.
pub fn base_slab(width: f32, depth: f32, base_height: f32, thickness: f32) -> MeshBuffer {
    let (hx, hz) = (width * 0.5, depth * 0.5);
    let (top, bot) = (base_height, base_height - thickness);
    let p = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
    let mut mb = MeshBuffer::new();
    mb.reserve_quads(6);
    // +Y / -Y
    mb.add_quad_uv(p(-hx, top, -hz), p(-hx, top, hz), p(hx, top, hz), p(hx, top, -hz), Vec3::Y, UV_FULL);
    mb.add_quad_uv(p(-hx, bot, -hz), p(hx, bot, -hz), p(hx, bot, hz), p(-hx, bot, hz), Vec3::NEG_Y, UV_FULL);
    // +X / -X
    mb.add_quad_uv(p(hx, top, -hz), p(hx, top, hz), p(hx, bot, hz), p(hx, bot, -hz), Vec3::X, UV_FULL);
    mb.add_quad_uv(p(-hx, top, hz), p(-hx, top, -hz), p(-hx, bot, -hz), p(-hx, bot, hz), Vec3::NEG_X, UV_FULL);
    // +Z / -Z
    mb.add_quad_uv(p(hx, top, hz), p(-hx, top, hz), p(-hx, bot, hz), p(hx, bot, hz), Vec3::Z, UV_FULL);
    mb.add_quad_uv(p(-hx, top, -hz), p(hx, top, -hz), p(hx, bot, -hz), p(-hx, bot, -hz), Vec3::NEG_Z, UV_FULL);
    mb
}

/// Vertical wall from each border edge of the heightfield down to `base_height`.
/// Every quad owns its four vertices; `4 * segments` quads in total.
pub fn skirt(hf: &Heightfield, base_height: f32) -> MeshBuffer {
    let seg = hf.segments as usize;
    let mut mb = MeshBuffer::new();
    mb.reserve_quads(seg * 4);
    let mut wall = |a: Vec3, b: Vec3, n: Vec3| {
        let (da, db) = (Vec3::new(a.x, base_height, a.z), Vec3::new(b.x, base_height, b.z));
        mb.add_quad_uv(a, b, db, da, n, UV_FULL);
    };
    for i in 0..seg {
        wall(hf.vertex(i, 0), hf.vertex(i + 1, 0), Vec3::NEG_Z);
        wall(hf.vertex(i, seg), hf.vertex(i + 1, seg), Vec3::Z);
        wall(hf.vertex(0, i), hf.vertex(0, i + 1), Vec3::NEG_X);
        wall(hf.vertex(seg, i), hf.vertex(seg, i + 1), Vec3::X);
    }
    mb
}
