//! Mesh buffers and the stitching helpers that build their topology.
#![forbid(unsafe_code)]

pub mod assembly;
pub mod mesh_buffer;

pub use assembly::{
    OCTAHEDRON_STENCIL, compute_vertex_normals, octahedron_indices, quad_indices, tube_indices,
};
pub use mesh_buffer::{MeshBuffer, MeshError};
