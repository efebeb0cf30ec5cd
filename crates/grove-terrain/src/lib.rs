//! Seeded heightfield terrain, its base slab and skirt, and the biome splat raster.
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod forest;
pub mod heightfield;
pub mod skirt;
pub mod splat;

use std::time::Instant;

use grove_mesh::MeshBuffer;

pub use config::{ForestParams, SplatMode, SplatParams, TerrainConfig, TerrainParams, TerrainShape};
pub use error::TerrainError;
pub use forest::{TreePlacement, plan_forest};
pub use heightfield::Heightfield;
pub use splat::SplatMap;

#[derive(Clone, Debug)]
pub struct TerrainMeshes {
    pub heightfield: Heightfield,
    pub surface: MeshBuffer,
    pub base: MeshBuffer,
    pub skirt: MeshBuffer,
    pub splat: SplatMap,
}

impl TerrainMeshes {
    /// Top of the base slab; the skirt ends here.
    pub fn base_height(&self) -> f32 {
        self.base.bounds().max.y
    }
}

/// Builds every terrain output for one request. Fails before allocating on bad input.
pub fn generate(
    params: &TerrainParams,
    shape: &TerrainShape,
    splat: &SplatParams,
) -> Result<TerrainMeshes, TerrainError> {
    params.validate()?;
    shape.validate()?;
    splat.validate()?;

    let start = Instant::now();
    let heightfield = Heightfield::generate(params, shape);
    let surface = heightfield.to_mesh();
    let base_height = heightfield.min_height() - shape.base_offset;
    let base = skirt::base_slab(params.width, params.depth, base_height, shape.base_thickness);
    let skirt = skirt::skirt(&heightfield, base_height);
    let splat = SplatMap::generate(splat, params.seed, params.width, params.depth);

    debug_assert!(surface.validate().is_ok());
    debug_assert!(base.validate().is_ok());
    debug_assert!(skirt.validate().is_ok());

    log::info!(
        target: "perf",
        "ms={} terrain_generate segments={} verts={} tris={} splat_res={} seed={}",
        start.elapsed().as_millis(),
        params.segments,
        surface.vertex_count(),
        surface.triangle_count(),
        splat.resolution,
        params.seed
    );
    Ok(TerrainMeshes {
        heightfield,
        surface,
        base,
        skirt,
        splat,
    })
}
