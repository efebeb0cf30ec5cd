use grove_geom::Vec3;
use grove_noise::{Fractal, NoiseField};

use crate::TerrainMeshes;
use crate::config::ForestParams;
use crate::error::TerrainError;

/// Gradient table for the forest mask, kept apart from the biome table.
pub const FOREST_FIELD_SEED: i32 = 9157;
const FOREST_MASK_FRACTAL: Fractal = Fractal::new(3, 0.5, 2.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreePlacement {
    pub position: Vec3,
    pub scale: f32,
    /// Seed for this tree's own generation.
    pub seed: f64,
}

/// Candidate trees on a `resolution²` cell grid over the footprint. A cell keeps its tree when
/// the splat texel rendered under its centre, tiling included, is pure grass and the forest
/// mask clears the density threshold.
pub fn plan_forest(
    terrain: &TerrainMeshes,
    params: &ForestParams,
    seed: f64,
) -> Result<Vec<TreePlacement>, TerrainError> {
    params.validate()?;
    let splat = &terrain.splat;
    let hf = &terrain.heightfield;
    let res = splat.resolution;
    let (mask, mask_seed) = NoiseField::seeded(FOREST_FIELD_SEED, seed);
    let mut out = Vec::new();
    'scan: for j in (0..res).step_by(params.stride as usize) {
        for i in (0..res).step_by(params.stride as usize) {
            if out.len() >= params.max_trees {
                break 'scan;
            }
            let x = ((i as f32 + 0.5) / res as f32 - 0.5) * hf.width;
            let z = ((j as f32 + 0.5) / res as f32 - 0.5) * hf.depth;
            if splat.surface_texel(hf.uv_at(x, z))[1] != 255 {
                continue;
            }
            let m = mask.fractal_with(
                i as f32 * params.noise_scale,
                j as f32 * params.noise_scale,
                mask_seed,
                &FOREST_MASK_FRACTAL,
            );
            if m <= params.density_threshold {
                continue;
            }
            out.push(TreePlacement {
                position: Vec3::new(x, hf.height_at(x, z), z),
                scale: params.tree_scale,
                seed: seed + out.len() as f64,
            });
        }
    }
    Ok(out)
}
