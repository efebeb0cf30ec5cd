use grove_geom::Vec2;
use grove_noise::NoiseField;

use crate::config::{SplatMode, SplatParams};

/// Gradient table for biome noise, kept apart from the height field's table.
pub const SPLAT_FIELD_SEED: i32 = 7331;

pub const SAND: [u8; 4] = [255, 0, 0, 255];
pub const GRASS: [u8; 4] = [0, 255, 0, 255];
pub const ROCK: [u8; 4] = [0, 0, 255, 255];

/// Square RGBA8 biome raster; R = sand, G = grass, B = rock.
///
/// Rows run top to bottom as in the exported PNG, so row 0 sits at v = 1 and the
/// last row at v = 0, matching the surface UVs.
#[derive(Clone, Debug, PartialEq)]
pub struct SplatMap {
    pub resolution: u32,
    pub data: Vec<u8>,
    /// Texture repeats across the terrain footprint on X and Z.
    pub repeat: [f32; 2],
    pub mode: SplatMode,
}

impl SplatMap {
    pub fn generate(params: &SplatParams, seed: f64, width: f32, depth: f32) -> Self {
        let (field, seed) = NoiseField::seeded(SPLAT_FIELD_SEED, seed);
        let res = params.resolution as usize;
        let mut data = Vec::with_capacity(res * res * 4);
        for j in 0..res {
            for i in 0..res {
                let x = i as f32 * params.noise_scale;
                let z = j as f32 * params.noise_scale;
                let v = (field.fractal_with(x, z, seed, &params.fractal) + 1.0) * 0.5;
                let texel = match params.mode {
                    SplatMode::Exclusive => classify(v, params.sand_threshold, params.grass_threshold),
                    SplatMode::Weighted => weigh(v, params.sand_threshold, params.grass_threshold),
                };
                data.extend_from_slice(&texel);
            }
        }
        Self {
            resolution: params.resolution,
            data,
            repeat: [width / params.tile_size, depth / params.tile_size],
            mode: params.mode,
        }
    }

    #[inline]
    pub fn texel(&self, i: u32, j: u32) -> [u8; 4] {
        let o = (j as usize * self.resolution as usize + i as usize) * 4;
        [self.data[o], self.data[o + 1], self.data[o + 2], self.data[o + 3]]
    }

    /// Nearest texel for a texture-space UV pair; coordinates wrap.
    pub fn texel_at_uv(&self, u: f32, v: f32) -> [u8; 4] {
        let res = self.resolution;
        let i = ((u.rem_euclid(1.0) * res as f32) as u32).min(res - 1);
        let j = (((1.0 - v.rem_euclid(1.0)) * res as f32) as u32).min(res - 1);
        self.texel(i, j)
    }

    /// Texel rendered at a surface UV once the raster is tiled `repeat` times.
    #[inline]
    pub fn surface_texel(&self, uv: Vec2) -> [u8; 4] {
        self.texel_at_uv(uv.x * self.repeat[0], uv.y * self.repeat[1])
    }
}

fn classify(v: f32, sand: f32, grass: f32) -> [u8; 4] {
    if v < sand {
        SAND
    } else if v < grass {
        GRASS
    } else {
        ROCK
    }
}

/// Tent weights around each band centre, scaled to sum to 255.
fn weigh(v: f32, sand: f32, grass: f32) -> [u8; 4] {
    let centres = [sand * 0.5, (sand + grass) * 0.5, (grass + 1.0) * 0.5];
    let reach = (centres[1] - centres[0]).max(centres[2] - centres[1]);
    let w = centres.map(|c| (1.0 - (v - c).abs() / reach).max(0.0));
    let sum: f32 = w.iter().sum();
    if sum <= 0.0 {
        return classify(v, sand, grass);
    }
    let q = w.map(|x| (x / sum * 255.0).round() as u8);
    [q[0], q[1], q[2], 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusive_bands() {
        assert_eq!(classify(0.1, 0.33, 0.66), SAND);
        assert_eq!(classify(0.5, 0.33, 0.66), GRASS);
        assert_eq!(classify(0.66, 0.33, 0.66), ROCK);
    }

    #[test]
    fn weighted_sums_to_255() {
        for k in 0..=100 {
            let t = weigh(k as f32 / 100.0, 0.33, 0.66);
            let sum = t[0] as i32 + t[1] as i32 + t[2] as i32;
            assert!((sum - 255).abs() <= 2, "v={} sum={}", k, sum);
            assert_eq!(t[3], 255);
        }
    }

    #[test]
    fn weighted_peaks_at_centre() {
        let t = weigh(0.495, 0.33, 0.66);
        assert!(t[1] > t[0] && t[1] > t[2]);
    }

    #[test]
    fn raster_size_and_repeat() {
        let params = SplatParams {
            resolution: 16,
            ..SplatParams::default()
        };
        let map = SplatMap::generate(&params, 1.0, 200.0, 50.0);
        assert_eq!(map.data.len(), 16 * 16 * 4);
        assert_eq!(map.repeat, [2.0, 0.5]);
        assert_eq!(map.texel_at_uv(1.25, -0.75), map.texel(4, 12));
    }

    #[test]
    fn rows_run_top_down() {
        let params = SplatParams {
            resolution: 8,
            ..SplatParams::default()
        };
        let map = SplatMap::generate(&params, 3.0, 100.0, 100.0);
        assert_eq!(map.texel_at_uv(0.0, 0.99), map.texel(0, 0));
        assert_eq!(map.texel_at_uv(0.0, 0.0), map.texel(0, 7));
        assert_eq!(map.texel_at_uv(0.99, 0.01), map.texel(7, 7));
    }

    #[test]
    fn surface_texel_tiles_by_repeat() {
        let params = SplatParams {
            resolution: 8,
            ..SplatParams::default()
        };
        let map = SplatMap::generate(&params, 3.0, 400.0, 200.0);
        assert_eq!(map.repeat, [4.0, 2.0]);
        // u = 0.3 lands 0.2 into the second tile; v = 0.3 lands 0.6 into the first.
        assert_eq!(map.surface_texel(Vec2::new(0.3, 0.3)), map.texel(1, 3));
    }
}
