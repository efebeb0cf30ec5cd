use fastnoise_lite::{FastNoiseLite, NoiseType};
use serde::Deserialize;

/// Gradient table seed used when a caller has no reason to pick one.
pub const DEFAULT_FIELD_SEED: i32 = 1337;

/// Octave layout for fBm sums.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Fractal {
    #[serde(default = "d_oct")]
    pub octaves: u32,
    #[serde(default = "d_pers")]
    pub persistence: f32,
    #[serde(default = "d_lac")]
    pub lacunarity: f32,
}
fn d_oct() -> u32 {
    4
}
fn d_pers() -> f32 {
    0.5
}
fn d_lac() -> f32 {
    2.0
}
impl Default for Fractal {
    fn default() -> Self {
        Self {
            octaves: d_oct(),
            persistence: d_pers(),
            lacunarity: d_lac(),
        }
    }
}

impl Fractal {
    pub const fn new(octaves: u32, persistence: f32, lacunarity: f32) -> Self {
        Self {
            octaves,
            persistence,
            lacunarity,
        }
    }
}

/// A caller seed folded into a gradient table choice plus a sub-unit Z shift.
/// Any finite seed keeps full `f32` coordinate precision; seeds that differ by a
/// multiple of 2^32 share a table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedSplit {
    pub table: i32,
    pub offset: f32,
}

impl SeedSplit {
    pub fn new(base: i32, seed: f64) -> Self {
        let whole = seed.floor();
        let salt = whole.rem_euclid(4_294_967_296.0) as u32 as i32;
        Self {
            table: base.wrapping_add(salt),
            offset: (seed - whole) as f32,
        }
    }
}

/// Perlin gradient noise sampled at unit frequency; callers scale coordinates themselves.
pub struct NoiseField {
    noise: FastNoiseLite,
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD_SEED)
    }
}

impl NoiseField {
    pub fn new(seed: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::Perlin));
        noise.set_frequency(Some(1.0));
        Self { noise }
    }

    /// Field for `seed` salted from `base`, and the Z shift to pass as `seed_offset`.
    pub fn seeded(base: i32, seed: f64) -> (Self, f32) {
        let split = SeedSplit::new(base, seed);
        (Self::new(split.table), split.offset)
    }

    /// Raw sample in `[-1, 1]`.
    #[inline]
    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        self.noise.get_noise_3d(x, y, z)
    }

    #[inline]
    pub fn sample_2d(&self, x: f32, z: f32) -> f32 {
        self.sample(x, 0.0, z)
    }

    /// fBm over the XZ plane; `seed_offset` shifts the Z axis so one table serves many seeds.
    /// Normalized by the summed amplitude, so the result stays in `[-1, 1]`.
    pub fn fractal(
        &self,
        x: f32,
        z: f32,
        seed_offset: f32,
        octaves: u32,
        persistence: f32,
        lacunarity: f32,
    ) -> f32 {
        let mut amp = 1.0_f32;
        let mut freq = 1.0_f32;
        let mut sum = 0.0_f32;
        let mut max_amp = 0.0_f32;
        for _ in 0..octaves.max(1) {
            sum += self.sample(x * freq, 0.0, z * freq + seed_offset) * amp;
            max_amp += amp;
            amp *= persistence;
            freq *= lacunarity;
        }
        if max_amp > 0.0 { sum / max_amp } else { sum }
    }

    #[inline]
    pub fn fractal_with(&self, x: f32, z: f32, seed_offset: f32, f: &Fractal) -> f32 {
        self.fractal(x, z, seed_offset, f.octaves, f.persistence, f.lacunarity)
    }
}
