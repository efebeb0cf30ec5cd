use rand::{Rng as _, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic random stream. One instance per generation call; never shared.
#[derive(Clone, Debug)]
pub struct Rng {
    inner: ChaCha8Rng,
}

impl Rng {
    /// Seeds from the bit pattern of `seed`. `-0.0` and `0.0` give the same stream.
    pub fn new(seed: f64) -> Self {
        let seed = if seed == 0.0 { 0.0 } else { seed };
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed.to_bits()),
        }
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.inner.r#gen::<f32>()
    }

    /// Uniform in `[floor, ceiling)`; argument order follows the call sites (low, high).
    #[inline]
    pub fn range(&mut self, floor: f32, ceiling: f32) -> f32 {
        (ceiling - floor) * self.next_f32() + floor
    }
}
