//! Seeded randomness and coherent noise for the generators.
#![forbid(unsafe_code)]

pub mod field;
pub mod rng;

pub use field::{DEFAULT_FIELD_SEED, Fractal, NoiseField, SeedSplit};
pub use rng::Rng;
