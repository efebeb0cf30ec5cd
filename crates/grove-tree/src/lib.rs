//! Seeded recursive tree growth: branch tubes, leaf billboards, and ornaments.
#![forbid(unsafe_code)]

pub mod branch;
pub mod error;
pub mod generator;
pub mod options;

pub use branch::{Branch, RADIUS_EPSILON, Section};
pub use error::TreeError;
pub use generator::{TreeMeshes, TreeStats, generate};
pub use options::{
    BarkOptions, Billboard, BranchConfig, ForceOptions, LeafOptions, LevelOptions, TreeConfig,
    TreeOptions, TreeType,
};
