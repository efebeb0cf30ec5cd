use std::error::Error;
use std::fs;
use std::path::Path;

use grove_terrain::{ForestParams, SplatParams, TerrainConfig};
use grove_tree::TreeConfig;
use serde::Deserialize;

/// Everything one run needs; every table is optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub splat: SplatParams,
    #[serde(default)]
    pub forest: ForestParams,
    #[serde(default)]
    pub tree: TreeConfig,
}

impl SceneConfig {
    /// One seed for both generators.
    pub fn override_seed(&mut self, seed: f64) {
        self.terrain.params.seed = seed;
        self.tree.seed = seed;
    }
}

pub fn load_scene_from_path(path: &Path) -> Result<SceneConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: SceneConfig = toml::from_str(&s)?;
    Ok(cfg)
}
