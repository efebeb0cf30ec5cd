use grove_noise::Fractal;
use serde::Deserialize;

use crate::error::TerrainError;

/// The `[terrain]` table: footprint and seed inline, shaping under `[terrain.shape]`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TerrainConfig {
    #[serde(flatten)]
    pub params: TerrainParams,
    #[serde(default)]
    pub shape: TerrainShape,
}

/// World footprint, grid resolution, and the seed for one terrain.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TerrainParams {
    #[serde(default = "default_extent")]
    pub width: f32,
    #[serde(default = "default_extent")]
    pub depth: f32,
    #[serde(default = "default_segments")]
    pub segments: u32,
    /// Horizontal divisor applied before sampling noise.
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default = "default_height_multiplier")]
    pub height_multiplier: f32,
    #[serde(default)]
    pub seed: f64,
}
fn default_extent() -> f32 {
    100.0
}
fn default_segments() -> u32 {
    100
}
fn default_scale() -> f32 {
    10.0
}
fn default_height_multiplier() -> f32 {
    10.0
}
impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            width: default_extent(),
            depth: default_extent(),
            segments: default_segments(),
            scale: default_scale(),
            height_multiplier: default_height_multiplier(),
            seed: 0.0,
        }
    }
}

impl TerrainParams {
    pub fn validate(&self) -> Result<(), TerrainError> {
        positive("width", self.width)?;
        positive("depth", self.depth)?;
        if self.segments < 1 {
            return Err(TerrainError::invalid(
                "segments",
                "must be at least 1",
                self.segments as f64,
            ));
        }
        if !self.scale.is_finite() || self.scale == 0.0 {
            return Err(TerrainError::invalid(
                "scale",
                "must be finite and non-zero",
                self.scale as f64,
            ));
        }
        finite("height_multiplier", self.height_multiplier)?;
        if !self.seed.is_finite() {
            return Err(TerrainError::invalid("seed", "must be finite", self.seed));
        }
        Ok(())
    }
}

/// Height shaping switches and constants.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TerrainShape {
    #[serde(default = "default_height_fractal")]
    pub fractal: Fractal,
    #[serde(default = "default_true")]
    pub ridge: bool,
    #[serde(default = "default_ridge_mix")]
    pub ridge_mix: f32,
    #[serde(default = "default_true")]
    pub valley: bool,
    #[serde(default = "default_valley_weight")]
    pub valley_weight: f32,
    #[serde(default = "default_true")]
    pub smoothing: bool,
    #[serde(default = "default_smoothing_blend")]
    pub smoothing_blend: f32,
    /// Distance from the lowest vertex down to the top of the base slab.
    #[serde(default = "default_one")]
    pub base_offset: f32,
    #[serde(default = "default_one")]
    pub base_thickness: f32,
}
fn default_height_fractal() -> Fractal {
    Fractal::new(8, 0.5, 2.0)
}
fn default_true() -> bool {
    true
}
fn default_ridge_mix() -> f32 {
    0.3
}
fn default_valley_weight() -> f32 {
    0.1
}
fn default_smoothing_blend() -> f32 {
    0.7
}
fn default_one() -> f32 {
    1.0
}
impl Default for TerrainShape {
    fn default() -> Self {
        Self {
            fractal: default_height_fractal(),
            ridge: true,
            ridge_mix: default_ridge_mix(),
            valley: true,
            valley_weight: default_valley_weight(),
            smoothing: true,
            smoothing_blend: default_smoothing_blend(),
            base_offset: default_one(),
            base_thickness: default_one(),
        }
    }
}

impl TerrainShape {
    pub fn validate(&self) -> Result<(), TerrainError> {
        fractal("shape.fractal", &self.fractal)?;
        unit("shape.ridge_mix", self.ridge_mix)?;
        finite("shape.valley_weight", self.valley_weight)?;
        unit("shape.smoothing_blend", self.smoothing_blend)?;
        if !self.base_offset.is_finite() || self.base_offset < 0.0 {
            return Err(TerrainError::invalid(
                "shape.base_offset",
                "must be finite and non-negative",
                self.base_offset as f64,
            ));
        }
        positive("shape.base_thickness", self.base_thickness)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplatMode {
    /// Exactly one of R/G/B saturated per texel.
    #[default]
    Exclusive,
    /// Continuous weights summing to 255.
    Weighted,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SplatParams {
    #[serde(default = "default_splat_resolution")]
    pub resolution: u32,
    /// Noise units per texel; independent of the terrain's world size.
    #[serde(default = "default_splat_noise_scale")]
    pub noise_scale: f32,
    #[serde(default)]
    pub fractal: Fractal,
    #[serde(default = "default_sand_threshold")]
    pub sand_threshold: f32,
    #[serde(default = "default_grass_threshold")]
    pub grass_threshold: f32,
    /// World units covered by one repeat of the raster.
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    #[serde(default)]
    pub mode: SplatMode,
}
fn default_splat_resolution() -> u32 {
    256
}
fn default_splat_noise_scale() -> f32 {
    0.05
}
fn default_sand_threshold() -> f32 {
    0.33
}
fn default_grass_threshold() -> f32 {
    0.66
}
fn default_tile_size() -> f32 {
    100.0
}
impl Default for SplatParams {
    fn default() -> Self {
        Self {
            resolution: default_splat_resolution(),
            noise_scale: default_splat_noise_scale(),
            fractal: Fractal::default(),
            sand_threshold: default_sand_threshold(),
            grass_threshold: default_grass_threshold(),
            tile_size: default_tile_size(),
            mode: SplatMode::Exclusive,
        }
    }
}

impl SplatParams {
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.resolution < 1 {
            return Err(TerrainError::invalid(
                "splat.resolution",
                "must be at least 1",
                self.resolution as f64,
            ));
        }
        positive("splat.noise_scale", self.noise_scale)?;
        fractal("splat.fractal", &self.fractal)?;
        if !(self.sand_threshold > 0.0 && self.sand_threshold < self.grass_threshold) {
            return Err(TerrainError::invalid(
                "splat.sand_threshold",
                "must satisfy 0 < sand < grass",
                self.sand_threshold as f64,
            ));
        }
        if !(self.grass_threshold < 1.0) {
            return Err(TerrainError::invalid(
                "splat.grass_threshold",
                "must be below 1",
                self.grass_threshold as f64,
            ));
        }
        positive("splat.tile_size", self.tile_size)
    }
}

/// Tree scatter over grass texels.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ForestParams {
    #[serde(default)]
    pub enable: bool,
    /// Candidate spacing in splat texels.
    #[serde(default = "default_forest_stride")]
    pub stride: u32,
    #[serde(default = "default_forest_noise_scale")]
    pub noise_scale: f32,
    /// Forest mask value (in [-1, 1]) a candidate must exceed.
    #[serde(default = "default_density_threshold")]
    pub density_threshold: f32,
    #[serde(default = "default_tree_scale")]
    pub tree_scale: f32,
    #[serde(default = "default_max_trees")]
    pub max_trees: usize,
}
fn default_forest_stride() -> u32 {
    4
}
fn default_forest_noise_scale() -> f32 {
    0.08
}
fn default_density_threshold() -> f32 {
    0.1
}
fn default_tree_scale() -> f32 {
    2.0
}
fn default_max_trees() -> usize {
    32
}
impl Default for ForestParams {
    fn default() -> Self {
        Self {
            enable: false,
            stride: default_forest_stride(),
            noise_scale: default_forest_noise_scale(),
            density_threshold: default_density_threshold(),
            tree_scale: default_tree_scale(),
            max_trees: default_max_trees(),
        }
    }
}

impl ForestParams {
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.stride < 1 {
            return Err(TerrainError::invalid(
                "forest.stride",
                "must be at least 1",
                self.stride as f64,
            ));
        }
        positive("forest.noise_scale", self.noise_scale)?;
        finite("forest.density_threshold", self.density_threshold)?;
        positive("forest.tree_scale", self.tree_scale)
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), TerrainError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(TerrainError::invalid(field, "must be finite and > 0", v as f64))
    }
}

fn finite(field: &'static str, v: f32) -> Result<(), TerrainError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(TerrainError::invalid(field, "must be finite", v as f64))
    }
}

fn unit(field: &'static str, v: f32) -> Result<(), TerrainError> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(TerrainError::invalid(field, "must lie in [0, 1]", v as f64))
    }
}

fn fractal(field: &'static str, f: &Fractal) -> Result<(), TerrainError> {
    if f.octaves < 1 {
        return Err(TerrainError::invalid(
            field,
            "octaves must be at least 1",
            f.octaves as f64,
        ));
    }
    if !f.persistence.is_finite() || !f.lacunarity.is_finite() || f.persistence <= 0.0 {
        return Err(TerrainError::invalid(
            field,
            "persistence must be > 0 and lacunarity finite",
            f.persistence as f64,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg: TerrainConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.params, TerrainParams::default());
        assert_eq!(cfg.shape, TerrainShape::default());
        let splat: SplatParams = toml::from_str("").unwrap();
        assert_eq!(splat.resolution, 256);
        let forest: ForestParams = toml::from_str("").unwrap();
        assert!(!forest.enable);
    }

    #[test]
    fn partial_toml_overrides() {
        let cfg: TerrainConfig = toml::from_str(
            r#"
            segments = 16
            seed = 3.5
            [shape]
            smoothing = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.params.segments, 16);
        assert_eq!(cfg.params.seed, 3.5);
        assert_eq!(cfg.params.width, 100.0);
        assert!(!cfg.shape.smoothing);
        assert_eq!(cfg.shape.fractal.octaves, 8);
        let splat: SplatParams = toml::from_str("mode = \"weighted\"").unwrap();
        assert_eq!(splat.mode, SplatMode::Weighted);
    }

    #[test]
    fn rejects_zero_segments() {
        let p = TerrainParams {
            segments: 0,
            ..TerrainParams::default()
        };
        match p.validate() {
            Err(TerrainError::InvalidParameter { field, .. }) => assert_eq!(field, "segments"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_thresholds() {
        let s = SplatParams {
            sand_threshold: 0.7,
            ..SplatParams::default()
        };
        assert!(s.validate().is_err());
    }
}
