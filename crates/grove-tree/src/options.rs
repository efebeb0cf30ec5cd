use grove_geom::Vec3;
use serde::Deserialize;

use crate::error::TreeError;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TreeType {
    #[default]
    Deciduous,
    /// Child branches shorten the higher up the parent they start.
    Evergreen,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Billboard {
    #[default]
    Single,
    /// Two quads crossed at 90 degrees.
    Double,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ForceOptions {
    #[serde(default = "default_force_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_force_strength")]
    pub strength: f32,
}
fn default_force_direction() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_force_strength() -> f32 {
    0.07
}
impl Default for ForceOptions {
    fn default() -> Self {
        Self {
            direction: default_force_direction(),
            strength: default_force_strength(),
        }
    }
}

impl ForceOptions {
    #[inline]
    pub fn direction(&self) -> Vec3 {
        Vec3::from_array(self.direction)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LeafOptions {
    #[serde(rename = "type", default = "default_material")]
    pub kind: String,
    #[serde(default)]
    pub billboard: Billboard,
    /// Tilt from the parent branch, degrees.
    #[serde(default = "default_leaf_angle")]
    pub angle: f32,
    #[serde(default = "default_leaf_count")]
    pub count: u32,
    /// Fraction along the parent where leaves may begin.
    #[serde(default)]
    pub start: f32,
    #[serde(default = "default_leaf_size")]
    pub size: f32,
    #[serde(default = "default_leaf_size_variance")]
    pub size_variance: f32,
    #[serde(default = "default_tint")]
    pub tint: u32,
    #[serde(default = "default_alpha_test")]
    pub alpha_test: f32,
}
fn default_material() -> String {
    "oak".to_string()
}
fn default_leaf_angle() -> f32 {
    10.0
}
fn default_leaf_count() -> u32 {
    1
}
fn default_leaf_size() -> f32 {
    2.5
}
fn default_leaf_size_variance() -> f32 {
    0.7
}
fn default_tint() -> u32 {
    0xffffff
}
fn default_alpha_test() -> f32 {
    0.5
}
impl Default for LeafOptions {
    fn default() -> Self {
        Self {
            kind: default_material(),
            billboard: Billboard::Single,
            angle: default_leaf_angle(),
            count: default_leaf_count(),
            start: 0.0,
            size: default_leaf_size(),
            size_variance: default_leaf_size_variance(),
            tint: default_tint(),
            alpha_test: default_alpha_test(),
        }
    }
}

/// Bark presentation; carried through untouched for the material layer.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct BarkOptions {
    #[serde(rename = "type", default = "default_material")]
    pub kind: String,
    #[serde(default = "default_tint")]
    pub tint: u32,
    #[serde(default)]
    pub flat_shading: bool,
    #[serde(default = "default_true")]
    pub textured: bool,
    #[serde(default = "default_texture_scale")]
    pub texture_scale: [f32; 2],
}
fn default_true() -> bool {
    true
}
fn default_texture_scale() -> [f32; 2] {
    [1.0, 1.0]
}
impl Default for BarkOptions {
    fn default() -> Self {
        Self {
            kind: default_material(),
            tint: default_tint(),
            flat_shading: false,
            textured: true,
            texture_scale: default_texture_scale(),
        }
    }
}

/// Per-level branch tables, indexed by level. Each needs at least `levels + 1` entries;
/// `angle[0]`, `start[0]` and `children[levels]` are never read.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct BranchConfig {
    #[serde(default = "default_levels")]
    pub levels: u32,
    #[serde(default = "default_angle")]
    pub angle: Vec<f32>,
    #[serde(default = "default_children")]
    pub children: Vec<u32>,
    #[serde(default)]
    pub force: ForceOptions,
    #[serde(default = "default_gnarliness")]
    pub gnarliness: Vec<f32>,
    #[serde(default = "default_length")]
    pub length: Vec<f32>,
    #[serde(default = "default_radius")]
    pub radius: Vec<f32>,
    #[serde(default = "default_sections")]
    pub sections: Vec<u32>,
    #[serde(default = "default_segments")]
    pub segments: Vec<u32>,
    #[serde(default = "default_start")]
    pub start: Vec<f32>,
    #[serde(default = "default_taper")]
    pub taper: Vec<f32>,
    #[serde(default = "default_twist")]
    pub twist: Vec<f32>,
}
fn default_levels() -> u32 {
    3
}
fn default_angle() -> Vec<f32> {
    vec![0.0, 70.0, 60.0, 60.0]
}
fn default_children() -> Vec<u32> {
    vec![7, 7, 5, 0]
}
fn default_gnarliness() -> Vec<f32> {
    vec![0.01, 0.1, 0.3, 0.4]
}
fn default_length() -> Vec<f32> {
    vec![35.0, 30.0, 15.0, 3.0]
}
fn default_radius() -> Vec<f32> {
    vec![1.5, 1.0, 0.7, 0.7]
}
fn default_sections() -> Vec<u32> {
    vec![12, 7, 4, 3]
}
fn default_segments() -> Vec<u32> {
    vec![8, 6, 4, 3]
}
fn default_start() -> Vec<f32> {
    vec![0.0, 0.6, 0.3, 0.3]
}
fn default_taper() -> Vec<f32> {
    vec![0.5, 0.4, 0.5, 0.5]
}
fn default_twist() -> Vec<f32> {
    vec![0.0, 0.0, 0.2, 0.5]
}
impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            levels: default_levels(),
            angle: default_angle(),
            children: default_children(),
            force: ForceOptions::default(),
            gnarliness: default_gnarliness(),
            length: default_length(),
            radius: default_radius(),
            sections: default_sections(),
            segments: default_segments(),
            start: default_start(),
            taper: default_taper(),
            twist: default_twist(),
        }
    }
}

/// The `[tree]` table as written by users. Resolve it into [`TreeOptions`] before generating.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TreeConfig {
    #[serde(default)]
    pub seed: f64,
    #[serde(rename = "type", default)]
    pub tree_type: TreeType,
    #[serde(default = "default_ornament_chance")]
    pub ornament_chance: f32,
    #[serde(default)]
    pub bark: BarkOptions,
    #[serde(default)]
    pub branch: BranchConfig,
    #[serde(default)]
    pub leaves: LeafOptions,
}
fn default_ornament_chance() -> f32 {
    0.15
}
impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            seed: 0.0,
            tree_type: TreeType::Deciduous,
            ornament_chance: default_ornament_chance(),
            bark: BarkOptions::default(),
            branch: BranchConfig::default(),
            leaves: LeafOptions::default(),
        }
    }
}

impl TreeConfig {
    /// Snapshots the per-level tables into one row per level, `0..=levels`.
    pub fn resolve(&self) -> Result<TreeOptions, TreeError> {
        let b = &self.branch;
        let n = b.levels as usize + 1;
        let mut per_level = Vec::with_capacity(n);
        for level in 0..n {
            per_level.push(LevelOptions {
                angle: pick(&b.angle, "angle", level)?,
                children: pick(&b.children, "children", level)?,
                gnarliness: pick(&b.gnarliness, "gnarliness", level)?,
                length: pick(&b.length, "length", level)?,
                radius: pick(&b.radius, "radius", level)?,
                sections: pick(&b.sections, "sections", level)?,
                segments: pick(&b.segments, "segments", level)?,
                start: pick(&b.start, "start", level)?,
                taper: pick(&b.taper, "taper", level)?,
                twist: pick(&b.twist, "twist", level)?,
            });
        }
        Ok(TreeOptions {
            seed: self.seed,
            tree_type: self.tree_type,
            levels: b.levels,
            per_level,
            force: b.force.clone(),
            leaves: self.leaves.clone(),
            bark: self.bark.clone(),
            ornament_chance: self.ornament_chance,
        })
    }
}

fn pick<T: Copy>(table: &[T], field: &'static str, level: usize) -> Result<T, TreeError> {
    table
        .get(level)
        .copied()
        .ok_or(TreeError::MissingLevel { field, level })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelOptions {
    /// Degrees from the parent branch.
    pub angle: f32,
    pub children: u32,
    pub gnarliness: f32,
    pub length: f32,
    pub radius: f32,
    pub sections: u32,
    pub segments: u32,
    pub start: f32,
    pub taper: f32,
    /// Radians per section.
    pub twist: f32,
}

/// Immutable snapshot consumed by one generation call.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeOptions {
    pub seed: f64,
    pub tree_type: TreeType,
    pub levels: u32,
    /// Exactly `levels + 1` rows once validated.
    pub per_level: Vec<LevelOptions>,
    pub force: ForceOptions,
    pub leaves: LeafOptions,
    pub bark: BarkOptions,
    pub ornament_chance: f32,
}

impl Default for TreeOptions {
    fn default() -> Self {
        let cfg = TreeConfig::default();
        let b = &cfg.branch;
        let per_level = (0..=b.levels as usize)
            .map(|l| LevelOptions {
                angle: b.angle[l],
                children: b.children[l],
                gnarliness: b.gnarliness[l],
                length: b.length[l],
                radius: b.radius[l],
                sections: b.sections[l],
                segments: b.segments[l],
                start: b.start[l],
                taper: b.taper[l],
                twist: b.twist[l],
            })
            .collect();
        Self {
            seed: cfg.seed,
            tree_type: cfg.tree_type,
            levels: b.levels,
            per_level,
            force: b.force.clone(),
            leaves: cfg.leaves.clone(),
            bark: cfg.bark.clone(),
            ornament_chance: cfg.ornament_chance,
        }
    }
}

impl TreeOptions {
    #[inline]
    pub fn level(&self, level: u32) -> &LevelOptions {
        &self.per_level[level as usize]
    }

    pub fn validate(&self) -> Result<(), TreeError> {
        let expected = self.levels as usize + 1;
        if self.per_level.len() < expected {
            return Err(TreeError::MissingLevel {
                field: "per_level",
                level: self.per_level.len(),
            });
        }
        if self.per_level.len() > expected {
            return Err(TreeError::InvalidParameter {
                field: "per_level",
                level: None,
                reason: "has more rows than levels + 1",
            });
        }
        if !self.seed.is_finite() {
            return Err(global("seed", "must be finite"));
        }
        for (level, l) in self.per_level.iter().enumerate() {
            let bad = |field, reason| TreeError::InvalidParameter {
                field,
                level: Some(level),
                reason,
            };
            if !(l.length.is_finite() && l.length > 0.0) {
                return Err(bad("length", "must be finite and > 0"));
            }
            if !(l.radius.is_finite() && l.radius > 0.0) {
                return Err(bad("radius", "must be finite and > 0"));
            }
            if l.sections < 1 {
                return Err(bad("sections", "must be at least 1"));
            }
            if l.segments < 3 {
                return Err(bad("segments", "must be at least 3"));
            }
            if !(0.0..=1.0).contains(&l.taper) {
                return Err(bad("taper", "must lie in [0, 1]"));
            }
            if !(0.0..=1.0).contains(&l.start) {
                return Err(bad("start", "must lie in [0, 1]"));
            }
            if !l.angle.is_finite() || !l.gnarliness.is_finite() || !l.twist.is_finite() {
                return Err(bad("angle/gnarliness/twist", "must be finite"));
            }
        }
        let dir = self.force.direction();
        if !dir.is_finite() || dir.length_squared() == 0.0 {
            return Err(global("force.direction", "must be finite and non-zero"));
        }
        if !self.force.strength.is_finite() {
            return Err(global("force.strength", "must be finite"));
        }
        let leaves = &self.leaves;
        if !(leaves.size.is_finite() && leaves.size > 0.0) {
            return Err(global("leaves.size", "must be finite and > 0"));
        }
        if !(0.0..1.0).contains(&leaves.size_variance) {
            return Err(global("leaves.size_variance", "must lie in [0, 1)"));
        }
        if !(0.0..=1.0).contains(&leaves.start) {
            return Err(global("leaves.start", "must lie in [0, 1]"));
        }
        if !leaves.angle.is_finite() {
            return Err(global("leaves.angle", "must be finite"));
        }
        if !(0.0..=1.0).contains(&self.ornament_chance) {
            return Err(global("ornament_chance", "must lie in [0, 1]"));
        }
        Ok(())
    }
}

fn global(field: &'static str, reason: &'static str) -> TreeError {
    TreeError::InvalidParameter {
        field,
        level: None,
        reason,
    }
}
