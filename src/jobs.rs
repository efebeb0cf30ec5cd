use std::thread::{self, JoinHandle};

use grove_geom::Vec3;
use grove_mesh::MeshBuffer;
use grove_terrain::{
    SplatParams, TerrainError, TerrainMeshes, TerrainParams, TerrainShape, TreePlacement,
};
use grove_tree::{TreeError, TreeMeshes, TreeOptions};

#[derive(Debug)]
pub enum JobError {
    Terrain(TerrainError),
    Tree(TreeError),
    Panicked(&'static str),
}

impl std::fmt::Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobError::Terrain(e) => write!(f, "terrain: {}", e),
            JobError::Tree(e) => write!(f, "tree: {}", e),
            JobError::Panicked(job) => write!(f, "{} job panicked", job),
        }
    }
}

impl std::error::Error for JobError {}

impl From<TerrainError> for JobError {
    fn from(e: TerrainError) -> Self {
        JobError::Terrain(e)
    }
}

impl From<TreeError> for JobError {
    fn from(e: TreeError) -> Self {
        JobError::Tree(e)
    }
}

/// A generator running on its own thread.
pub struct Job<T> {
    name: &'static str,
    handle: JoinHandle<Result<T, JobError>>,
}

impl<T> Job<T> {
    pub fn join(self) -> Result<T, JobError> {
        match self.handle.join() {
            Ok(res) => res,
            Err(_) => Err(JobError::Panicked(self.name)),
        }
    }
}

pub fn spawn_terrain(
    params: TerrainParams,
    shape: TerrainShape,
    splat: SplatParams,
) -> Job<TerrainMeshes> {
    let handle = thread::spawn(move || Ok(grove_terrain::generate(&params, &shape, &splat)?));
    Job {
        name: "terrain",
        handle,
    }
}

pub fn spawn_tree(options: TreeOptions) -> Job<TreeMeshes> {
    let handle = thread::spawn(move || Ok(grove_tree::generate(&options)?));
    Job {
        name: "tree",
        handle,
    }
}

/// Merged forest geometry, one tree per placement.
#[derive(Clone, Debug, Default)]
pub struct Forest {
    pub branches: MeshBuffer,
    pub leaves: MeshBuffer,
    pub ornaments: MeshBuffer,
    pub trees: usize,
}

/// Grows every placement in order on one worker, reseeding `template` per tree.
pub fn spawn_forest(template: TreeOptions, placements: Vec<TreePlacement>) -> Job<Forest> {
    let handle = thread::spawn(move || grow_forest(&template, &placements));
    Job {
        name: "forest",
        handle,
    }
}

pub fn grow_forest(template: &TreeOptions, placements: &[TreePlacement]) -> Result<Forest, JobError> {
    let mut forest = Forest::default();
    let mut options = template.clone();
    for p in placements {
        options.seed = p.seed;
        let tree = grove_tree::generate(&options)?;
        place(&mut forest.branches, &tree.branches, p.position, p.scale);
        place(&mut forest.leaves, &tree.leaves, p.position, p.scale);
        place(&mut forest.ornaments, &tree.ornaments, p.position, p.scale);
        forest.trees += 1;
    }
    Ok(forest)
}

fn place(dst: &mut MeshBuffer, src: &MeshBuffer, at: Vec3, scale: f32) {
    if !src.is_empty() {
        dst.append_transformed(src, at, scale);
    }
}
