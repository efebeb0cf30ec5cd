mod config;
mod export;
mod jobs;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use grove_terrain::{TerrainMeshes, plan_forest};
use grove_tree::{TreeMeshes, TreeOptions};

use config::{SceneConfig, load_scene_from_path};

#[derive(Parser, Debug)]
#[command(author, version, about = "Procedural terrain and tree mesh generator", long_about = None)]
struct Args {
    /// Scene TOML; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Overrides the terrain and tree seeds
    #[arg(short, long)]
    seed: Option<f64>,
    /// Output directory for OBJ and PNG files
    #[arg(short, long, default_value = "out")]
    out: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Heightfield, base, skirt, and splat raster
    Terrain,
    /// A single tree
    Tree,
    /// Terrain plus a tree, and a forest when enabled
    Scene,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::warn!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut scene = match &args.config {
        Some(path) => load_scene_from_path(path)?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = args.seed {
        if !seed.is_finite() {
            return Err(format!("seed must be finite, got {}", seed).into());
        }
        scene.override_seed(seed);
    }
    fs::create_dir_all(&args.out)?;
    let tree_options = scene.tree.resolve()?;

    let wants_terrain = matches!(args.command, Command::Terrain | Command::Scene);
    let wants_tree = matches!(args.command, Command::Tree | Command::Scene);

    let terrain_job = wants_terrain.then(|| {
        jobs::spawn_terrain(
            scene.terrain.params.clone(),
            scene.terrain.shape.clone(),
            scene.splat.clone(),
        )
    });
    let tree_job = wants_tree.then(|| jobs::spawn_tree(tree_options.clone()));

    let mut forest_job = None;
    if let Some(job) = terrain_job {
        let terrain = job.join()?;
        report_terrain(&terrain);
        export_terrain(&args.out, &terrain)?;
        if matches!(args.command, Command::Scene) && scene.forest.enable {
            let placements = plan_forest(&terrain, &scene.forest, scene.terrain.params.seed)?;
            log::info!("forest placements={}", placements.len());
            forest_job = Some(jobs::spawn_forest(tree_options.clone(), placements));
        }
    }
    if let Some(job) = tree_job {
        let tree = job.join()?;
        report_tree(&tree, &tree_options);
        export_tree(&args.out.join("tree.obj"), &tree)?;
    }
    if let Some(job) = forest_job {
        let forest = job.join()?;
        log::info!(
            "forest trees={} branch_verts={} leaf_verts={} ornament_verts={}",
            forest.trees,
            forest.branches.vertex_count(),
            forest.leaves.vertex_count(),
            forest.ornaments.vertex_count()
        );
        export::write_obj(
            &args.out.join("forest.obj"),
            &[
                ("forest_branches", &forest.branches),
                ("forest_leaves", &forest.leaves),
                ("forest_ornaments", &forest.ornaments),
            ],
        )?;
    }
    Ok(())
}

fn report_terrain(t: &TerrainMeshes) {
    let b = t.surface.bounds();
    log::info!(
        "terrain verts={} tris={} height=[{:.3}, {:.3}] base_y={:.3} skirt_quads={} splat={}x{} repeat=({}, {})",
        t.surface.vertex_count(),
        t.surface.triangle_count(),
        b.min.y,
        b.max.y,
        t.base_height(),
        t.skirt.triangle_count() / 2,
        t.splat.resolution,
        t.splat.resolution,
        t.splat.repeat[0],
        t.splat.repeat[1]
    );
}

fn report_tree(t: &TreeMeshes, o: &TreeOptions) {
    let b = t.branches.bounds();
    log::info!(
        "tree seed={} type={:?} per_level={:?} leaves={} ornaments={} height={:.3}",
        o.seed,
        o.tree_type,
        t.stats.branches_per_level,
        t.stats.leaf_count,
        t.stats.ornament_count,
        b.extent().y
    );
}

fn export_terrain(dir: &Path, t: &TerrainMeshes) -> Result<(), Box<dyn Error>> {
    export::write_obj(
        &dir.join("terrain.obj"),
        &[
            ("terrain", &t.surface),
            ("base", &t.base),
            ("skirt", &t.skirt),
        ],
    )?;
    export::write_splat_png(&dir.join("splat.png"), &t.splat)
}

fn export_tree(path: &Path, t: &TreeMeshes) -> Result<(), Box<dyn Error>> {
    export::write_obj(
        path,
        &[
            ("branches", &t.branches),
            ("leaves", &t.leaves),
            ("ornaments", &t.ornaments),
        ],
    )?;
    Ok(())
}
