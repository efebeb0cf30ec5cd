use grove_terrain::{
    ForestParams, SplatParams, TerrainError, TerrainMeshes, TerrainParams, TerrainShape, generate,
    plan_forest,
};

fn scenario_params() -> TerrainParams {
    TerrainParams {
        width: 100.0,
        depth: 100.0,
        segments: 4,
        scale: 10.0,
        height_multiplier: 10.0,
        seed: 42.0,
    }
}

#[test]
fn four_segment_terrain() {
    let t = generate(&scenario_params(), &TerrainShape::default(), &SplatParams::default()).unwrap();
    assert_eq!(t.surface.vertex_count(), 25);
    assert_eq!(t.surface.idx.len(), 96);
    assert!(t.surface.norm.chunks_exact(3).all(|n| n.iter().any(|&c| c != 0.0)));
    assert_eq!(t.splat.resolution, 256);
    assert_eq!(t.splat.data.len(), 256 * 256 * 4);
    assert_eq!(t.splat.repeat, [1.0, 1.0]);
}

#[test]
fn height_multiplier_scales_heights() {
    let shape = TerrainShape {
        smoothing: false,
        ..TerrainShape::default()
    };
    let splat = SplatParams {
        resolution: 4,
        ..SplatParams::default()
    };
    let a = generate(&scenario_params(), &shape, &splat).unwrap();
    let doubled = TerrainParams {
        height_multiplier: 20.0,
        ..scenario_params()
    };
    let b = generate(&doubled, &shape, &splat).unwrap();
    for (ha, hb) in a.heightfield.heights.iter().zip(&b.heightfield.heights) {
        assert!((ha * 2.0 - hb).abs() < 1e-4);
    }
}

#[test]
fn flat_terrain_when_multiplier_zero() {
    let p = TerrainParams {
        height_multiplier: 0.0,
        ..scenario_params()
    };
    let t = generate(&p, &TerrainShape::default(), &SplatParams::default()).unwrap();
    assert!(t.heightfield.heights.iter().all(|&h| h == 0.0));
    assert!(t.surface.norm.chunks_exact(3).all(|n| (n[1] - 1.0).abs() < 1e-6));
    assert_eq!(t.base_height(), -1.0);
}

#[test]
fn invalid_parameters_are_rejected() {
    let bad = [
        TerrainParams { segments: 0, ..scenario_params() },
        TerrainParams { width: 0.0, ..scenario_params() },
        TerrainParams { depth: -1.0, ..scenario_params() },
        TerrainParams { scale: 0.0, ..scenario_params() },
        TerrainParams { seed: f64::NAN, ..scenario_params() },
    ];
    for p in bad {
        let err = generate(&p, &TerrainShape::default(), &SplatParams::default()).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidParameter { .. }));
    }
}

/// Splat texel drawn under world `(x, z)` once the raster is tiled across the surface.
fn rendered_texel(t: &TerrainMeshes, x: f32, z: f32) -> [u8; 4] {
    let hf = &t.heightfield;
    let res = t.splat.resolution;
    let u = (x / hf.width + 0.5) * t.splat.repeat[0];
    let v = (0.5 - z / hf.depth) * t.splat.repeat[1];
    let i = ((u.fract() * res as f32) as u32).min(res - 1);
    let j = (((1.0 - v.fract()) * res as f32) as u32).min(res - 1);
    t.splat.texel(i, j)
}

#[test]
fn forest_lands_on_grass_within_footprint() {
    let t = generate(&scenario_params(), &TerrainShape::default(), &SplatParams::default()).unwrap();
    let forest = ForestParams {
        enable: true,
        density_threshold: -1.0,
        max_trees: 10,
        ..ForestParams::default()
    };
    let trees = plan_forest(&t, &forest, 42.0).unwrap();
    assert!(trees.len() <= 10);
    for (k, tree) in trees.iter().enumerate() {
        assert!(tree.position.x.abs() <= 50.0 && tree.position.z.abs() <= 50.0);
        assert!((tree.position.y - t.heightfield.height_at(tree.position.x, tree.position.z)).abs() < 1e-6);
        assert_eq!(tree.scale, 2.0);
        assert_eq!(tree.seed, 42.0 + k as f64);
        assert_eq!(rendered_texel(&t, tree.position.x, tree.position.z)[1], 255);
    }
    assert_eq!(trees, plan_forest(&t, &forest, 42.0).unwrap());
}

#[test]
fn forest_follows_tiled_splat() {
    let params = TerrainParams {
        width: 400.0,
        depth: 400.0,
        segments: 16,
        ..scenario_params()
    };
    let t = generate(&params, &TerrainShape::default(), &SplatParams::default()).unwrap();
    assert_eq!(t.splat.repeat, [4.0, 4.0]);
    let forest = ForestParams {
        enable: true,
        density_threshold: -1.0,
        max_trees: 200,
        ..ForestParams::default()
    };
    let trees = plan_forest(&t, &forest, 42.0).unwrap();
    assert!(!trees.is_empty());
    let off_grass = trees
        .iter()
        .filter(|tree| rendered_texel(&t, tree.position.x, tree.position.z)[1] != 255)
        .count();
    assert_eq!(off_grass, 0);
}
