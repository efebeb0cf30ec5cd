use grove_geom::Vec3;
use grove_mesh::MeshBuffer;
use grove_tree::{Billboard, LevelOptions, TreeOptions, TreeType, generate};
use proptest::prelude::*;

fn level() -> impl Strategy<Value = LevelOptions> {
    (
        (0.0f32..90.0, 0u32..=3, 0.0f32..0.5, 0.5f32..20.0, 0.1f32..2.0),
        (1u32..=5, 3u32..=8, 0.0f32..=1.0, 0.0f32..=1.0, -1.0f32..1.0),
    )
        .prop_map(
            |((angle, children, gnarliness, length, radius), (sections, segments, start, taper, twist))| {
                LevelOptions {
                    angle,
                    children,
                    gnarliness,
                    length,
                    radius,
                    sections,
                    segments,
                    start,
                    taper,
                    twist,
                }
            },
        )
}

fn options() -> impl Strategy<Value = TreeOptions> {
    (
        0u32..=2,
        prop::collection::vec(level(), 3),
        -1e6f64..1e6,
        0u32..=4,
        0.0f32..=1.0,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(levels, rows, seed, leaf_count, chance, double, evergreen)| {
            let mut o = TreeOptions::default();
            o.levels = levels;
            o.per_level = rows[..=levels as usize].to_vec();
            o.seed = seed;
            o.leaves.count = leaf_count;
            o.leaves.billboard = if double { Billboard::Double } else { Billboard::Single };
            o.tree_type = if evergreen { TreeType::Evergreen } else { TreeType::Deciduous };
            o.ornament_chance = chance;
            o
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Same options and seed give identical buffers
    #[test]
    fn tree_is_deterministic(o in options()) {
        let a = generate(&o).unwrap();
        let b = generate(&o).unwrap();
        prop_assert_eq!(&a.branches, &b.branches);
        prop_assert_eq!(&a.leaves, &b.leaves);
        prop_assert_eq!(&a.ornaments, &b.ornaments);
        prop_assert_eq!(a.stats, b.stats);
    }

    // Every buffer indexes only its own vertices, in whole triangles
    #[test]
    fn indices_are_valid(o in options()) {
        let t = generate(&o).unwrap();
        prop_assert!(t.branches.validate().is_ok());
        prop_assert!(t.leaves.validate().is_ok());
        prop_assert!(t.ornaments.validate().is_ok());
        prop_assert!(t.leaves.has_normals() || t.leaves.is_empty());
    }

    // Levels stay in range, and leaves only grow on terminal branches
    #[test]
    fn levels_bounded(o in options()) {
        let t = generate(&o).unwrap();
        prop_assert_eq!(t.stats.branches_per_level.len(), o.levels as usize + 1);
        prop_assert!(t.stats.max_level <= o.levels);
        prop_assert_eq!(t.stats.max_level, o.levels);
        let terminal = t.stats.branches_per_level[o.levels as usize];
        prop_assert_eq!(t.stats.leaf_count, terminal * o.leaves.count as usize);
        let quads = if o.leaves.billboard == Billboard::Double { 2 } else { 1 };
        prop_assert_eq!(t.leaves.vertex_count(), t.stats.leaf_count * 4 * quads);
        prop_assert_eq!(t.ornaments.vertex_count(), t.stats.ornament_count * 6);
        prop_assert!(t.stats.ornament_count <= t.stats.leaf_count);
    }

    // Ring radii never grow along any branch, trunk or not
    #[test]
    fn taper_is_monotone_on_every_branch(o in options()) {
        let t = generate(&o).unwrap();
        let blocks = branch_blocks(&o);
        prop_assert_eq!(blocks.len(), t.stats.branches_per_level.iter().sum::<usize>());
        let mut first = 0;
        for (sections, segments) in blocks {
            let ring = (segments + 1) as usize;
            let mut prev = f32::INFINITY;
            for i in 0..=sections as usize {
                let radius = ring_radius(&t.branches, first + i * ring, segments as usize);
                prop_assert!(radius <= prev + 1e-3);
                prev = radius;
            }
            first += (sections as usize + 1) * ring;
        }
        prop_assert_eq!(first, t.branches.vertex_count());
    }
}

/// `(sections, segments)` of every branch in emission order: breadth first, each
/// branch followed in the queue by its continuation and then its children.
fn branch_blocks(o: &TreeOptions) -> Vec<(u32, u32)> {
    let trunk = &o.per_level[0];
    let mut queue = std::collections::VecDeque::from([(0u32, trunk.sections, trunk.segments)]);
    let mut out = Vec::new();
    while let Some((level, sections, segments)) = queue.pop_front() {
        out.push((sections, segments));
        if level < o.levels {
            let child = &o.per_level[level as usize + 1];
            queue.push_back((level + 1, sections, segments));
            for _ in 0..o.per_level[level as usize].children {
                queue.push_back((level + 1, child.sections, child.segments));
            }
        }
    }
    out
}

/// Distance from a ring's first vertex to the centroid of its distinct vertices.
fn ring_radius(mb: &MeshBuffer, first: usize, segments: usize) -> f32 {
    let mut centre = Vec3::ZERO;
    for j in 0..segments {
        centre += mb.position(first + j);
    }
    centre /= segments as f32;
    (mb.position(first) - centre).length()
}
