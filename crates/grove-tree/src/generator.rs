use std::collections::VecDeque;
use std::f32::consts::TAU;
use std::time::Instant;

use grove_geom::{Quat, Vec2, Vec3, perturb_euler, rotate_towards, rotation_from_up};
use grove_mesh::{
    MeshBuffer, OCTAHEDRON_STENCIL, compute_vertex_normals, octahedron_indices, quad_indices,
    tube_indices,
};
use grove_noise::Rng;

use crate::branch::{Branch, RADIUS_EPSILON, Section, attach_at};
use crate::error::TreeError;
use crate::options::{Billboard, TreeOptions, TreeType};

const ORNAMENT_RADIUS: f32 = 0.5;
const ORNAMENT_DROP: f32 = 0.5;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeStats {
    /// Branches expanded at each level, trunk first.
    pub branches_per_level: Vec<usize>,
    pub max_level: u32,
    pub leaf_count: usize,
    pub ornament_count: usize,
}

#[derive(Clone, Debug)]
pub struct TreeMeshes {
    pub branches: MeshBuffer,
    pub leaves: MeshBuffer,
    pub ornaments: MeshBuffer,
    pub stats: TreeStats,
}

/// Grows one tree. Fails before allocating if the options don't validate.
pub fn generate(options: &TreeOptions) -> Result<TreeMeshes, TreeError> {
    options.validate()?;
    let start = Instant::now();
    let mut grower = Grower::new(options);
    grower.run();
    let meshes = grower.finish();
    log::info!(
        target: "perf",
        "ms={} tree_generate levels={} branches={:?} leaves={} ornaments={} verts={} seed={}",
        start.elapsed().as_millis(),
        options.levels,
        meshes.stats.branches_per_level,
        meshes.stats.leaf_count,
        meshes.stats.ornament_count,
        meshes.branches.vertex_count(),
        options.seed
    );
    Ok(meshes)
}

struct Grower<'a> {
    opts: &'a TreeOptions,
    rng: Rng,
    force: Quat,
    queue: VecDeque<Branch>,
    branches: MeshBuffer,
    leaves: MeshBuffer,
    ornaments: MeshBuffer,
    stats: TreeStats,
}

impl<'a> Grower<'a> {
    fn new(opts: &'a TreeOptions) -> Self {
        let trunk = opts.level(0);
        let mut queue = VecDeque::new();
        queue.push_back(Branch {
            origin: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            length: trunk.length,
            radius: trunk.radius,
            level: 0,
            sections: trunk.sections,
            segments: trunk.segments,
        });
        Self {
            opts,
            rng: Rng::new(opts.seed),
            force: rotation_from_up(opts.force.direction()),
            queue,
            branches: MeshBuffer::new(),
            leaves: MeshBuffer::new(),
            ornaments: MeshBuffer::new(),
            stats: TreeStats {
                branches_per_level: vec![0; opts.levels as usize + 1],
                ..TreeStats::default()
            },
        }
    }

    fn run(&mut self) {
        while let Some(branch) = self.queue.pop_front() {
            self.grow(&branch);
        }
    }

    fn grow(&mut self, branch: &Branch) {
        self.stats.branches_per_level[branch.level as usize] += 1;
        self.stats.max_level = self.stats.max_level.max(branch.level);

        let sections = self.emit_tube(branch);
        if branch.level < self.opts.levels {
            self.enqueue_continuation(branch, &sections);
            self.enqueue_children(branch, &sections);
        } else {
            self.emit_leaves(&sections);
        }
    }

    /// Emits the ring vertices and tube indices for `branch`; returns its sections.
    fn emit_tube(&mut self, branch: &Branch) -> Vec<Section> {
        let lvl = *self.opts.level(branch.level);
        let terminal = branch.level == self.opts.levels;
        let n = branch.sections;
        let offset = self.branches.next_index();
        let step = branch.length / n as f32;
        let mut origin = branch.origin;
        let mut q = branch.orientation;
        let mut sections = Vec::with_capacity(n as usize + 1);

        for i in 0..=n {
            let radius = if i == n && terminal {
                RADIUS_EPSILON
            } else {
                branch.radius * (1.0 - lvl.taper * i as f32 / n as f32)
            }
            .max(RADIUS_EPSILON);

            self.emit_ring(origin, q, radius, branch.segments, i);
            sections.push(Section {
                origin,
                orientation: q,
                radius,
            });

            origin += q * Vec3::new(0.0, step, 0.0);

            let g = (1.0 / radius.sqrt()).max(1.0) * lvl.gnarliness;
            let dx = self.rng.range(-g, g);
            let dz = self.rng.range(-g, g);
            q = perturb_euler(q, dx, dz);
            q = (q * Quat::from_axis_angle(Vec3::Y, lvl.twist)).normalize();
            q = rotate_towards(q, self.force, self.opts.force.strength / radius);
        }

        self.branches
            .idx
            .extend(tube_indices(offset, n, branch.segments));
        sections
    }

    fn emit_ring(&mut self, origin: Vec3, q: Quat, radius: f32, segments: u32, ring: u32) {
        let v = if ring % 2 == 0 { 0.0 } else { 1.0 };
        let mut first = None;
        for j in 0..segments {
            let a = TAU * j as f32 / segments as f32;
            let normal = q * Vec3::new(a.cos(), 0.0, a.sin());
            let pos = normal * radius + origin;
            self.branches
                .push_vertex(pos, normal, Vec2::new(j as f32 / segments as f32, v));
            if j == 0 {
                first = Some((pos, normal));
            }
        }
        // Seam duplicate so u can run to 1.
        if let Some((pos, normal)) = first {
            self.branches.push_vertex(pos, normal, Vec2::new(1.0, v));
        }
    }

    fn enqueue_continuation(&mut self, branch: &Branch, sections: &[Section]) {
        let Some(last) = sections.last() else {
            return;
        };
        let next = self.opts.level(branch.level + 1);
        self.queue.push_back(Branch {
            origin: last.origin,
            orientation: last.orientation,
            length: next.length,
            radius: last.radius,
            level: branch.level + 1,
            sections: branch.sections,
            segments: branch.segments,
        });
    }

    fn enqueue_children(&mut self, branch: &Branch, sections: &[Section]) {
        let count = self.opts.level(branch.level).children;
        let level = branch.level + 1;
        let child = *self.opts.level(level);
        let radial_offset = self.rng.range(0.0, 1.0);
        for i in 0..count {
            let start = self.rng.range(child.start, 1.0);
            let at = attach_at(sections, start);
            let radial = TAU * (radial_offset + i as f32 / count as f32) + child.twist;
            let orientation = (at.orientation
                * Quat::from_axis_angle(Vec3::Y, radial)
                * Quat::from_axis_angle(Vec3::X, child.angle.to_radians()))
            .normalize();
            let length = match self.opts.tree_type {
                TreeType::Evergreen => child.length * (1.0 - start),
                TreeType::Deciduous => child.length,
            };
            self.queue.push_back(Branch {
                origin: at.origin,
                orientation,
                length,
                radius: child.radius * at.radius,
                level,
                sections: child.sections,
                segments: child.segments,
            });
        }
    }

    fn emit_leaves(&mut self, sections: &[Section]) {
        let opts = self.opts;
        let leaves = &opts.leaves;
        let count = leaves.count;
        let tilt = Quat::from_axis_angle(Vec3::X, leaves.angle.to_radians());
        let leaf_start = leaves.start;
        let radial_offset = self.rng.range(0.0, 1.0);
        for i in 0..count {
            let start = self.rng.range(leaf_start, 1.0);
            let at = attach_at(sections, start);
            let radial = TAU * (radial_offset + i as f32 / count as f32);
            let orientation =
                (at.orientation * Quat::from_axis_angle(Vec3::Y, radial) * tilt).normalize();
            self.emit_leaf(at.origin, orientation);
        }
    }

    fn emit_leaf(&mut self, origin: Vec3, orientation: Quat) {
        let opts = self.opts;
        let leaves = &opts.leaves;
        let variance = leaves.size_variance;
        let size = leaves.size * (1.0 + self.rng.range(-variance, variance));
        let quads: &[f32] = match leaves.billboard {
            Billboard::Single => &[0.0],
            Billboard::Double => &[0.0, std::f32::consts::FRAC_PI_2],
        };
        let (w, l) = (size * 0.5, size);
        for &spin in quads {
            let q = orientation * Quat::from_axis_angle(Vec3::Y, spin);
            let base = self.leaves.next_index();
            for p in [
                Vec3::new(-w, l, 0.0),
                Vec3::new(-w, 0.0, 0.0),
                Vec3::new(w, 0.0, 0.0),
                Vec3::new(w, l, 0.0),
            ] {
                self.leaves.push_position(q * p + origin);
            }
            self.leaves
                .uv
                .extend_from_slice(&[0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
            self.leaves.idx.extend_from_slice(&quad_indices(base));
        }
        self.stats.leaf_count += 1;

        if self.rng.next_f32() < opts.ornament_chance {
            self.emit_ornament(origin - Vec3::new(0.0, ORNAMENT_DROP, 0.0));
        }
    }

    fn emit_ornament(&mut self, centre: Vec3) {
        let base = self.ornaments.next_index();
        for p in OCTAHEDRON_STENCIL {
            self.ornaments
                .push_position(Vec3::from_array(p) * ORNAMENT_RADIUS + centre);
        }
        self.ornaments.idx.extend_from_slice(&octahedron_indices(base));
        self.stats.ornament_count += 1;
    }

    fn finish(mut self) -> TreeMeshes {
        self.leaves.norm = compute_vertex_normals(&self.leaves.pos, &self.leaves.idx);
        self.ornaments.norm = compute_vertex_normals(&self.ornaments.pos, &self.ornaments.idx);
        debug_assert!(self.branches.validate().is_ok());
        debug_assert!(self.leaves.validate().is_ok());
        debug_assert!(self.ornaments.validate().is_ok());
        TreeMeshes {
            branches: self.branches,
            leaves: self.leaves,
            ornaments: self.ornaments,
            stats: self.stats,
        }
    }
}
