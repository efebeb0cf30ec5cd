//! Geometry helpers shared by the generator crates (no renderer dependency).
#![forbid(unsafe_code)]

pub use glam::{EulerRot, Quat, Vec2, Vec3};

/// Euler order used for branch orientations: X, then Y, then Z (intrinsic).
pub const EULER_ORDER: EulerRot = EulerRot::XYZ;

#[inline]
pub fn quat_from_euler(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_euler(EULER_ORDER, x, y, z)
}

#[inline]
pub fn euler_from_quat(q: Quat) -> Vec3 {
    let (x, y, z) = q.to_euler(EULER_ORDER);
    Vec3::new(x, y, z)
}

/// Adds `dx` and `dz` to the X/Z Euler angles of `q`.
pub fn perturb_euler(q: Quat, dx: f32, dz: f32) -> Quat {
    let e = euler_from_quat(q);
    quat_from_euler(e.x + dx, e.y, e.z + dz).normalize()
}

/// Rotates `from` toward `to` by at most `max_angle` radians along the shortest arc.
pub fn rotate_towards(from: Quat, to: Quat, max_angle: f32) -> Quat {
    let angle = from.angle_between(to);
    if angle == 0.0 || !angle.is_finite() {
        return from;
    }
    let t = (max_angle / angle).clamp(0.0, 1.0);
    from.slerp(to, t).normalize()
}

/// Rotation carrying +Y onto `dir`. A zero direction yields the identity.
pub fn rotation_from_up(dir: Vec3) -> Quat {
    let d = dir.normalize_or_zero();
    if d == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(Vec3::Y, d)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    /// Inverted box; extending it with any point yields that point.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounds of a flat `x,y,z` position stream.
    pub fn from_positions(pos: &[f32]) -> Self {
        let mut b = Self::EMPTY;
        for p in pos.chunks_exact(3) {
            b.extend(Vec3::new(p[0], p[1], p[2]));
        }
        b
    }

    #[inline]
    pub fn extend(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[inline]
    pub fn extent(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn rotate_towards_stops_at_target() {
        let from = Quat::IDENTITY;
        let to = Quat::from_rotation_x(FRAC_PI_2);
        let r = rotate_towards(from, to, 10.0);
        assert!(r.angle_between(to) < 1e-3);
    }

    #[test]
    fn rotate_towards_limits_step() {
        let from = Quat::IDENTITY;
        let to = Quat::from_rotation_z(FRAC_PI_2);
        let r = rotate_towards(from, to, 0.25);
        assert!((from.angle_between(r) - 0.25).abs() < 1e-4);
    }

    #[test]
    fn rotation_from_up_maps_y() {
        let q = rotation_from_up(Vec3::new(1.0, 0.0, 0.0));
        assert!((q * Vec3::Y - Vec3::X).length() < 1e-5);
        assert_eq!(rotation_from_up(Vec3::ZERO), Quat::IDENTITY);
    }

    #[test]
    fn empty_aabb_extends_to_point() {
        let mut b = Aabb::EMPTY;
        assert!(b.is_empty());
        b.extend(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.min, b.max);
        assert_eq!(b.extent(), Vec3::ZERO);
    }
}
