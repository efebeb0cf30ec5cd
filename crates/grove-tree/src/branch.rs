use grove_geom::{Quat, Vec3, lerp};

/// Smallest ring radius emitted; also the cap radius at the tip of a terminal branch.
pub const RADIUS_EPSILON: f32 = 0.001;

/// A pending branch in the growth queue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Branch {
    pub origin: Vec3,
    pub orientation: Quat,
    pub length: f32,
    pub radius: f32,
    pub level: u32,
    pub sections: u32,
    pub segments: u32,
}

/// One vertex ring along a branch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Section {
    pub origin: Vec3,
    pub orientation: Quat,
    pub radius: f32,
}

/// Where an attachment at fraction `t` of a branch lands between its sections.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attachment {
    pub origin: Vec3,
    pub orientation: Quat,
    pub radius: f32,
}

/// Interpolates between the two sections bracketing `t` in `[0, 1]`.
/// `sections` always holds at least two rings.
pub fn attach_at(sections: &[Section], t: f32) -> Attachment {
    let last = sections.len() - 1;
    let span = last as f32;
    let index = ((t * span).floor() as usize).min(last);
    let a = &sections[index];
    let b = sections.get(index + 1).unwrap_or(a);
    let alpha = (t - index as f32 / span) * span;
    Attachment {
        origin: a.origin.lerp(b.origin, alpha),
        orientation: a.orientation.slerp(b.orientation, alpha).normalize(),
        radius: lerp(a.radius, b.radius, alpha),
    }
}
