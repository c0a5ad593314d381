//! Bounding-circle pair prune.

use marrow_body::Body;

/// True when the bounding circles of two bodies overlap.
///
/// Particles have zero radius and therefore never pass the prune.
#[inline]
pub fn circles_overlap(a: &Body, b: &Body) -> bool {
    let r = a.radius + b.radius;
    (a.position() - b.position()).length_squared() <= r * r
}
