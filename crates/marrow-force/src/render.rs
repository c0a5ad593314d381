//! Render-feed primitives produced by forces during initialization.
//!
//! The core only tags geometry; color mapping from thickness is
//! renderer policy. Thickness ≥ 0.5 reads as "strong", 0.4..0.5 as
//! "medium", anything below as "weak".

use glam::Vec2;
use marrow_types::Scalar;

/// A line segment with a thickness tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderLine {
    pub a: Vec2,
    pub b: Vec2,
    pub thickness: Scalar,
}

/// Per-step queues of render shapes, cleared at the top of each step.
#[derive(Debug, Default)]
pub struct RenderQueue {
    /// World-space contact points.
    pub points: Vec<Vec2>,
    /// Constraint lines with thickness tags.
    pub lines: Vec<RenderLine>,
}

impl RenderQueue {
    /// Empties both queues.
    pub fn clear(&mut self) {
        self.points.clear();
        self.lines.clear();
    }
}

/// Thickness tag for a constraint line given its stiffness.
pub fn stiffness_thickness(stiffness: Scalar) -> Scalar {
    if stiffness.is_infinite() || stiffness >= 1.0e9 {
        0.6
    } else if stiffness >= 1.0e6 {
        0.45
    } else {
        0.3
    }
}
