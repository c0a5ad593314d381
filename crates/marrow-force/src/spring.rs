//! Soft spring constraint on the distance between two anchor points.

use glam::{Mat2, Mat3, Vec2, Vec3};
use marrow_body::BodySet;
use marrow_math::{outer2, perp};
use marrow_types::constants::DEGENERATE_LENGTH;
use marrow_types::{BodyId, MarrowError, MarrowResult, Scalar};

use crate::render::{RenderLine, RenderQueue};
use crate::row::RowSet;
use crate::traits::Force;

/// One soft row: C = ‖rA − rB‖ − rest_length.
#[derive(Debug)]
pub struct Spring {
    body_ids: [BodyId; 2],
    anchor_a: Vec2,
    anchor_b: Vec2,
    rest_length: Scalar,
    rows: RowSet,
}

impl Spring {
    /// Creates a spring between local anchors on two bodies.
    pub fn new(
        bodies: &BodySet,
        body_a: BodyId,
        body_b: BodyId,
        anchor_a: Vec2,
        anchor_b: Vec2,
        stiffness: Scalar,
        rest_length: Scalar,
    ) -> MarrowResult<Self> {
        if body_a == body_b {
            return Err(MarrowError::InvalidConstraint(
                "spring must reference two distinct bodies".into(),
            ));
        }
        if !bodies.contains(body_a) || !bodies.contains(body_b) {
            return Err(MarrowError::InvalidConstraint(
                "spring references a missing body".into(),
            ));
        }

        let mut rows = RowSet::new(1);
        rows.rows_mut()[0].stiffness = stiffness;

        Ok(Self {
            body_ids: [body_a, body_b],
            anchor_a,
            anchor_b,
            rest_length,
            rows,
        })
    }

    /// Current anchor separation vector, A minus B.
    fn separation(&self, bodies: &BodySet) -> Option<Vec2> {
        let a = bodies.get(self.body_ids[0])?;
        let b = bodies.get(self.body_ids[1])?;
        Some(a.local_to_world(self.anchor_a) - b.local_to_world(self.anchor_b))
    }
}

impl Force for Spring {
    fn bodies(&self) -> &[BodyId] {
        &self.body_ids
    }

    fn rows(&self) -> &RowSet {
        &self.rows
    }

    fn rows_mut(&mut self) -> &mut RowSet {
        &mut self.rows
    }

    fn initialize(&mut self, bodies: &BodySet) -> bool {
        bodies.contains(self.body_ids[0]) && bodies.contains(self.body_ids[1])
    }

    fn compute_constraints(&mut self, bodies: &BodySet, _alpha: Scalar) {
        let Some(d) = self.separation(bodies) else {
            return;
        };
        self.rows.rows_mut()[0].c = d.length() - self.rest_length;
    }

    fn compute_derivatives(&mut self, bodies: &BodySet, body: BodyId) {
        let row = &mut self.rows.rows_mut()[0];
        row.j = Vec3::ZERO;
        row.h = Mat3::ZERO;

        let Some(a) = bodies.get(self.body_ids[0]) else {
            return;
        };
        let Some(b) = bodies.get(self.body_ids[1]) else {
            return;
        };
        let d = a.local_to_world(self.anchor_a) - b.local_to_world(self.anchor_b);
        let len = d.length();
        if len < DEGENERATE_LENGTH {
            // Degenerate direction: the row goes quiescent until the
            // geometry recovers.
            return;
        }
        let n = d / len;
        let tangent = (Mat2::IDENTITY - outer2(n, n)) * (1.0 / len);

        if body == self.body_ids[0] {
            let u = a.rotation() * self.anchor_a;
            let su = perp(u);
            row.j = Vec3::new(n.x, n.y, n.dot(su));
            row.h = spring_hessian(tangent, su, -n.dot(u));
        } else if body == self.body_ids[1] {
            let v = b.rotation() * self.anchor_b;
            let sv = perp(v);
            row.j = Vec3::new(-n.x, -n.y, -n.dot(sv));
            row.h = spring_hessian(tangent, sv, n.dot(v));
        }
    }

    fn render_shapes(&self, bodies: &BodySet, queue: &mut RenderQueue) {
        let (Some(a), Some(b)) = (bodies.get(self.body_ids[0]), bodies.get(self.body_ids[1]))
        else {
            return;
        };
        queue.lines.push(RenderLine {
            a: a.local_to_world(self.anchor_a),
            b: b.local_to_world(self.anchor_b),
            thickness: 0.45,
        });
    }
}

/// Assembles the 3×3 distance Hessian from the translational tangent
/// block, the rotated anchor perp `s`, and the angular curvature term.
fn spring_hessian(tangent: Mat2, s: Vec2, curvature: Scalar) -> Mat3 {
    let mixed = tangent * s;
    Mat3::from_cols(
        Vec3::new(tangent.x_axis.x, tangent.x_axis.y, mixed.x),
        Vec3::new(tangent.y_axis.x, tangent.y_axis.y, mixed.y),
        Vec3::new(mixed.x, mixed.y, s.dot(tangent * s) + curvature),
    )
}
