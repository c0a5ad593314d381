//! Distance constraint with compliance-mapped stiffness.
//!
//! Behaves like a spring row, but the stiffness comes from a compliance
//! value: k = 1/α_c for positive compliance, near-hard (10¹²) for zero.
//! The Hessian is left at zero; the penalty term κ·J·Jᵀ supplies all
//! the curvature this row needs.

use glam::{Mat3, Vec2, Vec3};
use marrow_body::BodySet;
use marrow_math::perp;
use marrow_types::constants::{DEGENERATE_LENGTH, NEAR_HARD_STIFFNESS};
use marrow_types::{BodyId, MarrowError, MarrowResult, Scalar};

use crate::render::{stiffness_thickness, RenderLine, RenderQueue};
use crate::row::RowSet;
use crate::traits::Force;

/// One row: C = ‖rA − rB‖ − rest_length, soft or near-hard.
#[derive(Debug)]
pub struct Length {
    body_ids: [BodyId; 2],
    anchor_a: Vec2,
    anchor_b: Vec2,
    rest_length: Scalar,
    rows: RowSet,
}

impl Length {
    /// Creates a distance constraint. `compliance` of zero maps to the
    /// near-hard stiffness.
    pub fn new(
        bodies: &BodySet,
        body_a: BodyId,
        body_b: BodyId,
        anchor_a: Vec2,
        anchor_b: Vec2,
        compliance: Scalar,
        rest_length: Scalar,
    ) -> MarrowResult<Self> {
        if body_a == body_b {
            return Err(MarrowError::InvalidConstraint(
                "distance constraint must reference two distinct bodies".into(),
            ));
        }
        if !bodies.contains(body_a) || !bodies.contains(body_b) {
            return Err(MarrowError::InvalidConstraint(
                "distance constraint references a missing body".into(),
            ));
        }

        let mut rows = RowSet::new(1);
        rows.rows_mut()[0].stiffness = if compliance > 0.0 {
            1.0 / compliance
        } else {
            NEAR_HARD_STIFFNESS
        };

        Ok(Self {
            body_ids: [body_a, body_b],
            anchor_a,
            anchor_b,
            rest_length,
            rows,
        })
    }
}

impl Force for Length {
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
        let (Some(a), Some(b)) = (bodies.get(self.body_ids[0]), bodies.get(self.body_ids[1]))
        else {
            return;
        };
        let d = a.local_to_world(self.anchor_a) - b.local_to_world(self.anchor_b);
        self.rows.rows_mut()[0].c = d.length() - self.rest_length;
    }

    fn compute_derivatives(&mut self, bodies: &BodySet, body: BodyId) {
        let row = &mut self.rows.rows_mut()[0];
        row.j = Vec3::ZERO;
        row.h = Mat3::ZERO;

        let (Some(a), Some(b)) = (bodies.get(self.body_ids[0]), bodies.get(self.body_ids[1]))
        else {
            return;
        };
        let d = a.local_to_world(self.anchor_a) - b.local_to_world(self.anchor_b);
        let len = d.length();
        if len < DEGENERATE_LENGTH {
            return;
        }
        let n = d / len;

        if body == self.body_ids[0] {
            let u = a.rotation() * self.anchor_a;
            row.j = Vec3::new(n.x, n.y, n.dot(perp(u)));
        } else if body == self.body_ids[1] {
            let v = b.rotation() * self.anchor_b;
            row.j = Vec3::new(-n.x, -n.y, -n.dot(perp(v)));
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
            thickness: stiffness_thickness(self.rows.rows()[0].stiffness),
        });
    }
}
