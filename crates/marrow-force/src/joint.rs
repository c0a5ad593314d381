//! Rigid joint: two translation rows plus one angular row.
//!
//! Anchors a point on body A (or a fixed world anchor) to a point on
//! body B, and optionally their relative angle. Per-row stiffness
//! selects behavior: infinite rows are hard constraints driven through
//! the dual, finite rows act as penalties, zero rows are inert (an
//! angular stiffness of zero makes a hinge).

use glam::{Mat3, Vec2, Vec3};
use marrow_body::BodySet;
use marrow_types::{BodyId, MarrowError, MarrowResult, Scalar};

use crate::render::{stiffness_thickness, RenderLine, RenderQueue};
use crate::row::RowSet;
use crate::traits::Force;

/// A two-body joint, or a one-body joint pinned to a world anchor.
#[derive(Debug)]
pub struct Joint {
    body_ids: [BodyId; 2],
    /// Local anchor on body A, or the world anchor for one-body joints.
    anchor_a: Vec2,
    /// Local anchor on body B.
    anchor_b: Vec2,
    /// Relative angle at rest.
    rest_angle: Scalar,
    /// Torque-arm surrogate L = ‖sA + sB‖² over the body sizes.
    arm: Scalar,
    /// Constraint residual captured at construction.
    c0: Vec3,
    two_body: bool,
    rows: RowSet,
}

impl Joint {
    /// Creates a joint between `body_a` and `body_b`. A `None` body A
    /// pins body B to the world anchor `anchor_a`.
    ///
    /// `stiffness` is (linear x, linear y, angular); `fracture` applies
    /// to the angular row and defaults to infinity.
    pub fn new(
        bodies: &BodySet,
        body_a: Option<BodyId>,
        body_b: BodyId,
        anchor_a: Vec2,
        anchor_b: Vec2,
        stiffness: Vec3,
        fracture: Option<Scalar>,
    ) -> MarrowResult<Self> {
        let b = bodies
            .get(body_b)
            .ok_or_else(|| MarrowError::InvalidConstraint("joint body B does not exist".into()))?;

        let (theta_a, size_a) = match body_a {
            Some(a) => {
                if a == body_b {
                    return Err(MarrowError::InvalidConstraint(
                        "joint must reference two distinct bodies".into(),
                    ));
                }
                let body = bodies.get(a).ok_or_else(|| {
                    MarrowError::InvalidConstraint("joint body A does not exist".into())
                })?;
                (body.angle(), body.size)
            }
            None => (0.0, Vec2::ZERO),
        };

        let arm = (size_a + b.size).length_squared();
        let rest_angle = theta_a - b.angle();

        let mut rows = RowSet::new(3);
        for (i, row) in rows.rows_mut().iter_mut().enumerate() {
            row.stiffness = stiffness[i];
        }
        rows.rows_mut()[2].fracture = fracture.unwrap_or(Scalar::INFINITY);

        let mut joint = Self {
            body_ids: [body_a.unwrap_or(body_b), body_b],
            anchor_a,
            anchor_b,
            rest_angle,
            arm,
            c0: Vec3::ZERO,
            two_body: body_a.is_some(),
            rows,
        };
        joint.c0 = joint.raw_constraint(bodies);
        Ok(joint)
    }

    fn body_a(&self) -> Option<BodyId> {
        self.two_body.then(|| self.body_ids[0])
    }

    fn body_b(&self) -> BodyId {
        self.body_ids[1]
    }

    /// World position of the A-side anchor.
    fn anchor_a_world(&self, bodies: &BodySet) -> Vec2 {
        match self.body_a().and_then(|a| bodies.get(a)) {
            Some(body) => body.local_to_world(self.anchor_a),
            None => self.anchor_a,
        }
    }

    fn raw_constraint(&self, bodies: &BodySet) -> Vec3 {
        let theta_a = self
            .body_a()
            .and_then(|a| bodies.get(a))
            .map(|b| b.angle())
            .unwrap_or(0.0);

        let Some(b) = bodies.get(self.body_b()) else {
            return Vec3::ZERO;
        };

        let d = self.anchor_a_world(bodies) - b.local_to_world(self.anchor_b);
        Vec3::new(d.x, d.y, (theta_a - b.angle() - self.rest_angle) * self.arm)
    }
}

impl Force for Joint {
    fn bodies(&self) -> &[BodyId] {
        if self.two_body {
            &self.body_ids
        } else {
            &self.body_ids[1..]
        }
    }

    fn rows(&self) -> &RowSet {
        &self.rows
    }

    fn rows_mut(&mut self) -> &mut RowSet {
        &mut self.rows
    }

    fn initialize(&mut self, bodies: &BodySet) -> bool {
        if let Some(a) = self.body_a() {
            if !bodies.contains(a) {
                return false;
            }
        }
        bodies.contains(self.body_b())
    }

    fn compute_constraints(&mut self, bodies: &BodySet, alpha: Scalar) {
        let c = self.raw_constraint(bodies);
        let leak = 1.0 - alpha;
        let c0 = self.c0;
        for (i, row) in self.rows.rows_mut().iter_mut().enumerate() {
            row.c = c[i] - leak * c0[i];
        }
    }

    fn compute_derivatives(&mut self, bodies: &BodySet, body: BodyId) {
        let arm = self.arm;

        if self.two_body && body == self.body_ids[0] {
            let Some(a) = bodies.get(body) else { return };
            let u = a.rotation() * self.anchor_a;
            let rows = self.rows.rows_mut();

            rows[0].j = Vec3::new(1.0, 0.0, -u.y);
            rows[0].h = angular_entry(-u.x);
            rows[1].j = Vec3::new(0.0, 1.0, u.x);
            rows[1].h = angular_entry(-u.y);
            rows[2].j = Vec3::new(0.0, 0.0, arm);
            rows[2].h = Mat3::ZERO;
        } else if body == self.body_ids[1] {
            let Some(b) = bodies.get(body) else { return };
            let v = b.rotation() * self.anchor_b;
            let rows = self.rows.rows_mut();

            rows[0].j = Vec3::new(-1.0, 0.0, v.y);
            rows[0].h = angular_entry(v.x);
            rows[1].j = Vec3::new(0.0, -1.0, -v.x);
            rows[1].h = angular_entry(v.y);
            rows[2].j = Vec3::new(0.0, 0.0, -arm);
            rows[2].h = Mat3::ZERO;
        }
    }

    fn render_shapes(&self, bodies: &BodySet, queue: &mut RenderQueue) {
        let Some(b) = bodies.get(self.body_b()) else {
            return;
        };
        let k = self
            .rows
            .rows()
            .iter()
            .map(|r| r.stiffness)
            .fold(0.0, Scalar::max);
        queue.lines.push(RenderLine {
            a: self.anchor_a_world(bodies),
            b: b.local_to_world(self.anchor_b),
            thickness: stiffness_thickness(k),
        });
    }

    fn set_world_anchor(&mut self, anchor: Vec2) {
        if !self.two_body {
            self.anchor_a = anchor;
            self.c0 = Vec3::ZERO;
        }
    }
}

/// A Hessian whose only nonzero entry is the angular-angular slot.
#[inline]
fn angular_entry(value: Scalar) -> Mat3 {
    let mut h = Mat3::ZERO;
    h.z_axis.z = value;
    h
}
