//! Triangle area preservation over three particle bodies.
//!
//! C = ½·cross(pB − pA, pC − pA) − A₀. Each vertex Jacobian is the
//! 90°-rotated opposite edge scaled by ½; the angular entries are zero
//! because the participants are particles.

use glam::{Mat3, Vec3};
use marrow_body::BodySet;
use marrow_math::{cross2, perp};
use marrow_types::{BodyId, MarrowError, MarrowResult, Scalar};

use crate::row::RowSet;
use crate::traits::Force;

/// One soft row over three particles.
#[derive(Debug)]
pub struct TriArea {
    body_ids: [BodyId; 3],
    rest_area: Scalar,
    rows: RowSet,
}

impl TriArea {
    /// Creates an area constraint with the current area as rest area.
    pub fn new(
        bodies: &BodySet,
        particles: [BodyId; 3],
        stiffness: Scalar,
    ) -> MarrowResult<Self> {
        if particles[0] == particles[1]
            || particles[1] == particles[2]
            || particles[0] == particles[2]
        {
            return Err(MarrowError::InvalidConstraint(
                "area constraint must reference three distinct bodies".into(),
            ));
        }

        let mut positions = [glam::Vec2::ZERO; 3];
        for (slot, &id) in particles.iter().enumerate() {
            positions[slot] = bodies
                .get(id)
                .ok_or_else(|| {
                    MarrowError::InvalidConstraint("area constraint references a missing body".into())
                })?
                .position();
        }

        let rest_area = 0.5 * cross2(positions[1] - positions[0], positions[2] - positions[0]);

        let mut rows = RowSet::new(1);
        rows.rows_mut()[0].stiffness = stiffness;

        Ok(Self {
            body_ids: particles,
            rest_area,
            rows,
        })
    }

    /// The rest area captured at construction.
    pub fn rest_area(&self) -> Scalar {
        self.rest_area
    }
}

impl Force for TriArea {
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
        self.body_ids.iter().all(|&id| bodies.contains(id))
    }

    fn compute_constraints(&mut self, bodies: &BodySet, _alpha: Scalar) {
        let (Some(a), Some(b), Some(c)) = (
            bodies.get(self.body_ids[0]),
            bodies.get(self.body_ids[1]),
            bodies.get(self.body_ids[2]),
        ) else {
            return;
        };
        let area = 0.5 * cross2(b.position() - a.position(), c.position() - a.position());
        self.rows.rows_mut()[0].c = area - self.rest_area;
    }

    fn compute_derivatives(&mut self, bodies: &BodySet, body: BodyId) {
        let row = &mut self.rows.rows_mut()[0];
        row.j = Vec3::ZERO;
        row.h = Mat3::ZERO;

        let (Some(a), Some(b), Some(c)) = (
            bodies.get(self.body_ids[0]),
            bodies.get(self.body_ids[1]),
            bodies.get(self.body_ids[2]),
        ) else {
            return;
        };
        let (pa, pb, pc) = (a.position(), b.position(), c.position());

        let grad = if body == self.body_ids[0] {
            0.5 * perp(pc - pb)
        } else if body == self.body_ids[1] {
            0.5 * perp(pa - pc)
        } else if body == self.body_ids[2] {
            0.5 * perp(pb - pa)
        } else {
            return;
        };
        row.j = Vec3::new(grad.x, grad.y, 0.0);
    }
}
