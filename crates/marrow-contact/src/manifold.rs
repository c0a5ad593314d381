//! Persistent contact manifold with warm-started friction rows.
//!
//! A manifold is a force with two rows per contact: row 2i is the
//! normal (pushing only), row 2i+1 the tangent (Coulomb cone). It is
//! created by the broadphase the first time two bodies' bounding
//! circles overlap and persists until narrow-phase separation, so
//! penalties and duals carry across steps through feature-id matching.

use glam::{Vec2, Vec3};
use marrow_body::BodySet;
use marrow_force::{Force, RenderQueue, RowSet};
use marrow_math::cross2;
use marrow_types::constants::{COLLISION_MARGIN, PENALTY_MIN, STICK_THRESHOLD};
use marrow_types::{BodyId, Scalar};

use crate::feature::FeatureId;
use crate::sat::collide;

/// One persistent contact point.
#[derive(Debug, Clone, Copy)]
pub struct ContactPoint {
    /// Packed edge tags identifying this point across steps.
    pub feature: FeatureId,
    /// Local anchor in body A's frame.
    pub p_a: Vec2,
    /// Local anchor in body B's frame.
    pub p_b: Vec2,
    /// World contact normal, pointing from B toward A.
    pub normal: Vec2,
    /// Normal/tangent Jacobians for both bodies, frozen at initialize.
    pub j_an: Vec3,
    pub j_at: Vec3,
    pub j_bn: Vec3,
    pub j_bt: Vec3,
    /// Initial (normal gap + margin, tangential drift) at step start.
    pub c0: Vec2,
    /// True while static friction holds this point in place.
    pub stick: bool,
}

#[derive(Debug, Clone, Copy)]
struct OldContact {
    key: u32,
    p_a: Vec2,
    p_b: Vec2,
    penalty: [Scalar; 2],
    lambda: [Scalar; 2],
    stick: bool,
}

/// Persistent box-box contact between two bodies.
#[derive(Debug)]
pub struct Manifold {
    body_ids: [BodyId; 2],
    /// Effective Coulomb coefficient √(µA·µB).
    friction: Scalar,
    contacts: [Option<ContactPoint>; 2],
    contact_count: usize,
    rows: RowSet,
}

impl Manifold {
    /// Creates an empty manifold for a broadphase-admitted pair.
    pub fn new(body_a: BodyId, body_b: BodyId) -> Self {
        Self {
            body_ids: [body_a, body_b],
            friction: 0.0,
            contacts: [None; 2],
            contact_count: 0,
            rows: RowSet::new(0),
        }
    }

    /// Live contact points.
    pub fn contacts(&self) -> impl Iterator<Item = &ContactPoint> {
        self.contacts[..self.contact_count].iter().flatten()
    }

    /// Number of live contacts.
    pub fn contact_count(&self) -> usize {
        self.contact_count
    }

    /// Effective friction coefficient.
    pub fn friction(&self) -> Scalar {
        self.friction
    }
}

impl Force for Manifold {
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
        let (Some(a), Some(b)) = (bodies.get(self.body_ids[0]), bodies.get(self.body_ids[1]))
        else {
            return false;
        };

        // Snapshot the previous step's contacts for warm-start lookup.
        let mut old = [None::<OldContact>; 2];
        for (i, contact) in self.contacts[..self.contact_count].iter().enumerate() {
            if let Some(c) = contact {
                let rows = self.rows.rows();
                old[i] = Some(OldContact {
                    key: c.feature.key(),
                    p_a: c.p_a,
                    p_b: c.p_b,
                    penalty: [rows[2 * i].penalty, rows[2 * i + 1].penalty],
                    lambda: [rows[2 * i].lambda, rows[2 * i + 1].lambda],
                    stick: c.stick,
                });
            }
        }

        let raw = collide(a, b);
        if raw.is_empty() {
            return false;
        }

        self.friction = (a.friction * b.friction).sqrt();
        self.contact_count = raw.len().min(2);
        self.rows.set_len(2 * self.contact_count);

        let rot_at = a.rotation().transpose();
        let rot_bt = b.rotation().transpose();

        for (i, rc) in raw.iter().take(2).enumerate() {
            // Normal points from B toward A so a negative gap produces
            // a separating (non-positive) row force.
            let normal = -rc.normal;

            let mut p_a = rot_at * (rc.position - a.position());
            let mut p_b = rot_bt * ((rc.position - rc.separation * normal) - b.position());

            let mut penalty = [PENALTY_MIN; 2];
            let mut lambda = [0.0; 2];
            let mut stick = false;

            let key = rc.feature.key();
            if let Some(prev) = old.iter().flatten().find(|o| o.key == key) {
                penalty = prev.penalty;
                lambda = prev.lambda;
                stick = prev.stick;
                if stick {
                    // Static friction resists motion relative to the
                    // persistent anchor, not the freshly clipped one.
                    p_a = prev.p_a;
                    p_b = prev.p_b;
                }
            }

            let tangent = Vec2::new(normal.y, -normal.x);
            let r_a = a.rotation() * p_a;
            let r_b = b.rotation() * p_b;

            let d = (a.position() + r_a) - (b.position() + r_b);
            let c0 = Vec2::new(normal.dot(d) + COLLISION_MARGIN, tangent.dot(d));

            self.contacts[i] = Some(ContactPoint {
                feature: rc.feature,
                p_a,
                p_b,
                normal,
                j_an: Vec3::new(normal.x, normal.y, cross2(r_a, normal)),
                j_at: Vec3::new(tangent.x, tangent.y, cross2(r_a, tangent)),
                j_bn: Vec3::new(-normal.x, -normal.y, -cross2(r_b, normal)),
                j_bt: Vec3::new(-tangent.x, -tangent.y, -cross2(r_b, tangent)),
                c0,
                stick,
            });

            let rows = self.rows.rows_mut();
            let rn = &mut rows[2 * i];
            rn.stiffness = Scalar::INFINITY;
            rn.penalty = penalty[0];
            rn.lambda = lambda[0];
            rn.fmin = Scalar::NEG_INFINITY;
            rn.fmax = 0.0;
            rn.fracture = Scalar::INFINITY;

            let rt = &mut rows[2 * i + 1];
            rt.stiffness = Scalar::INFINITY;
            rt.penalty = penalty[1];
            rt.lambda = lambda[1];
            rt.fracture = Scalar::INFINITY;
            let cone = self.friction * lambda[0].abs();
            rt.fmin = -cone;
            rt.fmax = cone;
        }
        for slot in self.contacts[self.contact_count..].iter_mut() {
            *slot = None;
        }

        true
    }

    fn compute_constraints(&mut self, bodies: &BodySet, alpha: Scalar) {
        let (Some(a), Some(b)) = (bodies.get(self.body_ids[0]), bodies.get(self.body_ids[1]))
        else {
            return;
        };
        let da = a.pose - a.last_pose;
        let db = b.pose - b.last_pose;
        let leak = 1.0 - alpha;
        let friction = self.friction;

        for i in 0..self.contact_count {
            let Some(contact) = &mut self.contacts[i] else {
                continue;
            };
            let rows = self.rows.rows_mut();

            rows[2 * i].c = leak * contact.c0.x + contact.j_an.dot(da) + contact.j_bn.dot(db);
            rows[2 * i + 1].c = leak * contact.c0.y + contact.j_at.dot(da) + contact.j_bt.dot(db);

            // Coulomb cone refresh from the current normal dual.
            let cone = friction * rows[2 * i].lambda.abs();
            rows[2 * i + 1].fmin = -cone;
            rows[2 * i + 1].fmax = cone;

            contact.stick =
                rows[2 * i + 1].lambda.abs() < cone && contact.c0.y.abs() < STICK_THRESHOLD;
        }
    }

    fn compute_derivatives(&mut self, _bodies: &BodySet, body: BodyId) {
        // Jacobians are frozen at initialize; the Hessian of the
        // linearized gap is zero.
        let is_a = body == self.body_ids[0];
        for i in 0..self.contact_count {
            let Some(contact) = &self.contacts[i] else {
                continue;
            };
            let (jn, jt) = if is_a {
                (contact.j_an, contact.j_at)
            } else {
                (contact.j_bn, contact.j_bt)
            };
            let rows = self.rows.rows_mut();
            rows[2 * i].j = jn;
            rows[2 * i].h = glam::Mat3::ZERO;
            rows[2 * i + 1].j = jt;
            rows[2 * i + 1].h = glam::Mat3::ZERO;
        }
    }

    fn render_shapes(&self, bodies: &BodySet, queue: &mut RenderQueue) {
        let Some(a) = bodies.get(self.body_ids[0]) else {
            return;
        };
        for contact in self.contacts() {
            queue.points.push(a.local_to_world(contact.p_a));
        }
    }

    fn contact_count(&self) -> usize {
        self.contact_count
    }
}
