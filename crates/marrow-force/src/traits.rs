//! The force trait — the operation set the solver drives each step.

use glam::Vec2;
use marrow_body::BodySet;
use marrow_types::{BodyId, Scalar};

use crate::render::RenderQueue;
use crate::row::RowSet;

/// A constraint force contributing one or more rows to the augmented
/// Lagrangian.
///
/// The solver calls these in a fixed order each step:
///
/// ```text
/// force.initialize(bodies)            // once; false requests removal
/// loop {
///     force.compute_constraints(bodies, alpha)   // fills C per row
///     force.compute_derivatives(bodies, body)    // fills J/H for one body
/// }
/// ```
///
/// Implementations: `Joint`, `Spring`, `Length`, `TriArea` here, and
/// `Manifold` in `marrow-contact`.
pub trait Force {
    /// Bodies this force touches, in row-Jacobian order.
    fn bodies(&self) -> &[BodyId];

    /// Row storage.
    fn rows(&self) -> &RowSet;

    /// Row storage, mutable.
    fn rows_mut(&mut self) -> &mut RowSet;

    /// One-shot per-step setup. Returns false to request removal
    /// (separated contact, vanished body).
    fn initialize(&mut self, bodies: &BodySet) -> bool;

    /// Fills each row's constraint value C. Hard rows use the
    /// stabilized form `C(q) − (1−α)·C₀`.
    fn compute_constraints(&mut self, bodies: &BodySet, alpha: Scalar);

    /// Fills each row's Jacobian and Hessian scratch for `body` only.
    fn compute_derivatives(&mut self, bodies: &BodySet, body: BodyId);

    /// Latches the force off: zero stiffness, penalty and dual on all
    /// rows. Used when a fracture threshold is crossed.
    fn disable(&mut self) {
        self.rows_mut().disable();
    }

    /// True once `disable` has latched.
    fn is_disabled(&self) -> bool {
        !self.rows().enabled()
    }

    /// Appends this force's render shapes for the current step.
    fn render_shapes(&self, _bodies: &BodySet, _queue: &mut RenderQueue) {}

    /// Number of live contact points; zero for non-contact forces.
    fn contact_count(&self) -> usize {
        0
    }

    /// Moves the world anchor of an anchored force (pointer drag).
    /// Default is a no-op for forces without a world anchor.
    fn set_world_anchor(&mut self, _anchor: Vec2) {}
}
