//! The energy trait — FEM elements as the solver sees them.

use glam::{Mat3, Vec3};
use marrow_body::BodySet;
use marrow_types::{BodyId, Scalar};

use crate::projection::ProjectionMode;

/// Per-body gradient and SPD-projected Hessian of one element.
///
/// Participants are particles, so the angular entries are zero.
#[derive(Debug, Clone, Copy)]
pub struct EnergyTerms {
    pub gradient: Vec3,
    pub hessian: Mat3,
}

impl EnergyTerms {
    /// Zero contribution (body not in the element, missing geometry).
    pub const ZERO: Self = Self {
        gradient: Vec3::ZERO,
        hessian: Mat3::ZERO,
    };
}

/// A hyperelastic element over three particle bodies.
///
/// The solver drives the element each step: `initialize` once, then
/// `compute_energy_terms` per touched body per iteration, and
/// `ramp_stiffness` in the dual-update phase. `decay_stiffness` is the
/// warm-start decay applied alongside force initialization.
pub trait Energy {
    /// The three particles of this element.
    fn particles(&self) -> &[BodyId];

    /// One-shot per-step setup; false requests removal.
    fn initialize(&mut self, bodies: &BodySet) -> bool;

    /// Gradient and projected Hessian for `body`, caching the element
    /// energy and strain as a side effect.
    fn compute_energy_terms(
        &mut self,
        bodies: &BodySet,
        body: BodyId,
        mode: ProjectionMode,
        trust_ratio: Scalar,
    ) -> EnergyTerms;

    /// Warm-start decay: kₑff ← clamp(γ·kₑff, [floor, k*]).
    fn decay_stiffness(&mut self, gamma: Scalar);

    /// Refreshes the strain measure from the current configuration and
    /// grows kₑff ← min(kₑff + β_energy·strain, k*).
    fn ramp_stiffness(&mut self, bodies: &BodySet, beta_energy: Scalar);

    /// Cached elastic energy from the last term computation.
    fn energy(&self) -> Scalar;

    /// Cached strain measure.
    fn strain(&self) -> Scalar;

    /// Current effective stiffness kₑff.
    fn effective_stiffness(&self) -> Scalar;

    /// Target stiffness k*.
    fn target_stiffness(&self) -> Scalar;

    /// Ramp completion kₑff / k* in (0, 1].
    fn ramp_fraction(&self) -> Scalar {
        self.effective_stiffness() / self.target_stiffness()
    }
}
