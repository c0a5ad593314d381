//! Shared per-triangle rest-state data and the pieces of the energy
//! pipeline common to all constitutive models.

use glam::{Mat2, Mat3, Vec2, Vec3};
use marrow_body::BodySet;
use marrow_math::{cofactor2, outer2, svd2, sym_eigen2, Svd2};
use marrow_types::constants::{
    DEGENERATE_LENGTH, ENERGY_STIFFNESS_FLOOR, INVERSION_EPSILON, INVERSION_PENALTY_SCALE,
};
use marrow_types::{BodyId, MarrowError, MarrowResult, Scalar};

use crate::projection::ProjectionMode;
use crate::traits::EnergyTerms;

/// Lamé parameters from Young's modulus and Poisson's ratio.
pub fn lame_parameters(young: Scalar, poisson: Scalar) -> (Scalar, Scalar) {
    let mu = young / (2.0 * (1.0 + poisson));
    let lambda = young * poisson / ((1.0 + poisson) * (1.0 - 2.0 * poisson));
    (mu, lambda)
}

/// Rest-state data and ramp bookkeeping for one triangle element.
#[derive(Debug, Clone)]
pub struct TriangleElement {
    particles: [BodyId; 3],
    /// Inverse rest-shape matrix Dm⁻¹.
    dm_inv: Mat2,
    /// Rest area A₀.
    rest_area: Scalar,
    /// Shape-function gradients; ∇N₀ = −∇N₁ − ∇N₂.
    grads: [Vec2; 3],
    /// Lamé coefficients.
    pub(crate) mu: Scalar,
    pub(crate) lame_lambda: Scalar,
    /// Target stiffness k* the ramp approaches.
    target_stiffness: Scalar,
    /// Effective stiffness kₑff, ramped from the floor toward k*.
    eff_stiffness: Scalar,
    /// Cached element energy from the last term computation.
    pub(crate) energy: Scalar,
    /// Cached strain measure.
    pub(crate) strain: Scalar,
}

impl TriangleElement {
    /// Builds rest-state data from the particles' current positions.
    pub fn new(
        bodies: &BodySet,
        particles: [BodyId; 3],
        mu: Scalar,
        lame_lambda: Scalar,
    ) -> MarrowResult<Self> {
        let mut p = [Vec2::ZERO; 3];
        for (slot, &id) in particles.iter().enumerate() {
            p[slot] = bodies
                .get(id)
                .ok_or_else(|| {
                    MarrowError::InvalidConstraint("element references a missing body".into())
                })?
                .position();
        }

        let dm = Mat2::from_cols(p[1] - p[0], p[2] - p[0]);
        let det = dm.determinant();
        if det <= DEGENERATE_LENGTH {
            return Err(MarrowError::InvalidConstraint(
                "element rest shape is degenerate or inverted".into(),
            ));
        }

        let dm_inv = dm.inverse();
        let dm_inv_t = dm_inv.transpose();
        let g1 = dm_inv_t.x_axis;
        let g2 = dm_inv_t.y_axis;

        Ok(Self {
            particles,
            dm_inv,
            rest_area: 0.5 * det,
            grads: [-g1 - g2, g1, g2],
            mu,
            lame_lambda,
            target_stiffness: mu + lame_lambda,
            eff_stiffness: ENERGY_STIFFNESS_FLOOR,
            energy: 0.0,
            strain: 0.0,
        })
    }

    /// The element's particles.
    pub fn particles(&self) -> &[BodyId; 3] {
        &self.particles
    }

    /// Rest area A₀.
    pub fn rest_area(&self) -> Scalar {
        self.rest_area
    }

    /// Shape-function gradient of one vertex.
    pub fn grad(&self, slot: usize) -> Vec2 {
        self.grads[slot]
    }

    /// Index of `body` within the element.
    pub fn slot_of(&self, body: BodyId) -> Option<usize> {
        self.particles.iter().position(|&p| p == body)
    }

    /// True while all particles are alive.
    pub fn particles_alive(&self, bodies: &BodySet) -> bool {
        self.particles.iter().all(|&id| bodies.contains(id))
    }

    /// Deformation gradient F = Ds · Dm⁻¹ from current positions.
    pub fn deformation_gradient(&self, bodies: &BodySet) -> Option<Mat2> {
        let a = bodies.get(self.particles[0])?.position();
        let b = bodies.get(self.particles[1])?.position();
        let c = bodies.get(self.particles[2])?.position();
        let ds = Mat2::from_cols(b - a, c - a);
        Some(ds * self.dm_inv)
    }

    /// Current effective stiffness.
    pub fn effective_stiffness(&self) -> Scalar {
        self.eff_stiffness
    }

    /// Ramp target.
    pub fn target_stiffness(&self) -> Scalar {
        self.target_stiffness
    }

    /// Warm-start decay of the effective stiffness.
    pub fn decay_stiffness(&mut self, gamma: Scalar) {
        self.eff_stiffness =
            (gamma * self.eff_stiffness).clamp(ENERGY_STIFFNESS_FLOOR, self.target_stiffness);
    }

    /// Grows the effective stiffness from the cached strain.
    pub fn grow_stiffness(&mut self, beta_energy: Scalar) {
        self.eff_stiffness =
            (self.eff_stiffness + beta_energy * self.strain).min(self.target_stiffness);
    }

    /// Inversion penalty for det F ≤ ε: a diagonal Hessian and a
    /// gradient pushing det F back toward ε. Caches the penalty energy.
    pub(crate) fn inversion_terms(&mut self, f: Mat2, j: Scalar, slot: usize) -> EnergyTerms {
        let alpha = INVERSION_PENALTY_SCALE * self.mu.max(self.lame_lambda);
        let depth = INVERSION_EPSILON - j;

        self.energy = self.rest_area * alpha * depth * depth;

        let grad = -(self.rest_area * alpha * depth) * (cofactor2(f) * self.grads[slot]);
        let hess = self.rest_area * alpha * Mat2::IDENTITY;
        embed_terms(grad, hess)
    }

    /// Assembles the per-body 2×2 Hessian from the four projected
    /// eigenpairs of ∂²Ψ/∂F² in singular-value coordinates.
    ///
    /// The Frobenius basis is built from the SVD factors: the two
    /// scaling modes mix D₁₁ = u₁⊗v₁ and D₂₂ = u₂⊗v₂ through the
    /// eigenvectors of the 2×2 scaling block; twist = (D₁₂ − D₂₁)/√2
    /// and flip = (D₁₂ + D₂₁)/√2.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble_hessian(
        &self,
        svd: &Svd2,
        scale_block: (Scalar, Scalar, Scalar),
        twist: Scalar,
        flip: Scalar,
        mode: ProjectionMode,
        trust_ratio: Scalar,
        slot: usize,
    ) -> Mat2 {
        let (a11, a12, a22) = scale_block;
        let (e1, e2, v1, v2) = sym_eigen2(a11, a12, a22);

        let vt = svd.v.transpose();
        let inv_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;

        let modes = [
            (e1, svd.u * Mat2::from_diagonal(v1) * vt),
            (e2, svd.u * Mat2::from_diagonal(v2) * vt),
            (
                twist,
                svd.u * Mat2::from_cols(Vec2::new(0.0, -1.0), Vec2::new(1.0, 0.0)) * vt * inv_sqrt2,
            ),
            (
                flip,
                svd.u * Mat2::from_cols(Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0)) * vt * inv_sqrt2,
            ),
        ];

        let g = self.grads[slot];
        let mut h = Mat2::ZERO;
        for (eigenvalue, q) in modes {
            let projected = mode.project(eigenvalue, trust_ratio);
            let w = q * g;
            h = h + projected * outer2(w, w);
        }
        h * self.rest_area
    }

    /// Computes the SVD of the current deformation gradient.
    pub(crate) fn svd(&self, f: Mat2) -> Svd2 {
        svd2(f)
    }
}

/// Lifts particle-space gradient and Hessian into generalized
/// coordinates; the angular entries stay zero.
pub(crate) fn embed_terms(grad: Vec2, hess: Mat2) -> EnergyTerms {
    EnergyTerms {
        gradient: Vec3::new(grad.x, grad.y, 0.0),
        hessian: Mat3::from_cols(
            Vec3::new(hess.x_axis.x, hess.x_axis.y, 0.0),
            Vec3::new(hess.y_axis.x, hess.y_axis.y, 0.0),
            Vec3::ZERO,
        ),
    }
}
