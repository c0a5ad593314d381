//! St. Venant-Kirchhoff constitutive model.
//!
//! With the Green strain L = ½(FᵀF − I): Ψ = µ·tr(L²) + (λ/2)(tr L)²
//! and P = F·(2µL + λ·tr(L)·I).
//!
//! Eigensystem in singular-value coordinates, with t = tr L:
//! scaling block diagonal (3µ + λ)σᵢ² − µ + λt, off-diagonal λσ₁σ₂;
//! twist = µ(σ₁² − σ₁σ₂ + σ₂²) − µ + λt;
//! flip  = µ(σ₁² + σ₁σ₂ + σ₂²) − µ + λt.
//! The twist/flip forms are the algebraic closed forms of the
//! (ψ₁ ± ψ₂)/(σ₁ ± σ₂) quotients.

use marrow_body::BodySet;
use marrow_math::Mat2;
use marrow_types::constants::INVERSION_EPSILON;
use marrow_types::{BodyId, MarrowResult, Scalar};

use crate::element::{embed_terms, lame_parameters, TriangleElement};
use crate::projection::ProjectionMode;
use crate::traits::{Energy, EnergyTerms};

/// St. Venant-Kirchhoff triangle element.
#[derive(Debug, Clone)]
pub struct StVenantKirchhoff {
    elem: TriangleElement,
}

impl StVenantKirchhoff {
    /// Builds an element from Young's modulus and Poisson's ratio.
    pub fn from_young_poisson(
        bodies: &BodySet,
        particles: [BodyId; 3],
        young: Scalar,
        poisson: Scalar,
    ) -> MarrowResult<Self> {
        let (mu, lambda) = lame_parameters(young, poisson);
        Self::from_lame(bodies, particles, mu, lambda)
    }

    /// Builds an element directly from Lamé coefficients.
    pub fn from_lame(
        bodies: &BodySet,
        particles: [BodyId; 3],
        mu: Scalar,
        lambda: Scalar,
    ) -> MarrowResult<Self> {
        Ok(Self {
            elem: TriangleElement::new(bodies, particles, mu, lambda)?,
        })
    }

    /// The underlying element.
    pub fn element(&self) -> &TriangleElement {
        &self.elem
    }

    /// Green strain L = ½(FᵀF − I).
    fn green_strain(f: Mat2) -> Mat2 {
        let ftf = f.transpose() * f;
        Mat2::from_cols(
            0.5 * (ftf.x_axis - Mat2::IDENTITY.x_axis),
            0.5 * (ftf.y_axis - Mat2::IDENTITY.y_axis),
        )
    }

    fn strain_measure(l: Mat2) -> Scalar {
        let frob = (l.x_axis.length_squared() + l.y_axis.length_squared()).sqrt();
        let trace = l.x_axis.x + l.y_axis.y;
        frob + trace.abs()
    }
}

impl Energy for StVenantKirchhoff {
    fn particles(&self) -> &[BodyId] {
        self.elem.particles()
    }

    fn initialize(&mut self, bodies: &BodySet) -> bool {
        self.elem.particles_alive(bodies)
    }

    fn compute_energy_terms(
        &mut self,
        bodies: &BodySet,
        body: BodyId,
        mode: ProjectionMode,
        trust_ratio: Scalar,
    ) -> EnergyTerms {
        let Some(slot) = self.elem.slot_of(body) else {
            return EnergyTerms::ZERO;
        };
        let Some(f) = self.elem.deformation_gradient(bodies) else {
            return EnergyTerms::ZERO;
        };
        let j = f.determinant();

        let l = Self::green_strain(f);
        self.elem.strain = Self::strain_measure(l);

        if j <= INVERSION_EPSILON {
            return self.elem.inversion_terms(f, j, slot);
        }

        let mu = self.elem.mu;
        let lambda = self.elem.lame_lambda;

        let trace = l.x_axis.x + l.y_axis.y;
        let l_sq = l.x_axis.x * l.x_axis.x
            + 2.0 * l.x_axis.y * l.y_axis.x
            + l.y_axis.y * l.y_axis.y;
        let psi = mu * l_sq + 0.5 * lambda * trace * trace;
        self.elem.energy = self.elem.rest_area() * psi;

        let stress = 2.0 * mu * l + lambda * trace * Mat2::IDENTITY;
        let p = f * stress;
        let grad = self.elem.rest_area() * (p * self.elem.grad(slot));

        let svd = self.elem.svd(f);
        let (s1, s2) = (svd.sigma.x, svd.sigma.y);
        let scale_block = (
            (3.0 * mu + lambda) * s1 * s1 - mu + lambda * trace,
            lambda * s1 * s2,
            (3.0 * mu + lambda) * s2 * s2 - mu + lambda * trace,
        );
        let cross = s1 * s2;
        let sum_sq = s1 * s1 + s2 * s2;
        let twist = mu * (sum_sq - cross) - mu + lambda * trace;
        let flip = mu * (sum_sq + cross) - mu + lambda * trace;

        let hess = self
            .elem
            .assemble_hessian(&svd, scale_block, twist, flip, mode, trust_ratio, slot);

        embed_terms(grad, hess)
    }

    fn decay_stiffness(&mut self, gamma: Scalar) {
        self.elem.decay_stiffness(gamma);
    }

    fn ramp_stiffness(&mut self, bodies: &BodySet, beta_energy: Scalar) {
        if let Some(f) = self.elem.deformation_gradient(bodies) {
            self.elem.strain = Self::strain_measure(Self::green_strain(f));
        }
        self.elem.grow_stiffness(beta_energy);
    }

    fn energy(&self) -> Scalar {
        self.elem.energy
    }

    fn strain(&self) -> Scalar {
        self.elem.strain
    }

    fn effective_stiffness(&self) -> Scalar {
        self.elem.effective_stiffness()
    }

    fn target_stiffness(&self) -> Scalar {
        self.elem.target_stiffness()
    }
}
