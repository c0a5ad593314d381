//! Neo-Hookean constitutive model.
//!
//! Ψ = (µ/2)(I₁ − 2) + (λ/2)(J − a)² with a = 1 + µ/λ, so the rest
//! configuration is stress-free. P = µF + λ(J − a)·cof(F).
//!
//! The Hessian eigensystem in singular-value coordinates: the scaling
//! block has diagonal µ + λσⱼ² (opposite index) and off-diagonal
//! λ(2J − a); the twist and flip eigenvalues reduce to the closed
//! forms µ ± λ(J − a), which equal the (ψ₁ ± ψ₂)/(σ₁ ± σ₂) quotients
//! everywhere, including the σ₁ = σ₂ limit.

use marrow_body::BodySet;
use marrow_math::{cofactor2, Mat2};
use marrow_types::constants::INVERSION_EPSILON;
use marrow_types::{BodyId, MarrowResult, Scalar};

use crate::element::{embed_terms, lame_parameters, TriangleElement};
use crate::projection::ProjectionMode;
use crate::traits::{Energy, EnergyTerms};

/// Neo-Hookean triangle element.
#[derive(Debug, Clone)]
pub struct NeoHookean {
    elem: TriangleElement,
}

impl NeoHookean {
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

    /// Builds an element from Lamé coefficients. µ and λ must be
    /// positive (a = 1 + µ/λ is undefined otherwise).
    pub fn from_lame(
        bodies: &BodySet,
        particles: [BodyId; 3],
        mu: Scalar,
        lambda: Scalar,
    ) -> MarrowResult<Self> {
        if mu <= 0.0 || lambda <= 0.0 {
            return Err(marrow_types::MarrowError::InvalidConstraint(
                "Neo-Hookean requires positive Lamé coefficients".into(),
            ));
        }
        Ok(Self {
            elem: TriangleElement::new(bodies, particles, mu, lambda)?,
        })
    }

    /// The underlying element.
    pub fn element(&self) -> &TriangleElement {
        &self.elem
    }

    fn strain_measure(f: Mat2, j: Scalar) -> Scalar {
        let d = f - Mat2::IDENTITY;
        let frob = (d.x_axis.length_squared() + d.y_axis.length_squared()).sqrt();
        frob + (j - 1.0).abs()
    }
}

impl Energy for NeoHookean {
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
        self.elem.strain = Self::strain_measure(f, j);

        if j <= INVERSION_EPSILON {
            return self.elem.inversion_terms(f, j, slot);
        }

        let mu = self.elem.mu;
        let lambda = self.elem.lame_lambda;
        let a = 1.0 + mu / lambda;

        let i1 = f.x_axis.length_squared() + f.y_axis.length_squared();
        let psi = 0.5 * mu * (i1 - 2.0) + 0.5 * lambda * (j - a) * (j - a);
        self.elem.energy = self.elem.rest_area() * psi;

        let p = mu * f + (lambda * (j - a)) * cofactor2(f);
        let grad = self.elem.rest_area() * (p * self.elem.grad(slot));

        let svd = self.elem.svd(f);
        let (s1, s2) = (svd.sigma.x, svd.sigma.y);
        let scale_block = (
            mu + lambda * s2 * s2,
            lambda * (2.0 * j - a),
            mu + lambda * s1 * s1,
        );
        let twist = mu + lambda * (j - a);
        let flip = mu - lambda * (j - a);

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
            self.elem.strain = Self::strain_measure(f, f.determinant());
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
