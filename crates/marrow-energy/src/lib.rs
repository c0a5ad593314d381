//! # marrow-energy
//!
//! Hyperelastic finite-element energies over triangles of particle
//! bodies.
//!
//! Each element follows the same per-body pipeline: build the
//! deformation gradient F = Ds · Dm⁻¹, evaluate the energy density and
//! first Piola-Kirchhoff stress of the constitutive model, and assemble
//! a per-body Hessian from the analytic eigensystem of ∂²Ψ/∂F² in
//! singular-value coordinates, projected to SPD. Inverted elements
//! (det F ≤ ε) fall through to a diagonal penalty pushing back toward
//! ε.
//!
//! Models: Neo-Hookean and St. Venant-Kirchhoff.

pub mod element;
pub mod neo_hookean;
pub mod projection;
pub mod stvk;
pub mod traits;

pub use element::TriangleElement;
pub use neo_hookean::NeoHookean;
pub use projection::ProjectionMode;
pub use stvk::StVenantKirchhoff;
pub use traits::{Energy, EnergyTerms};
