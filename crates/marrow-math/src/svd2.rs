//! Signed closed-form 2×2 singular value decomposition.
//!
//! The energy Hessian projection needs `F = U · diag(σ) · Vᵀ` with both
//! factors proper rotations. The closed form below always produces
//! rotations for U and V; when det F < 0 the smaller singular value σ₂
//! carries the negative sign instead, so the orientation convention
//! `det(U · Vᵀ) = +1` holds by construction and σ₁ ≥ |σ₂|.

use glam::{Mat2, Vec2};

/// Result of a signed 2×2 SVD: `f = u · diag(sigma) · vᵀ`.
#[derive(Debug, Clone, Copy)]
pub struct Svd2 {
    /// Left factor, a proper rotation.
    pub u: Mat2,
    /// Singular values (σ₁, σ₂) with σ₁ ≥ |σ₂|; σ₂ < 0 iff det f < 0.
    pub sigma: Vec2,
    /// Right factor, a proper rotation.
    pub v: Mat2,
}

/// Computes the signed SVD of a 2×2 matrix.
pub fn svd2(f: Mat2) -> Svd2 {
    // glam is column-major: x_axis = (f00, f10), y_axis = (f01, f11).
    let f00 = f.x_axis.x;
    let f10 = f.x_axis.y;
    let f01 = f.y_axis.x;
    let f11 = f.y_axis.y;

    let e = 0.5 * (f00 + f11);
    let h = 0.5 * (f10 - f01);
    let fd = 0.5 * (f00 - f11);
    let g = 0.5 * (f10 + f01);

    let q = (e * e + h * h).sqrt();
    let r = (fd * fd + g * g).sqrt();

    let s1 = q + r;
    let s2 = q - r;

    let a1 = g.atan2(fd);
    let a2 = h.atan2(e);

    let beta = 0.5 * (a2 - a1);
    let gamma = 0.5 * (a2 + a1);

    Svd2 {
        u: Mat2::from_angle(gamma),
        sigma: Vec2::new(s1, s2),
        v: Mat2::from_angle(-beta),
    }
}

impl Svd2 {
    /// Reconstructs the decomposed matrix (for testing).
    pub fn reconstruct(&self) -> Mat2 {
        self.u * Mat2::from_diagonal(self.sigma) * self.v.transpose()
    }
}
