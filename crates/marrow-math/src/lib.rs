//! # marrow-math
//!
//! Linear algebra primitives for the marrow physics engine.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec2`, `Mat2`, `Mat3`, etc.)
//! - LDLᵀ solve of a 3×3 symmetric positive-definite system
//! - Signed closed-form 2×2 SVD for the energy Hessian projection
//! - Small helpers glam lacks (outer products, 2D perp/cross)

pub mod ldlt;
pub mod svd2;

// Re-export glam types as the canonical math types for marrow.
pub use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

pub use ldlt::{geometric_stiffness, is_finite3, solve_ldlt};
pub use svd2::{svd2, Svd2};

use marrow_types::Scalar;

/// Rotation matrix for an angle in radians.
#[inline]
pub fn rotation(angle: Scalar) -> Mat2 {
    Mat2::from_angle(angle)
}

/// 2D perpendicular: rotates a vector 90° counter-clockwise.
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// 2D cross product (z component of the 3D cross).
#[inline]
pub fn cross2(a: Vec2, b: Vec2) -> Scalar {
    a.x * b.y - a.y * b.x
}

/// Outer product of two 2-vectors: `a · bᵀ`.
#[inline]
pub fn outer2(a: Vec2, b: Vec2) -> Mat2 {
    Mat2::from_cols(a * b.x, a * b.y)
}

/// Outer product of two 3-vectors: `a · bᵀ`.
#[inline]
pub fn outer3(a: Vec3, b: Vec3) -> Mat3 {
    Mat3::from_cols(a * b.x, a * b.y, a * b.z)
}

/// Outer product of two 4-vectors: `a · bᵀ`.
#[inline]
pub fn outer4(a: Vec4, b: Vec4) -> Mat4 {
    Mat4::from_cols(a * b.x, a * b.y, a * b.z, a * b.w)
}

/// Cofactor matrix of a 2×2 matrix, i.e. ∂(det F)/∂F.
#[inline]
pub fn cofactor2(f: Mat2) -> Mat2 {
    Mat2::from_cols(
        Vec2::new(f.y_axis.y, -f.y_axis.x),
        Vec2::new(-f.x_axis.y, f.x_axis.x),
    )
}

/// Eigen decomposition of a symmetric 2×2 matrix `[a, b; b, d]`.
///
/// Returns `(λ₁, λ₂, v₁, v₂)` with λ₁ ≥ λ₂ and unit eigenvectors.
pub fn sym_eigen2(a: Scalar, b: Scalar, d: Scalar) -> (Scalar, Scalar, Vec2, Vec2) {
    let half_trace = 0.5 * (a + d);
    let half_diff = 0.5 * (a - d);
    let disc = (half_diff * half_diff + b * b).sqrt();

    let lambda0 = half_trace + disc;
    let lambda1 = half_trace - disc;

    let (v0, v1) = if b.abs() > marrow_types::constants::EPSILON {
        let v0 = Vec2::new(lambda0 - d, b).normalize();
        let v1 = Vec2::new(-v0.y, v0.x);
        (v0, v1)
    } else if a >= d {
        (Vec2::X, Vec2::Y)
    } else {
        (Vec2::Y, Vec2::X)
    };

    (lambda0, lambda1, v0, v1)
}
