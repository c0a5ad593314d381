//! LDLᵀ solve of a 3×3 symmetric positive-definite system.
//!
//! The primal block solve calls this once per body per iteration with a
//! left-hand side that is SPD by construction (mass matrix plus PSD
//! penalty and projected-Hessian terms). A non-positive pivot therefore
//! means that construction was violated; the solver must treat `None`
//! as fatal rather than patching the system.

use glam::{Mat3, Vec3};
use marrow_types::Scalar;

/// Solves `a · x = b` for a symmetric positive-definite 3×3 `a`.
///
/// Returns `None` when a pivot is not strictly positive, which signals
/// a regularization failure upstream.
pub fn solve_ldlt(a: Mat3, b: Vec3) -> Option<Vec3> {
    let m = a.to_cols_array_2d(); // m[col][row]; the matrix is symmetric

    let d0 = m[0][0];
    if d0 <= 0.0 {
        return None;
    }
    let l10 = m[0][1] / d0;
    let l20 = m[0][2] / d0;

    let d1 = m[1][1] - l10 * l10 * d0;
    if d1 <= 0.0 {
        return None;
    }
    let l21 = (m[1][2] - l20 * l10 * d0) / d1;

    let d2 = m[2][2] - l20 * l20 * d0 - l21 * l21 * d1;
    if d2 <= 0.0 {
        return None;
    }

    // Forward substitution: L z = b
    let z0 = b.x;
    let z1 = b.y - l10 * z0;
    let z2 = b.z - l20 * z0 - l21 * z1;

    // Diagonal: D y = z
    let y0 = z0 / d0;
    let y1 = z1 / d1;
    let y2 = z2 / d2;

    // Back substitution: Lᵀ x = y
    let x2 = y2;
    let x1 = y1 - l21 * x2;
    let x0 = y0 - l10 * x1 - l20 * x2;

    Some(Vec3::new(x0, x1, x2))
}

/// Returns true if every entry of the vector is finite.
#[inline]
pub fn is_finite3(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

/// Scales the diagonal regularizer used by the geometric stiffness term:
/// `|f| · diag(‖col₀ H‖, ‖col₁ H‖, ‖col₂ H‖)`.
pub fn geometric_stiffness(force: Scalar, h: Mat3) -> Mat3 {
    let s = force.abs();
    Mat3::from_diagonal(Vec3::new(
        s * h.x_axis.length(),
        s * h.y_axis.length(),
        s * h.z_axis.length(),
    ))
}
