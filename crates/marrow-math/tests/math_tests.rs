//! Integration tests for marrow-math.

use glam::{Mat2, Mat3, Vec2, Vec3};
use marrow_math::{
    cofactor2, cross2, outer2, outer3, perp, rotation, solve_ldlt, svd2, sym_eigen2,
};

// ─── LDLᵀ Tests ───────────────────────────────────────────────

#[test]
fn ldlt_identity() {
    let b = Vec3::new(1.0, -2.0, 3.0);
    let x = solve_ldlt(Mat3::IDENTITY, b).unwrap();
    assert!((x - b).length() < 1e-6);
}

#[test]
fn ldlt_spd_system() {
    // A = Lᵀ·L + diagonal shift is SPD by construction.
    let a = Mat3::from_cols(
        Vec3::new(4.0, 1.0, 0.5),
        Vec3::new(1.0, 3.0, 0.2),
        Vec3::new(0.5, 0.2, 5.0),
    );
    let b = Vec3::new(1.0, 2.0, 3.0);
    let x = solve_ldlt(a, b).unwrap();
    let residual = a * x - b;
    assert!(
        residual.length() < 1e-4,
        "residual {residual:?} too large for x = {x:?}"
    );
}

#[test]
fn ldlt_rejects_negative_pivot() {
    let a = Mat3::from_diagonal(Vec3::new(-1.0, 1.0, 1.0));
    assert!(solve_ldlt(a, Vec3::ONE).is_none());
}

#[test]
fn ldlt_rejects_indefinite() {
    // Second pivot goes non-positive after elimination.
    let a = Mat3::from_cols(
        Vec3::new(1.0, 2.0, 0.0),
        Vec3::new(2.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
    );
    assert!(solve_ldlt(a, Vec3::ONE).is_none());
}

// ─── SVD Tests ────────────────────────────────────────────────

#[test]
fn svd_identity() {
    let s = svd2(Mat2::IDENTITY);
    assert!((s.sigma.x - 1.0).abs() < 1e-6);
    assert!((s.sigma.y - 1.0).abs() < 1e-6);
}

#[test]
fn svd_reconstructs_rotation() {
    let f = Mat2::from_angle(0.7);
    let s = svd2(f);
    let r = s.reconstruct();
    assert!((r.x_axis - f.x_axis).length() < 1e-5);
    assert!((r.y_axis - f.y_axis).length() < 1e-5);
}

#[test]
fn svd_reconstructs_general() {
    let f = Mat2::from_angle(0.3) * Mat2::from_diagonal(Vec2::new(2.0, 0.5));
    let s = svd2(f);
    let r = s.reconstruct();
    assert!((r.x_axis - f.x_axis).length() < 1e-4);
    assert!((r.y_axis - f.y_axis).length() < 1e-4);
    assert!(s.sigma.x >= s.sigma.y.abs());
}

#[test]
fn svd_factors_are_rotations() {
    let f = Mat2::from_cols(Vec2::new(1.5, 0.4), Vec2::new(-0.2, 0.9));
    let s = svd2(f);
    assert!((s.u.determinant() - 1.0).abs() < 1e-5);
    assert!((s.v.determinant() - 1.0).abs() < 1e-5);
}

#[test]
fn svd_signs_inverted_element() {
    // det F < 0: the smaller singular value carries the sign, the
    // factors stay proper rotations.
    let f = Mat2::from_diagonal(Vec2::new(1.0, -1.0));
    let s = svd2(f);
    assert!(s.sigma.y < 0.0, "sigma = {:?}", s.sigma);
    assert!((s.u.determinant() - 1.0).abs() < 1e-5);
    assert!((s.v.determinant() - 1.0).abs() < 1e-5);
    let r = s.reconstruct();
    assert!((r.x_axis - f.x_axis).length() < 1e-5);
    assert!((r.y_axis - f.y_axis).length() < 1e-5);
}

// ─── Symmetric eigen Tests ────────────────────────────────────

#[test]
fn sym_eigen_diagonal() {
    let (e1, e2, v1, _v2) = sym_eigen2(3.0, 0.0, 1.0);
    assert!((e1 - 3.0).abs() < 1e-6);
    assert!((e2 - 1.0).abs() < 1e-6);
    assert!((v1 - Vec2::X).length() < 1e-6);
}

#[test]
fn sym_eigen_reconstructs() {
    let (a, b, d) = (2.0, 0.7, 1.3);
    let (e1, e2, v1, v2) = sym_eigen2(a, b, d);
    // A = e1·v1v1ᵀ + e2·v2v2ᵀ
    let m = e1 * outer2(v1, v1) + e2 * outer2(v2, v2);
    assert!((m.x_axis.x - a).abs() < 1e-4);
    assert!((m.x_axis.y - b).abs() < 1e-4);
    assert!((m.y_axis.y - d).abs() < 1e-4);
}

// ─── Helper Tests ─────────────────────────────────────────────

#[test]
fn rotation_matches_angle() {
    let r = rotation(std::f32::consts::FRAC_PI_2);
    let v = r * Vec2::X;
    assert!((v - Vec2::Y).length() < 1e-6);
}

#[test]
fn perp_is_ccw() {
    assert!((perp(Vec2::X) - Vec2::Y).length() < 1e-6);
    assert_eq!(cross2(Vec2::X, Vec2::Y), 1.0);
}

#[test]
fn outer3_entries() {
    let m = outer3(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
    // column j = a * b[j]
    assert_eq!(m.x_axis, Vec3::new(4.0, 8.0, 12.0));
    assert_eq!(m.z_axis, Vec3::new(6.0, 12.0, 18.0));
}

#[test]
fn cofactor_is_determinant_gradient() {
    let f = Mat2::from_cols(Vec2::new(2.0, 0.3), Vec2::new(-0.1, 1.5));
    let c = cofactor2(f);
    // <cof(F), F> = 2·det F in 2D.
    let inner = c.x_axis.dot(f.x_axis) + c.y_axis.dot(f.y_axis);
    assert!((inner - 2.0 * f.determinant()).abs() < 1e-5);
}
