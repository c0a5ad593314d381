//! SPD projection of Hessian eigenvalues.

use marrow_types::constants::EIGEN_FLOOR;
use marrow_types::Scalar;
use serde::{Deserialize, Serialize};

/// How Hessian eigenvalues are made positive before reassembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    /// max(λ, ε): discard negative curvature.
    Clamp,
    /// |λ| floored at ε: keep magnitude, flip sign.
    Absolute,
    /// Choose per step from the trust-region ratio ρ: use Absolute
    /// while |ρ − 1| > 0.01, Clamp once the model predicts well.
    Adaptive,
}

impl ProjectionMode {
    /// Projects one eigenvalue.
    #[inline]
    pub fn project(self, eigenvalue: Scalar, trust_ratio: Scalar) -> Scalar {
        match self {
            ProjectionMode::Clamp => eigenvalue.max(EIGEN_FLOOR),
            ProjectionMode::Absolute => eigenvalue.abs().max(EIGEN_FLOOR),
            ProjectionMode::Adaptive => {
                if (trust_ratio - 1.0).abs() > 0.01 {
                    eigenvalue.abs().max(EIGEN_FLOOR)
                } else {
                    eigenvalue.max(EIGEN_FLOOR)
                }
            }
        }
    }
}
