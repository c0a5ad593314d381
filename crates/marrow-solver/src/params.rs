//! Solver parameters.

use glam::Vec2;
use marrow_energy::ProjectionMode;
use marrow_types::constants::{
    DEFAULT_ALPHA, DEFAULT_BETA, DEFAULT_BETA_ENERGY, DEFAULT_DT, DEFAULT_GAMMA,
    DEFAULT_ITERATIONS, GRAVITY,
};
use marrow_types::Scalar;
use serde::{Deserialize, Serialize};

/// Tunable parameters of the AVBD solver. All take effect on the next
/// step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverParams {
    /// Fixed timestep (seconds).
    pub dt: Scalar,
    /// Gravity vector.
    pub gravity: Vec2,
    /// Primal-dual iterations per step (≥ 1).
    pub iterations: u32,
    /// Position stabilization factor α ∈ [0, 1].
    pub alpha: Scalar,
    /// Penalty growth rate β.
    pub beta: Scalar,
    /// Warm-start decay γ ∈ [0, 1].
    pub gamma: Scalar,
    /// Stiffness ramp rate for FEM energies.
    pub beta_energy: Scalar,
    /// Scale energy terms by the ramp fraction kₑff / k*.
    pub use_energy_ramp: bool,
    /// Run one extra iteration at α = 0 after velocity extraction.
    pub post_stabilization: bool,
    /// SPD projection mode for energy Hessians.
    pub projection_mode: ProjectionMode,
    /// Optional step cap that trips the urgent stop; `None` disables it.
    pub step_limit: Option<u64>,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            gravity: Vec2::new(0.0, -GRAVITY),
            iterations: DEFAULT_ITERATIONS,
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            gamma: DEFAULT_GAMMA,
            beta_energy: DEFAULT_BETA_ENERGY,
            use_energy_ramp: true,
            post_stabilization: false,
            projection_mode: ProjectionMode::Clamp,
            step_limit: None,
        }
    }
}
