//! Physical constants and solver defaults.

use crate::scalar::Scalar;

/// Gravitational acceleration magnitude (m/s²).
pub const GRAVITY: Scalar = 9.81;

/// Default simulation timestep (seconds). 1/60th of a second.
pub const DEFAULT_DT: Scalar = 1.0 / 60.0;

/// Default number of primal-dual iterations per step.
pub const DEFAULT_ITERATIONS: u32 = 10;

/// Default position-stabilization factor α. α = 1 enforces exact
/// alignment; α < 1 leaks a fraction of the initial error each step.
pub const DEFAULT_ALPHA: Scalar = 0.99;

/// Default penalty growth rate β.
pub const DEFAULT_BETA: Scalar = 1.0e5;

/// Default warm-start decay γ applied to duals and penalties.
pub const DEFAULT_GAMMA: Scalar = 0.99;

/// Default stiffness ramp rate for FEM energies.
pub const DEFAULT_BETA_ENERGY: Scalar = 10.0;

/// Lower bound for constraint penalty parameters.
pub const PENALTY_MIN: Scalar = 1.0;

/// Upper bound for constraint penalty parameters.
pub const PENALTY_MAX: Scalar = 1.0e9;

/// Stiffness used for "hard" distance constraints specified with
/// zero compliance.
pub const NEAR_HARD_STIFFNESS: Scalar = 1.0e12;

/// Linear stiffness of the pointer drag joint.
pub const DRAG_STIFFNESS: Scalar = 1.0e4;

/// Contact margin added to the normal gap so resting contacts keep a
/// slightly positive target separation.
pub const COLLISION_MARGIN: Scalar = 5.0e-4;

/// Tangential drift below which a friction row is considered sticking.
pub const STICK_THRESHOLD: Scalar = 0.01;

/// Rotational velocity is clamped to this magnitude before inertial
/// prediction.
pub const ROTATION_VELOCITY_LIMIT: Scalar = 50.0;

/// Gravity magnitudes below this are replaced by (0, GRAVITY_EPSILON)
/// so the adaptive warm-start weight stays well-defined.
pub const GRAVITY_EPSILON: Scalar = 1.0e-6;

/// Floor for the effective stiffness of a ramped FEM energy.
pub const ENERGY_STIFFNESS_FLOOR: Scalar = 1.0;

/// Floor applied to projected Hessian eigenvalues.
pub const EIGEN_FLOOR: Scalar = 1.0e-6;

/// A triangle element with det F at or below this threshold is treated
/// as inverted and handled by the inversion penalty.
pub const INVERSION_EPSILON: Scalar = 0.1;

/// The inversion penalty coefficient is this multiple of the element's
/// leading Lamé coefficient.
pub const INVERSION_PENALTY_SCALE: Scalar = 3.0;

/// Supplied timesteps drifting from the configured dt by more than
/// this are reported (the step still proceeds).
pub const DT_DRIFT_TOLERANCE: Scalar = 0.01;

/// Maximum catch-up physics substeps per animation frame.
pub const MAX_SUBSTEPS: u32 = 5;

/// Horizontal half-extent of the reference world limit box.
pub const WORLD_HALF_WIDTH: Scalar = 400.0;

/// Vertical half-extent of the reference world limit box.
pub const WORLD_HALF_HEIGHT: Scalar = 300.0;

/// Epsilon for floating-point comparisons.
pub const EPSILON: Scalar = 1.0e-7;

/// Length below which spring/distance directions are degenerate and
/// the row goes quiescent.
pub const DEGENERATE_LENGTH: Scalar = 1.0e-9;
