//! Per-row constraint bookkeeping.
//!
//! One row is one scalar relation C(q) = 0 contributing to the
//! augmented Lagrangian. A force owns up to [`MAX_ROWS`] rows laid out
//! contiguously; a manifold's two contacts occupy rows 2i and 2i+1.

use glam::{Mat3, Vec3};
use marrow_types::constants::PENALTY_MIN;
use marrow_types::Scalar;

/// Maximum rows per force (a manifold with two contacts).
pub const MAX_ROWS: usize = 4;

/// State of one constraint row.
///
/// `j` and `h` are scratch: `compute_derivatives(body)` fills them for
/// the queried body only, and the solver consumes them before the next
/// query.
#[derive(Debug, Clone, Copy)]
pub struct Row {
    /// Current constraint value C.
    pub c: Scalar,
    /// Jacobian for the last queried body.
    pub j: Vec3,
    /// Hessian for the last queried body.
    pub h: Mat3,
    /// Material stiffness k; infinite means a hard constraint driven
    /// through the dual, zero means the row is inert.
    pub stiffness: Scalar,
    /// Penalty κ, grown monotonically within a step and decayed across
    /// steps. Kept in [PENALTY_MIN, min(PENALTY_MAX, k)].
    pub penalty: Scalar,
    /// Dual multiplier λ.
    pub lambda: Scalar,
    /// Lower force bound.
    pub fmin: Scalar,
    /// Upper force bound.
    pub fmax: Scalar,
    /// Fracture threshold: |λ| at or beyond this disables the force.
    pub fracture: Scalar,
}

impl Default for Row {
    fn default() -> Self {
        Self {
            c: 0.0,
            j: Vec3::ZERO,
            h: Mat3::ZERO,
            stiffness: Scalar::INFINITY,
            penalty: PENALTY_MIN,
            lambda: 0.0,
            fmin: Scalar::NEG_INFINITY,
            fmax: Scalar::INFINITY,
            fracture: Scalar::INFINITY,
        }
    }
}

impl Row {
    /// The clamped row force: λ + κ·C for hard rows, κ·C for soft ones,
    /// bounded into [fmin, fmax].
    #[inline]
    pub fn clamped_force(&self) -> Scalar {
        let lambda = if self.stiffness.is_infinite() {
            self.lambda
        } else {
            0.0
        };
        (self.penalty * self.c + lambda).clamp(self.fmin, self.fmax)
    }

    /// True when the row participates in the solve.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.stiffness > 0.0
    }
}

/// Fixed-capacity row storage shared by all forces.
#[derive(Debug, Clone)]
pub struct RowSet {
    rows: [Row; MAX_ROWS],
    len: usize,
    enabled: bool,
}

impl RowSet {
    /// Creates a set with `len` default rows.
    pub fn new(len: usize) -> Self {
        debug_assert!(len <= MAX_ROWS);
        Self {
            rows: [Row::default(); MAX_ROWS],
            len,
            enabled: true,
        }
    }

    /// Number of live rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the set holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Resizes the live-row count (manifolds shrink and grow).
    pub fn set_len(&mut self, len: usize) {
        debug_assert!(len <= MAX_ROWS);
        self.len = len;
    }

    /// Live rows.
    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows[..self.len]
    }

    /// Live rows, mutable.
    #[inline]
    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows[..self.len]
    }

    /// True until `disable` latches the set off.
    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Zeroes stiffness, penalty and dual on every row and latches the
    /// set disabled. A disabled force persists in the world but
    /// contributes nothing.
    pub fn disable(&mut self) {
        for row in &mut self.rows[..self.len] {
            row.stiffness = 0.0;
            row.penalty = 0.0;
            row.lambda = 0.0;
        }
        self.enabled = false;
    }
}
