//! Error types for the marrow engine.
//!
//! All crates return `MarrowResult<T>` from fallible setup operations.
//! The step loop itself never returns errors — in-step failures latch
//! the solver's urgent-stop flag instead (see the solver crate).

use thiserror::Error;

/// Unified error type for the marrow engine.
#[derive(Debug, Error)]
pub enum MarrowError {
    /// Scene description is malformed or internally inconsistent.
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    /// Body parameters are out of valid range.
    #[error("Invalid body: {0}")]
    InvalidBody(String),

    /// Constraint references missing bodies or has bad parameters.
    #[error("Invalid constraint: {0}")]
    InvalidConstraint(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The solver latched its urgent-stop flag and refuses to step.
    #[error("Solver halted: {0}")]
    SolverHalted(String),

    /// A simulation invariant was violated.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Convenience alias for `Result<T, MarrowError>`.
pub type MarrowResult<T> = Result<T, MarrowError>;
