//! Scalar type alias for the simulation.
//!
//! `f32` matches the glam single-precision types used throughout the
//! engine. The determinism guarantees (bit-for-bit replay on IEEE-754
//! hardware) hold for any fixed width; this alias makes it easy to
//! experiment with `f64` if a use case calls for it.

/// The floating-point type used throughout the simulation.
pub type Scalar = f32;
