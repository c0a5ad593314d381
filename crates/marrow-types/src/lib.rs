//! # marrow-types
//!
//! Shared types, identifiers, error types, and physical constants
//! for the marrow 2D physics engine.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other marrow crates share.

pub mod constants;
pub mod error;
pub mod ids;
pub mod scalar;

pub use error::{MarrowError, MarrowResult};
pub use ids::{BodyId, EnergyId, ForceId};
pub use scalar::Scalar;
