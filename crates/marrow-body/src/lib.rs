//! # marrow-body
//!
//! Rigid body state and the slot arena that owns it.
//!
//! A body is either an oriented rectangle (w, h > 0) or a point
//! particle (w = h = 0). Generalized coordinates are the 3-vector
//! (x, y, θ); mass and moment follow from density and size, except
//! for particles which take an explicit mass.

pub mod body;
pub mod set;

pub use body::Body;
pub use set::BodySet;
