//! # marrow-contact
//!
//! Box-box collision detection and the persistent contact manifold.
//!
//! The narrow phase is the classic oriented-rectangle pipeline:
//! separating-axis test with a face-switch bias, incident-edge
//! selection, and two-pass Sutherland-Hodgman clipping. Each surviving
//! contact carries a packed feature id so the manifold can warm-start
//! penalties and duals across steps.
//!
//! The broad phase is a bounding-circle prune; the world only admits
//! pairs that overlap and are not already constrained.

pub mod broad;
pub mod feature;
pub mod manifold;
pub mod sat;

pub use broad::circles_overlap;
pub use feature::FeatureId;
pub use manifold::Manifold;
pub use sat::{collide, RawContact};
