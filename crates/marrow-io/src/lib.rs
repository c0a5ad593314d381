//! # marrow-io
//!
//! The scene description contract: serializable scene files, input
//! validation, and the deterministic fixture builders (cloth grid, hex
//! soft body, cantilever beam).
//!
//! Scenes validate before any world mutation, so a bad description
//! never produces a half-populated world.

pub mod contract;
pub mod fixtures;
pub mod loader;
pub mod validator;

pub use contract::{BodyDesc, Fixture, JointDesc, SceneDescription, SpringDesc};
pub use loader::{load_scene, load_scene_file};
pub use validator::validate;
