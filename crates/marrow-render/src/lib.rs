//! # marrow-render
//!
//! The read-only rendering feed: per-step frame snapshots of body
//! poses, contact points, and constraint lines, plus exporters. The
//! core engine knows nothing about colors beyond the pass-through tag
//! and the line-thickness convention (≥ 0.5 strong, 0.4..0.5 medium,
//! below weak).

pub mod json_exporter;
pub mod renderer;

pub use json_exporter::JsonFrameExporter;
pub use renderer::{BodyInstance, HeadlessRenderer, LineInstance, RenderFrame, Renderer};
