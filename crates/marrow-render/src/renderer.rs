//! Renderer trait and frame snapshots.

use marrow_solver::World;
use marrow_types::{MarrowResult, Scalar};
use serde::{Deserialize, Serialize};

/// One rectangle instance for the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyInstance {
    pub position: [Scalar; 2],
    pub rotation: Scalar,
    pub size: [Scalar; 2],
    pub color: u32,
}

/// One tagged line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineInstance {
    pub a: [Scalar; 2],
    pub b: [Scalar; 2],
    pub thickness: Scalar,
}

/// A complete frame snapshot, safe to read between steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Step this frame corresponds to.
    pub step: u64,
    pub bodies: Vec<BodyInstance>,
    pub contacts: Vec<[Scalar; 2]>,
    pub lines: Vec<LineInstance>,
}

impl RenderFrame {
    /// Snapshots the world's observable render state.
    pub fn capture(world: &World) -> Self {
        let bodies = world
            .bodies()
            .iter()
            .map(|(_, b)| BodyInstance {
                position: [b.pose.x, b.pose.y],
                rotation: b.pose.z,
                size: [b.size.x, b.size.y],
                color: b.color,
            })
            .collect();

        let contacts = world
            .contacts_to_render()
            .iter()
            .map(|p| [p.x, p.y])
            .collect();

        let lines = world
            .contact_lines_to_render()
            .iter()
            .map(|l| LineInstance {
                a: [l.a.x, l.a.y],
                b: [l.b.x, l.b.y],
                thickness: l.thickness,
            })
            .collect();

        Self {
            step: world.step_count(),
            bodies,
            contacts,
            lines,
        }
    }
}

/// Trait for rendering simulation output.
///
/// # Implementations
/// - [`HeadlessRenderer`] — discards frames (benchmarks, CI)
/// - [`crate::JsonFrameExporter`] — buffers frames, writes JSON on
///   finalize
pub trait Renderer: Send {
    /// Submits a frame.
    fn submit_frame(&mut self, frame: &RenderFrame) -> MarrowResult<()>;

    /// Finalizes rendering (flush buffers, close files).
    fn finalize(&mut self) -> MarrowResult<()>;

    /// Renderer name.
    fn name(&self) -> &str;

    /// Number of frames submitted so far.
    fn frame_count(&self) -> u32;
}

/// Headless renderer — counts and discards frames.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    frames: u32,
}

impl HeadlessRenderer {
    /// Creates a new headless renderer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for HeadlessRenderer {
    fn submit_frame(&mut self, _frame: &RenderFrame) -> MarrowResult<()> {
        self.frames += 1;
        Ok(())
    }

    fn finalize(&mut self) -> MarrowResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "headless"
    }

    fn frame_count(&self) -> u32 {
        self.frames
    }
}
