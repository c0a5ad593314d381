//! JSON frame exporter — buffers frames and writes one document on
//! finalize, for offline inspection or an external viewer.

use serde::Serialize;

use marrow_types::{MarrowError, MarrowResult};

use crate::renderer::{RenderFrame, Renderer};

#[derive(Serialize)]
struct AnimationData<'a> {
    frames: &'a [RenderFrame],
}

/// Exports simulation frames to a JSON file.
pub struct JsonFrameExporter {
    output_path: String,
    frames: Vec<RenderFrame>,
}

impl JsonFrameExporter {
    /// Creates an exporter that writes to the given path on finalize.
    pub fn new(output_path: &str) -> Self {
        Self {
            output_path: output_path.to_string(),
            frames: Vec::new(),
        }
    }

    /// The buffered frames (for tests).
    pub fn frames(&self) -> &[RenderFrame] {
        &self.frames
    }
}

impl Renderer for JsonFrameExporter {
    fn submit_frame(&mut self, frame: &RenderFrame) -> MarrowResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finalize(&mut self) -> MarrowResult<()> {
        let data = AnimationData {
            frames: &self.frames,
        };
        let json = serde_json::to_string(&data)
            .map_err(|e| MarrowError::Serialization(format!("frame export failed: {e}")))?;
        std::fs::write(&self.output_path, json)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "json_exporter"
    }

    fn frame_count(&self) -> u32 {
        self.frames.len() as u32
    }
}
