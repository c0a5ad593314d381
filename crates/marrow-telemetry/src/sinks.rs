//! Pluggable event sinks.

use crate::events::{Severity, SimulationEvent};

/// Trait for event consumers.
pub trait EventSink: Send {
    /// Processes a single event.
    fn handle(&mut self, event: &SimulationEvent);

    /// Called when the simulation ends. Flush buffers, close files.
    fn finalize(&mut self) {}

    /// Human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Collects events into a `Vec` for tests and inspection.
pub struct VecSink {
    /// Collected events.
    pub events: Vec<SimulationEvent>,
}

impl VecSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl Default for VecSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SimulationEvent) {
        self.events.push(event.clone());
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// Logs events through the `tracing` crate at the level matching each
/// event's severity: faults as errors, fractures and drift as
/// warnings, custom instrumentation as info, step chatter as trace.
///
/// Coarse filtering belongs on the bus subscription threshold; this
/// sink only translates severity to the tracing level so downstream
/// `tracing` filters compose as expected.
pub struct TracingSink;

impl TracingSink {
    /// Creates a tracing sink.
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimulationEvent) {
        match event.severity() {
            Severity::Fault => {
                tracing::error!(step = event.step, event = ?event.kind, "solver fault");
            }
            Severity::Warning => {
                tracing::warn!(step = event.step, event = ?event.kind, "solver warning");
            }
            Severity::Info => {
                tracing::info!(step = event.step, event = ?event.kind, "solver event");
            }
            Severity::Trace => {
                tracing::trace!(step = event.step, event = ?event.kind, "solver step");
            }
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
