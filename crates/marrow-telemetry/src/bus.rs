//! Step-scoped event buffer with severity-filtered dispatch.
//!
//! The solver is single-threaded and fully synchronous: nothing inside
//! `step` may observe a sink, and no other thread produces events. So
//! instead of a channel, events accumulate in a plain buffer during the
//! step and the driver hands them to sinks with `flush` between steps,
//! preserving emission order.
//!
//! Each subscription carries a minimum [`Severity`]; a sink registered
//! at `Severity::Warning` sees fractures, timestep drift and faults but
//! none of the per-step chatter. Emitting with no subscribers is free —
//! the event is discarded instead of buffered.

use crate::events::{Severity, SimulationEvent};
use crate::sinks::EventSink;

struct Subscription {
    threshold: Severity,
    sink: Box<dyn EventSink>,
}

/// Buffered, severity-filtered event dispatch for the solver.
pub struct EventBus {
    pending: Vec<SimulationEvent>,
    subscriptions: Vec<Subscription>,
    enabled: bool,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            subscriptions: Vec::new(),
            enabled: true,
        }
    }

    /// Registers a sink that receives every event.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.subscribe(Severity::Trace, sink);
    }

    /// Registers a sink that receives events at or above `threshold`.
    pub fn subscribe(&mut self, threshold: Severity, sink: Box<dyn EventSink>) {
        self.subscriptions.push(Subscription { threshold, sink });
    }

    /// Enables or disables the bus. A disabled bus discards events.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// True if the bus is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Buffers an event for the next flush. Discarded while disabled or
    /// while nothing is subscribed.
    pub fn emit(&mut self, event: SimulationEvent) {
        if !self.enabled || self.subscriptions.is_empty() {
            return;
        }
        self.pending.push(event);
    }

    /// Events buffered since the last flush.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Delivers buffered events, in emission order, to every
    /// subscription whose threshold admits them.
    pub fn flush(&mut self) {
        for event in self.pending.drain(..) {
            let severity = event.severity();
            for sub in &mut self.subscriptions {
                if severity >= sub.threshold {
                    sub.sink.handle(&event);
                }
            }
        }
    }

    /// Flushes remaining events and finalizes every sink. Call once at
    /// the end of a simulation so file-backed sinks can close cleanly.
    pub fn finalize(&mut self) {
        self.flush();
        for sub in &mut self.subscriptions {
            sub.sink.finalize();
        }
    }

    /// Number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
