//! Simulation event types.
//!
//! Lightweight value types emitted by the solver at fixed points in
//! each step. They carry just enough data for monitoring and
//! debugging; none of them affect the simulation.

use marrow_types::Scalar;
use serde::{Deserialize, Serialize};

/// How urgent an event is. Sinks subscribe at a minimum severity, so
/// per-step chatter never reaches a consumer that only wants fractures
/// and faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Per-step bookkeeping: timing, energy, contact counts.
    Trace,
    /// Noteworthy but expected: custom instrumentation.
    Info,
    /// Degraded but still running: fractures, timestep drift.
    Warning,
    /// The solver latched its urgent stop.
    Fault,
}

/// An event emitted by the solver, tagged with the step it occurred in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Step number (0-indexed).
    pub step: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventKind {
    /// A step started.
    StepBegin,

    /// A step completed.
    StepEnd {
        /// Wall-clock time for the step (seconds).
        wall_time: f64,
    },

    /// Broadphase and manifold initialization completed.
    ContactDetection {
        /// Live manifolds after initialization.
        manifolds: u32,
        /// Total contact points across manifolds.
        contacts: u32,
    },

    /// A constraint crossed its fracture threshold and was disabled.
    Fracture {
        /// Slot index of the fractured force.
        force: u32,
        /// The dual magnitude that crossed the threshold.
        lambda: Scalar,
    },

    /// The solver latched its urgent-stop flag.
    UrgentStop {
        /// Human-readable cause (non-SPD pivot, NaN gradient, cap).
        reason: String,
    },

    /// The supplied dt drifted from the configured timestep.
    DtDrift {
        supplied: Scalar,
        configured: Scalar,
    },

    /// Energy snapshot at the end of a step.
    Energy {
        kinetic: f64,
        elastic: f64,
    },

    /// Custom event for extensibility.
    Custom {
        label: String,
        payload: String,
    },
}

impl EventKind {
    /// The inherent severity of this event kind.
    pub fn severity(&self) -> Severity {
        match self {
            EventKind::StepBegin
            | EventKind::StepEnd { .. }
            | EventKind::ContactDetection { .. }
            | EventKind::Energy { .. } => Severity::Trace,
            EventKind::Custom { .. } => Severity::Info,
            EventKind::Fracture { .. } | EventKind::DtDrift { .. } => Severity::Warning,
            EventKind::UrgentStop { .. } => Severity::Fault,
        }
    }
}

impl SimulationEvent {
    /// Creates a new event for the given step.
    pub fn new(step: u64, kind: EventKind) -> Self {
        Self { step, kind }
    }

    /// The severity of the payload.
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}
