//! # marrow-telemetry
//!
//! Telemetry for the solver: structured events (step timing, contacts,
//! fractures, urgent stops) buffered during each synchronous step and
//! delivered to severity-filtered sinks between steps. The step loop
//! itself never logs or prints.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, Severity, SimulationEvent};
pub use sinks::{EventSink, TracingSink, VecSink};
