//! # Adapters Layer (Outer Hexagon)
//!
//! In-memory implementations of the outbound ports. Hosts embedding the
//! ledger provide their own; these back the tests and simple deployments.

pub mod event_sink;
pub mod governance;

pub use event_sink::{InMemoryEventSink, NoopEventSink, TracingEventSink};
pub use governance::InMemoryGovernance;
