//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions between the lifecycle domain and its host.
//!
//! - **Driving Port (Inbound)**: `ProvenanceApi`
//! - **Driven Ports (Outbound)**: `GovernanceSource`, `EventSink`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
