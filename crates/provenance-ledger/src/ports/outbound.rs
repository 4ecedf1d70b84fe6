//! # Driven Ports (SPI - Outbound)
//!
//! What the ledger needs from its host:
//! - the current roles and pause flag
//! - somewhere to publish committed events

use crate::domain::guard::GovernanceContext;
use crate::events::LedgerEventEnvelope;

/// Source of the externally administered roles and pause flag.
///
/// Read once per operation; the snapshot is passed to the engine.
pub trait GovernanceSource: Send + Sync {
    /// Current roles and pause flag.
    fn governance(&self) -> GovernanceContext;
}

/// Receiver of committed ledger events.
///
/// Publishing happens after the commit and cannot undo it. It runs while the
/// ledger write lock is held, so implementations must not call back into the
/// service.
pub trait EventSink: Send + Sync {
    /// Deliver one event.
    fn publish(&self, envelope: LedgerEventEnvelope);
}
