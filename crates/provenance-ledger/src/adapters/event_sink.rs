//! # Event Sink Adapters
//!
//! Destinations for committed ledger events.

use crate::events::LedgerEventEnvelope;
use crate::ports::outbound::EventSink;
use parking_lot::Mutex;
use tracing::info;

/// Records every envelope in memory.
#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    published: Mutex<Vec<LedgerEventEnvelope>>,
}

impl InMemoryEventSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything published so far, in order.
    #[must_use]
    pub fn published(&self) -> Vec<LedgerEventEnvelope> {
        self.published.lock().clone()
    }

    /// Number of envelopes published so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.published.lock().len()
    }

    /// Returns true if nothing was published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.published.lock().is_empty()
    }

    /// Remove and return everything published so far.
    pub fn drain(&self) -> Vec<LedgerEventEnvelope> {
        std::mem::take(&mut *self.published.lock())
    }
}

impl EventSink for InMemoryEventSink {
    fn publish(&self, envelope: LedgerEventEnvelope) {
        self.published.lock().push(envelope);
    }
}

/// Logs every envelope as a structured record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, envelope: LedgerEventEnvelope) {
        info!(
            event_id = %envelope.event_id,
            topic = envelope.event.topic(),
            batch_id = %envelope.event.batch_id(),
            block_height = envelope.block_height,
            "Ledger event"
        );
    }
}

/// Discards every envelope.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn publish(&self, _envelope: LedgerEventEnvelope) {}
}
