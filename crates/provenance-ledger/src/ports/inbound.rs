//! # Driving Port (API - Inbound)
//!
//! The operations a host exposes to its callers.

use crate::domain::entities::{Batch, BatchDraft, BatchStatus, CallContext, HistoryEntry};
use crate::domain::value_objects::{Address, BatchId};
use crate::errors::LedgerResult;

/// Primary API of the provenance ledger.
///
/// Mutating operations are atomic: they either commit every record and
/// history change, or return an error and change nothing.
pub trait ProvenanceApi: Send + Sync {
    // === Lifecycle ===

    /// Register a batch owned by the administrator. Returns its id.
    fn register_batch(&self, ctx: CallContext, draft: BatchDraft) -> LedgerResult<BatchId>;

    /// Transfer a batch to `new_owner`.
    fn transfer_ownership(
        &self,
        ctx: CallContext,
        batch_id: BatchId,
        new_owner: Address,
    ) -> LedgerResult<()>;

    /// Split `split_quantity` units into a new batch. Returns the new id.
    fn split_batch(
        &self,
        ctx: CallContext,
        batch_id: BatchId,
        split_quantity: u64,
    ) -> LedgerResult<BatchId>;

    /// Absorb `absorbed` into `target`.
    fn merge_batches(
        &self,
        ctx: CallContext,
        target: BatchId,
        absorbed: BatchId,
    ) -> LedgerResult<()>;

    /// Set compliance status, optionally attaching a certification.
    fn verify_compliance(
        &self,
        ctx: CallContext,
        batch_id: BatchId,
        new_status: BatchStatus,
        additional_certification: Option<String>,
    ) -> LedgerResult<()>;

    // === Reads ===

    /// The batch, or None if it never existed or was merged away.
    fn get_batch_details(&self, batch_id: BatchId) -> Option<Batch>;

    /// The full history of a batch, oldest first.
    fn get_batch_history(&self, batch_id: BatchId) -> Vec<HistoryEntry>;

    /// The id the next registration or split will receive.
    fn get_next_batch_id(&self) -> BatchId;
}
