//! # Changeset
//!
//! Every lifecycle operation is planned as one [`Changeset`] against an
//! immutable view of the ledger, then committed in a single step by
//! `LedgerState::commit`, which only the lifecycle engine calls.
//!
//! A split produces one created and one updated record plus two history
//! entries; a merge produces one updated and one removed record plus one
//! history entry. Either the whole changeset lands or none of it does.

use crate::domain::entities::{Batch, HistoryEntry};
use crate::domain::value_objects::BatchId;

/// Record writes and history appends that commit together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Changeset {
    /// New records, in allocation order.
    pub created: Vec<Batch>,
    /// Full replacements of existing records.
    pub updated: Vec<Batch>,
    /// Records deleted permanently.
    pub removed: Vec<BatchId>,
    /// History appends, in the order they are written.
    pub history: Vec<(BatchId, HistoryEntry)>,
}

impl Changeset {
    /// Create an empty changeset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new record.
    #[must_use]
    pub fn create(mut self, batch: Batch) -> Self {
        self.created.push(batch);
        self
    }

    /// Replace an existing record.
    #[must_use]
    pub fn update(mut self, batch: Batch) -> Self {
        self.updated.push(batch);
        self
    }

    /// Delete a record.
    #[must_use]
    pub fn remove(mut self, id: BatchId) -> Self {
        self.removed.push(id);
        self
    }

    /// Append a history entry for `id`.
    #[must_use]
    pub fn record(mut self, id: BatchId, entry: HistoryEntry) -> Self {
        self.history.push((id, entry));
        self
    }

    /// Returns true if committing would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
            && self.updated.is_empty()
            && self.removed.is_empty()
            && self.history.is_empty()
    }
}
