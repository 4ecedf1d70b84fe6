//! # History Log
//!
//! Append-only audit trail, one ordered sequence per batch.
//!
//! Entries are never edited or removed. A sequence that reaches its capacity
//! rejects further appends with `CapacityExceeded`; nothing is dropped.
//!
//! The capacity is not serialized. The owning `LedgerState` restores it from
//! its limits on deserialize.

use crate::domain::entities::HistoryEntry;
use crate::domain::value_objects::BatchId;
use crate::errors::{CapacityResource, LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-batch audit sequences.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLog {
    entries: BTreeMap<BatchId, Vec<HistoryEntry>>,
    #[serde(skip)]
    capacity: usize,
}

impl HistoryLog {
    /// Create an empty log holding at most `capacity` entries per batch.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity,
        }
    }

    /// Same entries under a different per-batch capacity.
    #[must_use]
    pub(crate) fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Entries allowed per batch.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries recorded for `id`.
    #[must_use]
    pub fn len(&self, id: BatchId) -> usize {
        self.entries.get(&id).map_or(0, Vec::len)
    }

    /// Appends still possible for `id`.
    #[must_use]
    pub fn remaining_capacity(&self, id: BatchId) -> usize {
        self.capacity.saturating_sub(self.len(id))
    }

    /// Fail with `CapacityExceeded` unless `additional` entries fit for `id`.
    pub fn ensure_room(&self, id: BatchId, additional: usize) -> LedgerResult<()> {
        if additional > self.remaining_capacity(id) {
            return Err(LedgerError::CapacityExceeded {
                resource: CapacityResource::History,
                limit: self.capacity,
            });
        }
        Ok(())
    }

    /// Append `entry` to the end of the sequence for `id`.
    pub fn append(&mut self, id: BatchId, entry: HistoryEntry) -> LedgerResult<()> {
        self.ensure_room(id, 1)?;
        self.entries.entry(id).or_default().push(entry);
        Ok(())
    }

    /// Every entry recorded for `id`, oldest first. Empty for unknown ids.
    #[must_use]
    pub fn read_all(&self, id: BatchId) -> &[HistoryEntry] {
        self.entries.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ids that have at least one entry.
    pub fn batch_ids(&self) -> impl Iterator<Item = BatchId> + '_ {
        self.entries.keys().copied()
    }
}
