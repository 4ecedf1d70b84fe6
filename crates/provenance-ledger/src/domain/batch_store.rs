//! # Batch Store
//!
//! Owns every batch record and the identifier counter.
//!
//! Identifiers are handed out in strictly increasing order starting at
//! [`BatchId::FIRST`]. The counter only moves forward, so an id freed by a
//! merge is never handed out again.

use crate::config::LedgerLimits;
use crate::domain::entities::{Batch, BatchDraft};
use crate::domain::value_objects::{Address, BatchId};
use crate::errors::{CapacityResource, LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from batch id to batch record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStore {
    records: BTreeMap<BatchId, Batch>,
    next_id: BatchId,
}

impl Default for BatchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            next_id: BatchId::FIRST,
        }
    }

    /// The id the next registration will receive.
    #[must_use]
    pub fn next_id(&self) -> BatchId {
        self.next_id
    }

    /// Number of live batches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no batch is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true if `id` names a live batch.
    #[must_use]
    pub fn contains(&self, id: BatchId) -> bool {
        self.records.contains_key(&id)
    }

    /// Live batches in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Batch> {
        self.records.values()
    }

    /// Look up a batch.
    pub fn get(&self, id: BatchId) -> LedgerResult<&Batch> {
        self.records.get(&id).ok_or(LedgerError::InvalidBatchId(id))
    }

    /// Validate `draft`, store it as a `Pending` batch owned by `owner`, and
    /// return its id.
    pub fn register(
        &mut self,
        owner: Address,
        draft: BatchDraft,
        limits: &LedgerLimits,
    ) -> LedgerResult<BatchId> {
        draft.validate(limits)?;
        let id = self.next_id;
        self.insert_allocated(Batch::registered(id, owner, draft))?;
        Ok(id)
    }

    /// Check that `id` can be allocated right now.
    ///
    /// Only the current counter value is allocatable. A lower id was consumed
    /// earlier and counts as a collision even if its batch is gone.
    pub fn ensure_allocatable(&self, id: BatchId) -> LedgerResult<()> {
        if id < self.next_id || self.records.contains_key(&id) {
            return Err(LedgerError::BatchAlreadyExists(id));
        }
        if id > self.next_id {
            return Err(LedgerError::InvalidBatchId(id));
        }
        if self.next_id.checked_next().is_none() {
            return Err(LedgerError::CapacityExceeded {
                resource: CapacityResource::BatchIds,
                limit: usize::MAX,
            });
        }
        Ok(())
    }

    /// Store a new record under the next id and advance the counter.
    pub fn insert_allocated(&mut self, batch: Batch) -> LedgerResult<()> {
        self.ensure_allocatable(batch.id)?;
        let next = batch
            .id
            .checked_next()
            .ok_or(LedgerError::CapacityExceeded {
                resource: CapacityResource::BatchIds,
                limit: usize::MAX,
            })?;
        self.records.insert(batch.id, batch);
        self.next_id = next;
        Ok(())
    }

    /// Replace an existing record.
    pub fn set(&mut self, batch: Batch) -> LedgerResult<()> {
        match self.records.get_mut(&batch.id) {
            Some(slot) => {
                *slot = batch;
                Ok(())
            }
            None => Err(LedgerError::InvalidBatchId(batch.id)),
        }
    }

    /// Permanently remove a record. The id stays consumed.
    pub fn delete(&mut self, id: BatchId) -> LedgerResult<Batch> {
        self.records
            .remove(&id)
            .ok_or(LedgerError::InvalidBatchId(id))
    }
}
