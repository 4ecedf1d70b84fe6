//! # Ledger State
//!
//! The batch store and the history log, committed together.
//!
//! ## Atomic Commits
//!
//! [`LedgerState::commit`] pre-flights the entire changeset before touching
//! either component: allocation order, record existence, quantity and owner
//! validity, certification capacity, history targets and history capacity.
//! Only when every check passes are the writes applied.
//!
//! History may only be appended to a live batch or one created by the same
//! changeset, so every trail starts with the entry of the operation that
//! created its batch.
//!
//! The history capacity is stored once, in the limits, and pushed into the
//! log on construction and on deserialize.

use crate::config::LedgerLimits;
use crate::domain::batch_store::BatchStore;
use crate::domain::changeset::Changeset;
use crate::domain::entities::{Batch, HistoryEntry};
use crate::domain::history::HistoryLog;
use crate::domain::value_objects::BatchId;
use crate::errors::{CapacityResource, LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Persistent state of the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredLedgerState")]
pub struct LedgerState {
    batches: BatchStore,
    history: HistoryLog,
    limits: LedgerLimits,
}

/// Serialized form of [`LedgerState`].
#[derive(Deserialize)]
struct StoredLedgerState {
    batches: BatchStore,
    history: HistoryLog,
    limits: LedgerLimits,
}

impl From<StoredLedgerState> for LedgerState {
    fn from(stored: StoredLedgerState) -> Self {
        Self {
            batches: stored.batches,
            history: stored.history.with_capacity(stored.limits.max_history_entries),
            limits: stored.limits,
        }
    }
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new(LedgerLimits::default())
    }
}

impl LedgerState {
    /// Create an empty ledger with the given limits.
    #[must_use]
    pub fn new(limits: LedgerLimits) -> Self {
        Self {
            batches: BatchStore::new(),
            history: HistoryLog::new(limits.max_history_entries),
            limits,
        }
    }

    /// The batch store.
    #[must_use]
    pub fn batches(&self) -> &BatchStore {
        &self.batches
    }

    /// The history log.
    #[must_use]
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Limits enforced by this ledger.
    #[must_use]
    pub fn limits(&self) -> &LedgerLimits {
        &self.limits
    }

    /// Look up a live batch.
    pub fn batch(&self, id: BatchId) -> LedgerResult<&Batch> {
        self.batches.get(id)
    }

    /// History of `id`, oldest first.
    #[must_use]
    pub fn history_of(&self, id: BatchId) -> &[HistoryEntry] {
        self.history.read_all(id)
    }

    /// Apply `changeset` entirely, or fail without changing anything.
    pub(crate) fn commit(&mut self, changeset: Changeset) -> LedgerResult<()> {
        self.preflight(&changeset)?;

        let Changeset {
            created,
            updated,
            removed,
            history,
        } = changeset;

        for batch in created {
            self.batches.insert_allocated(batch)?;
        }
        for batch in updated {
            self.batches.set(batch)?;
        }
        for id in removed {
            self.batches.delete(id)?;
        }
        for (id, entry) in history {
            self.history.append(id, entry)?;
        }
        Ok(())
    }

    fn preflight(&self, changeset: &Changeset) -> LedgerResult<()> {
        let mut expected = self.batches.next_id();
        for batch in &changeset.created {
            if batch.id < expected || self.batches.contains(batch.id) {
                return Err(LedgerError::BatchAlreadyExists(batch.id));
            }
            if batch.id > expected {
                return Err(LedgerError::InvalidBatchId(batch.id));
            }
            expected = expected
                .checked_next()
                .ok_or(LedgerError::CapacityExceeded {
                    resource: CapacityResource::BatchIds,
                    limit: usize::MAX,
                })?;
            self.check_record(batch)?;
        }

        let removed: BTreeSet<BatchId> = changeset.removed.iter().copied().collect();
        for id in &removed {
            self.batches.get(*id)?;
        }
        for batch in &changeset.updated {
            if removed.contains(&batch.id) {
                return Err(LedgerError::InvalidBatchId(batch.id));
            }
            self.batches.get(batch.id)?;
            self.check_record(batch)?;
        }

        let created: BTreeSet<BatchId> = changeset.created.iter().map(|b| b.id).collect();
        let mut appends: BTreeMap<BatchId, usize> = BTreeMap::new();
        for (id, _) in &changeset.history {
            if !self.batches.contains(*id) && !created.contains(id) {
                return Err(LedgerError::InvalidBatchId(*id));
            }
            *appends.entry(*id).or_default() += 1;
        }
        for (id, count) in appends {
            self.history.ensure_room(id, count)?;
        }
        Ok(())
    }

    fn check_record(&self, batch: &Batch) -> LedgerResult<()> {
        if batch.quantity == 0 {
            return Err(LedgerError::ZeroQuantity);
        }
        if batch.owner.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        if batch.certifications.len() > self.limits.max_certifications {
            return Err(LedgerError::CapacityExceeded {
                resource: CapacityResource::Certifications,
                limit: self.limits.max_certifications,
            });
        }
        Ok(())
    }
}
