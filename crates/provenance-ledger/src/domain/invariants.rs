//! # Domain Invariants
//!
//! Whole-ledger checks that MUST hold after every committed operation.
//!
//! - Every live batch holds a positive quantity
//! - Ids are below the allocation counter (never reused)
//! - Every live batch has a valid owner
//! - Certifications and history stay within capacity
//! - Every live batch has at least one history entry
//! - Every trail opens with `Registered` or `CreatedFromSplit`
//!
//! Quantity conservation for split and merge is a property of a single
//! operation, not of a snapshot; it is checked by the engine tests.

use crate::domain::entities::HistoryAction;
use crate::domain::state::LedgerState;
use crate::domain::value_objects::BatchId;

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A batch holds zero units.
    ZeroQuantity { batch_id: BatchId },
    /// A batch id at or above the allocation counter.
    IdNotAllocated { batch_id: BatchId, next_id: BatchId },
    /// A batch owned by the zero address.
    ZeroOwner { batch_id: BatchId },
    /// Too many certifications.
    CertificationsOverCapacity { batch_id: BatchId, count: usize },
    /// Too many history entries.
    HistoryOverCapacity { batch_id: BatchId, count: usize },
    /// A live batch without any history.
    MissingHistory { batch_id: BatchId },
    /// A trail whose first entry is not the one that created its batch.
    ForeignFirstEntry {
        batch_id: BatchId,
        action: HistoryAction,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroQuantity { batch_id } => write!(f, "batch {batch_id} holds zero units"),
            Self::IdNotAllocated { batch_id, next_id } => {
                write!(f, "batch {batch_id} is not below allocation counter {next_id}")
            }
            Self::ZeroOwner { batch_id } => write!(f, "batch {batch_id} has the zero owner"),
            Self::CertificationsOverCapacity { batch_id, count } => {
                write!(f, "batch {batch_id} carries {count} certifications")
            }
            Self::HistoryOverCapacity { batch_id, count } => {
                write!(f, "batch {batch_id} has {count} history entries")
            }
            Self::MissingHistory { batch_id } => write!(f, "batch {batch_id} has no history"),
            Self::ForeignFirstEntry { batch_id, action } => {
                write!(f, "history of batch {batch_id} opens with {action}")
            }
        }
    }
}

/// Check all invariants at once.
#[must_use]
pub fn check_all_invariants(state: &LedgerState) -> InvariantCheckResult {
    let mut violations = Vec::new();
    let limits = state.limits();
    let next_id = state.batches().next_id();

    for batch in state.batches().iter() {
        let batch_id = batch.id;
        if batch.quantity == 0 {
            violations.push(InvariantViolation::ZeroQuantity { batch_id });
        }
        if batch_id >= next_id || batch_id < BatchId::FIRST {
            violations.push(InvariantViolation::IdNotAllocated { batch_id, next_id });
        }
        if batch.owner.is_zero() {
            violations.push(InvariantViolation::ZeroOwner { batch_id });
        }
        if batch.certifications.len() > limits.max_certifications {
            violations.push(InvariantViolation::CertificationsOverCapacity {
                batch_id,
                count: batch.certifications.len(),
            });
        }
        if state.history_of(batch_id).is_empty() {
            violations.push(InvariantViolation::MissingHistory { batch_id });
        }
    }

    for batch_id in state.history().batch_ids() {
        let count = state.history_of(batch_id).len();
        if count > limits.max_history_entries {
            violations.push(InvariantViolation::HistoryOverCapacity { batch_id, count });
        }
        if batch_id >= next_id {
            violations.push(InvariantViolation::IdNotAllocated { batch_id, next_id });
        }
        if let Some(first) = state.history_of(batch_id).first() {
            if !matches!(
                first.action,
                HistoryAction::Registered | HistoryAction::CreatedFromSplit
            ) {
                violations.push(InvariantViolation::ForeignFirstEntry {
                    batch_id,
                    action: first.action,
                });
            }
        }
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}
