//! # Domain Entities
//!
//! Batches, their compliance status, and the audit entries recorded against
//! them.
//!
//! ## Type Decisions
//!
//! - `quantity: u64` - quantities are counts of physical units, never
//!   negative. Zero is rejected at every entry point so a stored batch always
//!   holds at least one unit.
//! - `HistoryRef` is a tagged reference rather than free text: an entry
//!   points either at a principal or at another batch.

use crate::config::LedgerLimits;
use crate::domain::value_objects::{Address, BatchId};
use crate::errors::{CapacityResource, LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// STATUS
// =============================================================================

/// Compliance status of a batch.
///
/// ```text
/// [Pending] ──verify──→ [Verified] ←──verify──→ [Invalid]
///     │                                            ↑
///     └──────────────────verify────────────────────┘
/// ```
///
/// `Harvested` is part of the status vocabulary but no lifecycle operation
/// produces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BatchStatus {
    /// Registered, not yet assessed.
    #[default]
    Pending,
    /// Assessed as compliant.
    Verified,
    /// Harvested. Not reachable through any operation.
    Harvested,
    /// Assessed as non-compliant. Blocks ownership transfer.
    Invalid,
}

impl BatchStatus {
    /// Returns true if verification may move a batch into this status.
    #[must_use]
    pub fn is_verification_target(self) -> bool {
        matches!(self, Self::Verified | Self::Invalid)
    }

    /// Returns true if a batch in this status may change owner.
    #[must_use]
    pub fn allows_transfer(self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

// =============================================================================
// BATCH
// =============================================================================

/// Caller-supplied fields of a new batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDraft {
    /// Units in the batch. Must be positive.
    pub quantity: u64,
    /// Where the good came from. Non-empty, bounded.
    pub origin: String,
    /// Harvest timestamp or block height. Not validated.
    pub harvest_date: u64,
    /// Initial certification tokens.
    pub certifications: Vec<String>,
}

impl BatchDraft {
    /// Create a draft with no certifications.
    pub fn new(quantity: u64, origin: impl Into<String>, harvest_date: u64) -> Self {
        Self {
            quantity,
            origin: origin.into(),
            harvest_date,
            certifications: Vec::new(),
        }
    }

    /// Builder method to add a certification token.
    #[must_use]
    pub fn with_certification(mut self, cert: impl Into<String>) -> Self {
        self.certifications.push(cert.into());
        self
    }

    /// Check quantity, origin and certifications against `limits`.
    pub fn validate(&self, limits: &LedgerLimits) -> LedgerResult<()> {
        if self.quantity == 0 {
            return Err(LedgerError::ZeroQuantity);
        }

        let origin_len = self.origin.chars().count();
        if origin_len == 0 {
            return Err(LedgerError::InvalidMetadata("origin is empty".to_string()));
        }
        if origin_len > limits.max_origin_len {
            return Err(LedgerError::InvalidMetadata(format!(
                "origin is {origin_len} characters, limit {}",
                limits.max_origin_len
            )));
        }

        if self.certifications.len() > limits.max_certifications {
            return Err(LedgerError::CapacityExceeded {
                resource: CapacityResource::Certifications,
                limit: limits.max_certifications,
            });
        }
        for cert in &self.certifications {
            validate_certification(cert, limits)?;
        }

        Ok(())
    }
}

/// Check a single certification token against `limits`.
pub fn validate_certification(cert: &str, limits: &LedgerLimits) -> LedgerResult<()> {
    let len = cert.chars().count();
    if len > limits.max_certification_len {
        return Err(LedgerError::InvalidMetadata(format!(
            "certification is {len} characters, limit {}",
            limits.max_certification_len
        )));
    }
    Ok(())
}

/// A tracked quantity of a physical good.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Identifier, unique for the lifetime of the ledger.
    pub id: BatchId,
    /// Current owner. Never the zero address.
    pub owner: Address,
    /// Units held. Always positive.
    pub quantity: u64,
    /// Provenance origin.
    pub origin: String,
    /// Harvest timestamp or block height.
    pub harvest_date: u64,
    /// Certification tokens in attachment order.
    pub certifications: Vec<String>,
    /// Compliance status.
    pub status: BatchStatus,
}

impl Batch {
    /// Build a freshly registered batch from a validated draft.
    pub fn registered(id: BatchId, owner: Address, draft: BatchDraft) -> Self {
        Self {
            id,
            owner,
            quantity: draft.quantity,
            origin: draft.origin,
            harvest_date: draft.harvest_date,
            certifications: draft.certifications,
            status: BatchStatus::Pending,
        }
    }

    /// Build the child of a split.
    ///
    /// Origin, harvest date, certifications and status are copied verbatim.
    #[must_use]
    pub fn split_child(&self, id: BatchId, owner: Address, quantity: u64) -> Self {
        Self {
            id,
            owner,
            quantity,
            origin: self.origin.clone(),
            harvest_date: self.harvest_date,
            certifications: self.certifications.clone(),
            status: self.status,
        }
    }

    /// Name of the first provenance field that differs from `other`, if any.
    ///
    /// Merging requires origin, harvest date and status to match.
    #[must_use]
    pub fn provenance_mismatch(&self, other: &Batch) -> Option<&'static str> {
        if self.origin != other.origin {
            Some("origin")
        } else if self.harvest_date != other.harvest_date {
            Some("harvest_date")
        } else if self.status != other.status {
            Some("status")
        } else {
            None
        }
    }
}

// =============================================================================
// HISTORY
// =============================================================================

/// Lifecycle event recorded in a batch history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    /// Batch was registered.
    Registered,
    /// Ownership changed.
    Transferred,
    /// Quantity was split off into a new batch.
    Split,
    /// Batch was created by splitting another.
    CreatedFromSplit,
    /// Another batch was absorbed into this one.
    Merged,
    /// Compliance status was set by the verifier.
    Verified,
}

impl HistoryAction {
    /// Wire name of the action.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Transferred => "transferred",
            Self::Split => "split",
            Self::CreatedFromSplit => "created_from_split",
            Self::Merged => "merged",
            Self::Verified => "verified",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counterparty of a history entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryRef {
    /// A principal identity.
    Principal(Address),
    /// Another batch.
    Batch(BatchId),
}

impl fmt::Display for HistoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Principal(addr) => write!(f, "{addr}"),
            Self::Batch(id) => write!(f, "{id}"),
        }
    }
}

/// Immutable audit record of one lifecycle event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Host block height at which the event was committed.
    pub timestamp: u64,
    /// What happened.
    pub action: HistoryAction,
    /// Source of the event, if the action has one.
    pub from: Option<HistoryRef>,
    /// Target of the event, if the action has one.
    pub to: Option<HistoryRef>,
}

impl HistoryEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(
        timestamp: u64,
        action: HistoryAction,
        from: Option<HistoryRef>,
        to: Option<HistoryRef>,
    ) -> Self {
        Self {
            timestamp,
            action,
            from,
            to,
        }
    }
}

// =============================================================================
// CALL CONTEXT
// =============================================================================

/// Who is calling, and at which host height.
///
/// Identity comes from the host; this crate never derives it from payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Principal invoking the operation.
    pub caller: Address,
    /// Host block height, used as the history timestamp.
    pub block_height: u64,
}

impl CallContext {
    /// Create a call context.
    #[must_use]
    pub const fn new(caller: Address, block_height: u64) -> Self {
        Self {
            caller,
            block_height,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
