//! # Event Schema
//!
//! Notifications published after a lifecycle operation commits.
//!
//! Events are derived from operation receipts and are never published for a
//! rejected operation. They complement the per-batch history: history is the
//! authoritative audit trail, events tell subscribers that it changed.
//!
//! | Event | Topic | Emitted by |
//! |-------|-------|-----------|
//! | `BatchRegistered` | `batch.registered` | `register_batch` |
//! | `OwnershipTransferred` | `batch.transferred` | `transfer_ownership` |
//! | `BatchSplit` | `batch.split` | `split_batch` |
//! | `BatchesMerged` | `batch.merged` | `merge_batches` |
//! | `ComplianceVerified` | `batch.verified` | `verify_compliance` |

use crate::domain::engine::{
    MergeReceipt, RegisterReceipt, SplitReceipt, TransferReceipt, VerifyReceipt,
};
use crate::domain::entities::BatchStatus;
use crate::domain::value_objects::{Address, BatchId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Topic names.
pub mod topics {
    /// A batch was registered.
    pub const BATCH_REGISTERED: &str = "batch.registered";
    /// A batch changed owner.
    pub const BATCH_TRANSFERRED: &str = "batch.transferred";
    /// A batch was split.
    pub const BATCH_SPLIT: &str = "batch.split";
    /// Two batches were merged.
    pub const BATCH_MERGED: &str = "batch.merged";
    /// A batch compliance status was set.
    pub const BATCH_VERIFIED: &str = "batch.verified";
}

/// A committed lifecycle change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A batch was registered.
    BatchRegistered {
        batch_id: BatchId,
        owner: Address,
        quantity: u64,
    },
    /// A batch changed owner.
    OwnershipTransferred {
        batch_id: BatchId,
        from: Address,
        to: Address,
    },
    /// Units were split off into a new batch.
    BatchSplit {
        source: BatchId,
        new_batch: BatchId,
        split_quantity: u64,
        remaining: u64,
    },
    /// A batch was absorbed into another.
    BatchesMerged {
        target: BatchId,
        absorbed: BatchId,
        quantity: u64,
    },
    /// The verifier set a compliance status.
    ///
    /// Unlike the history entry, this carries the verifier identity.
    ComplianceVerified {
        batch_id: BatchId,
        verifier: Address,
        previous: BatchStatus,
        status: BatchStatus,
        certification: Option<String>,
    },
}

impl LedgerEvent {
    /// Topic this event is published under.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::BatchRegistered { .. } => topics::BATCH_REGISTERED,
            Self::OwnershipTransferred { .. } => topics::BATCH_TRANSFERRED,
            Self::BatchSplit { .. } => topics::BATCH_SPLIT,
            Self::BatchesMerged { .. } => topics::BATCH_MERGED,
            Self::ComplianceVerified { .. } => topics::BATCH_VERIFIED,
        }
    }

    /// The batch the event is primarily about.
    #[must_use]
    pub fn batch_id(&self) -> BatchId {
        match self {
            Self::BatchRegistered { batch_id, .. }
            | Self::OwnershipTransferred { batch_id, .. }
            | Self::ComplianceVerified { batch_id, .. } => *batch_id,
            Self::BatchSplit { source, .. } => *source,
            Self::BatchesMerged { target, .. } => *target,
        }
    }
}

impl From<RegisterReceipt> for LedgerEvent {
    fn from(r: RegisterReceipt) -> Self {
        Self::BatchRegistered {
            batch_id: r.batch_id,
            owner: r.owner,
            quantity: r.quantity,
        }
    }
}

impl From<TransferReceipt> for LedgerEvent {
    fn from(r: TransferReceipt) -> Self {
        Self::OwnershipTransferred {
            batch_id: r.batch_id,
            from: r.from,
            to: r.to,
        }
    }
}

impl From<SplitReceipt> for LedgerEvent {
    fn from(r: SplitReceipt) -> Self {
        Self::BatchSplit {
            source: r.source,
            new_batch: r.new_batch,
            split_quantity: r.split_quantity,
            remaining: r.remaining,
        }
    }
}

impl From<MergeReceipt> for LedgerEvent {
    fn from(r: MergeReceipt) -> Self {
        Self::BatchesMerged {
            target: r.target,
            absorbed: r.absorbed,
            quantity: r.quantity,
        }
    }
}

impl From<VerifyReceipt> for LedgerEvent {
    fn from(r: VerifyReceipt) -> Self {
        Self::ComplianceVerified {
            batch_id: r.batch_id,
            verifier: r.verifier,
            previous: r.previous,
            status: r.status,
            certification: r.certification,
        }
    }
}

/// Event plus delivery metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEventEnvelope {
    /// Unique id for de-duplication by subscribers.
    pub event_id: Uuid,
    /// Host height at which the operation committed.
    pub block_height: u64,
    /// The event.
    pub event: LedgerEvent,
}

impl LedgerEventEnvelope {
    /// Wrap `event` with a fresh id.
    #[must_use]
    pub fn new(block_height: u64, event: LedgerEvent) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            block_height,
            event,
        }
    }

    /// JSON encoding for transport.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
