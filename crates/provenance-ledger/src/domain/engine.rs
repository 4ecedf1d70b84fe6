//! # Lifecycle Engine
//!
//! Register, transfer, split, merge and verify.
//!
//! Each operation follows the same shape:
//!
//! 1. Check the pause flag. Nothing else is checked while paused.
//! 2. Validate roles, ownership, quantities and metadata against an
//!    immutable view of the ledger.
//! 3. Build a [`Changeset`] and hand it to [`LedgerState::commit`].
//!
//! No write happens before step 3, and step 3 is all-or-nothing.

use crate::domain::changeset::Changeset;
use crate::domain::entities::{
    validate_certification, Batch, BatchDraft, BatchStatus, CallContext, HistoryAction,
    HistoryEntry, HistoryRef,
};
use crate::domain::guard::GovernanceContext;
use crate::domain::state::LedgerState;
use crate::domain::value_objects::{Address, BatchId};
use crate::errors::{CapacityResource, LedgerError, LedgerResult};
use tracing::debug;

// =============================================================================
// RECEIPTS
// =============================================================================

/// Result of a registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterReceipt {
    pub batch_id: BatchId,
    pub owner: Address,
    pub quantity: u64,
}

/// Result of an ownership transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferReceipt {
    pub batch_id: BatchId,
    pub from: Address,
    pub to: Address,
}

/// Result of a split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitReceipt {
    pub source: BatchId,
    pub new_batch: BatchId,
    pub split_quantity: u64,
    pub remaining: u64,
}

/// Result of a merge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeReceipt {
    pub target: BatchId,
    pub absorbed: BatchId,
    pub quantity: u64,
}

/// Result of a compliance verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyReceipt {
    pub batch_id: BatchId,
    pub verifier: Address,
    pub previous: BatchStatus,
    pub status: BatchStatus,
    pub certification: Option<String>,
}

// =============================================================================
// ENGINE
// =============================================================================

/// Orchestrates lifecycle operations over a ledger.
///
/// Holds no state of its own: it borrows the ledger and a governance snapshot
/// for the duration of one call.
pub struct LifecycleEngine<'a> {
    state: &'a mut LedgerState,
    governance: GovernanceContext,
}

impl<'a> LifecycleEngine<'a> {
    /// Bind the engine to a ledger and a governance snapshot.
    pub fn new(state: &'a mut LedgerState, governance: GovernanceContext) -> Self {
        Self { state, governance }
    }

    /// Register a new batch owned by the administrator.
    pub fn register_batch(
        &mut self,
        ctx: CallContext,
        draft: BatchDraft,
    ) -> LedgerResult<RegisterReceipt> {
        self.governance.ensure_active()?;
        self.governance.ensure_administrator(ctx.caller)?;
        draft.validate(self.state.limits())?;

        let id = self.state.batches().next_id();
        self.state.batches().ensure_allocatable(id)?;
        let batch = Batch::registered(id, ctx.caller, draft);
        let receipt = RegisterReceipt {
            batch_id: id,
            owner: ctx.caller,
            quantity: batch.quantity,
        };

        debug!(batch_id = %id, quantity = batch.quantity, "Planned registration");
        let changeset = Changeset::new().create(batch).record(
            id,
            HistoryEntry::new(
                ctx.block_height,
                HistoryAction::Registered,
                None,
                Some(HistoryRef::Principal(ctx.caller)),
            ),
        );
        self.state.commit(changeset)?;
        Ok(receipt)
    }

    /// Hand a batch to a new owner.
    pub fn transfer_ownership(
        &mut self,
        ctx: CallContext,
        batch_id: BatchId,
        new_owner: Address,
    ) -> LedgerResult<TransferReceipt> {
        self.governance.ensure_active()?;
        GovernanceContext::ensure_valid_recipient(new_owner)?;

        let batch = self.state.batch(batch_id)?;
        ensure_owner(batch, ctx.caller)?;
        if !batch.status.allows_transfer() {
            return Err(LedgerError::BatchInvalidated(batch_id));
        }

        let mut updated = batch.clone();
        updated.owner = new_owner;

        debug!(batch_id = %batch_id, to = %new_owner, "Planned transfer");
        let changeset = Changeset::new().update(updated).record(
            batch_id,
            HistoryEntry::new(
                ctx.block_height,
                HistoryAction::Transferred,
                Some(HistoryRef::Principal(ctx.caller)),
                Some(HistoryRef::Principal(new_owner)),
            ),
        );
        self.state.commit(changeset)?;
        Ok(TransferReceipt {
            batch_id,
            from: ctx.caller,
            to: new_owner,
        })
    }

    /// Move `split_quantity` units of a batch into a new batch.
    ///
    /// Requires `0 < split_quantity < quantity`, so both halves stay positive.
    pub fn split_batch(
        &mut self,
        ctx: CallContext,
        batch_id: BatchId,
        split_quantity: u64,
    ) -> LedgerResult<SplitReceipt> {
        self.governance.ensure_active()?;

        let original = self.state.batch(batch_id)?;
        ensure_owner(original, ctx.caller)?;
        if split_quantity == 0 || split_quantity >= original.quantity {
            return Err(LedgerError::SplitOutOfRange {
                requested: split_quantity,
                available: original.quantity,
            });
        }

        let new_id = self.state.batches().next_id();
        self.state.batches().ensure_allocatable(new_id)?;

        let remaining = original.quantity - split_quantity;
        let child = original.split_child(new_id, ctx.caller, split_quantity);
        let mut parent = original.clone();
        parent.quantity = remaining;

        debug!(
            batch_id = %batch_id,
            new_batch = %new_id,
            split_quantity,
            remaining,
            "Planned split"
        );
        let changeset = Changeset::new()
            .create(child)
            .update(parent)
            .record(
                batch_id,
                HistoryEntry::new(
                    ctx.block_height,
                    HistoryAction::Split,
                    Some(HistoryRef::Batch(batch_id)),
                    Some(HistoryRef::Batch(new_id)),
                ),
            )
            .record(
                new_id,
                HistoryEntry::new(
                    ctx.block_height,
                    HistoryAction::CreatedFromSplit,
                    Some(HistoryRef::Batch(batch_id)),
                    Some(HistoryRef::Principal(ctx.caller)),
                ),
            );
        self.state.commit(changeset)?;
        Ok(SplitReceipt {
            source: batch_id,
            new_batch: new_id,
            split_quantity,
            remaining,
        })
    }

    /// Absorb `absorbed` into `target`.
    ///
    /// Both batches must belong to the caller and share origin, harvest date
    /// and status. The target keeps its own certifications. The absorbed id
    /// is gone for good, though its history stays readable.
    pub fn merge_batches(
        &mut self,
        ctx: CallContext,
        target: BatchId,
        absorbed: BatchId,
    ) -> LedgerResult<MergeReceipt> {
        self.governance.ensure_active()?;
        if target == absorbed {
            return Err(LedgerError::SelfMerge(target));
        }

        let kept = self.state.batch(target)?;
        let gone = self.state.batch(absorbed)?;
        ensure_owner(kept, ctx.caller)?;
        ensure_owner(gone, ctx.caller)?;
        if let Some(field) = kept.provenance_mismatch(gone) {
            return Err(LedgerError::MergeMismatch {
                left: target,
                right: absorbed,
                field,
            });
        }
        let quantity =
            kept.quantity
                .checked_add(gone.quantity)
                .ok_or(LedgerError::QuantityOverflow {
                    left: kept.quantity,
                    right: gone.quantity,
                })?;

        let mut merged = kept.clone();
        merged.quantity = quantity;

        debug!(target = %target, absorbed = %absorbed, quantity, "Planned merge");
        let changeset = Changeset::new()
            .update(merged)
            .remove(absorbed)
            .record(
                target,
                HistoryEntry::new(
                    ctx.block_height,
                    HistoryAction::Merged,
                    Some(HistoryRef::Batch(absorbed)),
                    None,
                ),
            );
        self.state.commit(changeset)?;
        Ok(MergeReceipt {
            target,
            absorbed,
            quantity,
        })
    }

    /// Set the compliance status of a batch, optionally attaching a
    /// certification.
    ///
    /// Only `Verified` and `Invalid` are accepted targets. Re-verification is
    /// allowed from either.
    pub fn verify_compliance(
        &mut self,
        ctx: CallContext,
        batch_id: BatchId,
        new_status: BatchStatus,
        additional_certification: Option<String>,
    ) -> LedgerResult<VerifyReceipt> {
        self.governance.ensure_active()?;
        self.governance.ensure_verifier(ctx.caller)?;
        if !new_status.is_verification_target() {
            return Err(LedgerError::InvalidStatusTarget(new_status));
        }

        let batch = self.state.batch(batch_id)?;
        let limits = self.state.limits();
        let previous = batch.status;
        let mut updated = batch.clone();
        updated.status = new_status;

        if let Some(cert) = &additional_certification {
            validate_certification(cert, limits)?;
            if updated.certifications.len() >= limits.max_certifications {
                return Err(LedgerError::CapacityExceeded {
                    resource: CapacityResource::Certifications,
                    limit: limits.max_certifications,
                });
            }
            updated.certifications.push(cert.clone());
        }

        debug!(batch_id = %batch_id, ?previous, status = ?new_status, "Planned verification");
        let changeset = Changeset::new().update(updated).record(
            batch_id,
            HistoryEntry::new(ctx.block_height, HistoryAction::Verified, None, None),
        );
        self.state.commit(changeset)?;
        Ok(VerifyReceipt {
            batch_id,
            verifier: ctx.caller,
            previous,
            status: new_status,
            certification: additional_certification,
        })
    }
}

fn ensure_owner(batch: &Batch, caller: Address) -> LedgerResult<()> {
    if batch.owner != caller {
        return Err(LedgerError::NotOwner {
            batch_id: batch.id,
            caller,
        });
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
