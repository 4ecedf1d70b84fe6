//! # Provenance Service
//!
//! Application service wiring the lifecycle engine to its host.
//!
//! The service:
//! 1. Serializes mutating operations behind one write lock
//! 2. Snapshots governance (roles and pause flag) inside that lock
//! 3. Runs the engine, which commits atomically or not at all
//! 4. Publishes a ledger event for every committed operation, still under
//!    the lock, so events leave in commit order
//! 5. Maintains operation statistics

use crate::config::LedgerConfig;
use crate::domain::engine::LifecycleEngine;
use crate::domain::entities::{Batch, BatchDraft, BatchStatus, CallContext, HistoryEntry};
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::state::LedgerState;
use crate::domain::value_objects::{Address, BatchId};
use crate::errors::{ConfigError, LedgerResult};
use crate::events::{LedgerEvent, LedgerEventEnvelope};
use crate::ports::inbound::ProvenanceApi;
use crate::ports::outbound::{EventSink, GovernanceSource};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// =============================================================================
// STATISTICS
// =============================================================================

/// Statistics for the provenance service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Batches registered.
    pub batches_registered: u64,
    /// Ownership transfers committed.
    pub transfers: u64,
    /// Splits committed.
    pub splits: u64,
    /// Merges committed.
    pub merges: u64,
    /// Compliance verifications committed.
    pub verifications: u64,
    /// Operations rejected with an error.
    pub rejected_operations: u64,
}

#[derive(Clone, Copy, Debug)]
enum Operation {
    Register,
    Transfer,
    Split,
    Merge,
    Verify,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Register => "register_batch",
            Self::Transfer => "transfer_ownership",
            Self::Split => "split_batch",
            Self::Merge => "merge_batches",
            Self::Verify => "verify_compliance",
        }
    }

    fn count(self, stats: &mut ServiceStats) {
        let counter = match self {
            Self::Register => &mut stats.batches_registered,
            Self::Transfer => &mut stats.transfers,
            Self::Split => &mut stats.splits,
            Self::Merge => &mut stats.merges,
            Self::Verify => &mut stats.verifications,
        };
        *counter += 1;
    }
}

// =============================================================================
// SERVICE
// =============================================================================

/// The provenance ledger service.
pub struct ProvenanceService<G: GovernanceSource, E: EventSink> {
    /// Service configuration.
    config: LedgerConfig,
    /// Batch records and history.
    state: RwLock<LedgerState>,
    /// Role registry and pause flag.
    governance: Arc<G>,
    /// Destination for committed events.
    events: Arc<E>,
    /// Service statistics.
    stats: RwLock<ServiceStats>,
}

impl<G: GovernanceSource, E: EventSink> ProvenanceService<G, E> {
    /// Create a service over an empty ledger.
    pub fn new(
        config: LedgerConfig,
        governance: Arc<G>,
        events: Arc<E>,
    ) -> Result<Self, ConfigError> {
        let state = LedgerState::new(config.limits);
        Self::with_state(config, state, governance, events)
    }

    /// Create a service over an existing ledger.
    ///
    /// The configured limits must match those recorded in `state`.
    pub fn with_state(
        config: LedgerConfig,
        state: LedgerState,
        governance: Arc<G>,
        events: Arc<E>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.limits != *state.limits() {
            return Err(ConfigError::LimitsMismatch {
                configured: config.limits,
                recorded: *state.limits(),
            });
        }

        info!(
            next_batch_id = %state.batches().next_id(),
            live_batches = state.batches().len(),
            publish_events = config.publish_events,
            "Provenance service started"
        );
        Ok(Self {
            config,
            state: RwLock::new(state),
            governance,
            events,
            stats: RwLock::new(ServiceStats::default()),
        })
    }

    /// Current service statistics.
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// The active configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Copy of the whole ledger.
    pub fn snapshot(&self) -> LedgerState {
        self.state.read().clone()
    }

    /// Check every ledger invariant against the current state.
    pub fn check_invariants(&self) -> InvariantCheckResult {
        check_all_invariants(&self.state.read())
    }

    /// Run one operation under the state write lock.
    ///
    /// The event is published before the lock is released, so the sink sees
    /// events in commit order.
    fn execute<R, F>(&self, operation: Operation, ctx: CallContext, run: F) -> LedgerResult<R>
    where
        R: Clone + Into<LedgerEvent>,
        F: FnOnce(&mut LifecycleEngine<'_>) -> LedgerResult<R>,
    {
        let mut state = self.state.write();
        let governance = self.governance.governance();
        let outcome = run(&mut LifecycleEngine::new(&mut *state, governance));

        match outcome {
            Ok(receipt) => {
                operation.count(&mut self.stats.write());
                info!(operation = operation.as_str(), caller = %ctx.caller, "Operation committed");
                if self.config.publish_events {
                    let event = receipt.clone().into();
                    self.events.publish(LedgerEventEnvelope::new(ctx.block_height, event));
                }
                Ok(receipt)
            }
            Err(error) => {
                self.stats.write().rejected_operations += 1;
                warn!(
                    operation = operation.as_str(),
                    caller = %ctx.caller,
                    code = error.code().as_u16(),
                    category = ?error.category(),
                    %error,
                    "Operation rejected"
                );
                Err(error)
            }
        }
    }
}

impl<G: GovernanceSource, E: EventSink> ProvenanceApi for ProvenanceService<G, E> {
    #[instrument(skip(self, draft), fields(caller = %ctx.caller, height = ctx.block_height))]
    fn register_batch(&self, ctx: CallContext, draft: BatchDraft) -> LedgerResult<BatchId> {
        self.execute(Operation::Register, ctx, |engine| {
            engine.register_batch(ctx, draft)
        })
        .map(|receipt| receipt.batch_id)
    }

    #[instrument(skip(self), fields(caller = %ctx.caller, height = ctx.block_height))]
    fn transfer_ownership(
        &self,
        ctx: CallContext,
        batch_id: BatchId,
        new_owner: Address,
    ) -> LedgerResult<()> {
        self.execute(Operation::Transfer, ctx, |engine| {
            engine.transfer_ownership(ctx, batch_id, new_owner)
        })
        .map(|_| ())
    }

    #[instrument(skip(self), fields(caller = %ctx.caller, height = ctx.block_height))]
    fn split_batch(
        &self,
        ctx: CallContext,
        batch_id: BatchId,
        split_quantity: u64,
    ) -> LedgerResult<BatchId> {
        self.execute(Operation::Split, ctx, |engine| {
            engine.split_batch(ctx, batch_id, split_quantity)
        })
        .map(|receipt| receipt.new_batch)
    }

    #[instrument(skip(self), fields(caller = %ctx.caller, height = ctx.block_height))]
    fn merge_batches(
        &self,
        ctx: CallContext,
        target: BatchId,
        absorbed: BatchId,
    ) -> LedgerResult<()> {
        self.execute(Operation::Merge, ctx, |engine| {
            engine.merge_batches(ctx, target, absorbed)
        })
        .map(|_| ())
    }

    #[instrument(
        skip(self, additional_certification),
        fields(caller = %ctx.caller, height = ctx.block_height)
    )]
    fn verify_compliance(
        &self,
        ctx: CallContext,
        batch_id: BatchId,
        new_status: BatchStatus,
        additional_certification: Option<String>,
    ) -> LedgerResult<()> {
        self.execute(Operation::Verify, ctx, |engine| {
            engine.verify_compliance(ctx, batch_id, new_status, additional_certification)
        })
        .map(|_| ())
    }

    fn get_batch_details(&self, batch_id: BatchId) -> Option<Batch> {
        self.state.read().batch(batch_id).ok().cloned()
    }

    fn get_batch_history(&self, batch_id: BatchId) -> Vec<HistoryEntry> {
        self.state.read().history_of(batch_id).to_vec()
    }

    fn get_next_batch_id(&self) -> BatchId {
        self.state.read().batches().next_id()
    }
}

// =============================================================================
// TESTS
// =============================================================================
