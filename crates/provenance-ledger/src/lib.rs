//! # Provenance Ledger - Batch Lifecycle Engine
//!
//! Tracks batches of a physical product from registration through ownership
//! transfers, splits, merges and compliance verification, keeping an
//! append-only audit trail for every batch.
//!
//! ## Purpose
//!
//! Each batch carries a quantity, an origin, a harvest date, certification
//! tokens, a current owner and a compliance status. Every state-changing
//! operation is gated by role checks and a global pause switch, is validated
//! in full before anything is written, and commits atomically.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Live batches hold a positive quantity | `domain/state.rs` - `check_record()` |
//! | INVARIANT-2 | Batch ids are allocated sequentially and never reused | `domain/batch_store.rs` - `ensure_allocatable()` |
//! | INVARIANT-3 | Owners are never the zero address | `domain/guard.rs` - `ensure_valid_recipient()` |
//! | INVARIANT-4 | Certifications and history stay within capacity | `domain/state.rs` - `preflight()` |
//! | INVARIANT-5 | Split and merge conserve total quantity | `domain/engine.rs` - `split_batch()`, `merge_batches()` |
//! | INVARIANT-6 | A rejected operation changes nothing | `domain/state.rs` - `commit()` |
//! | INVARIANT-7 | Each trail opens with the entry that created its batch | `domain/state.rs` - `preflight()` |
//!
//! ## Roles
//!
//! | Operation | Required Role | Additional Checks |
//! |-----------|---------------|-------------------|
//! | `register_batch` | Administrator | Quantity, origin, certifications |
//! | `transfer_ownership` | Current owner | Recipient, status not `Invalid` |
//! | `split_batch` | Current owner | `0 < split < quantity` |
//! | `merge_batches` | Owner of both | Same origin, harvest date, status |
//! | `verify_compliance` | Verifier | Target is `Verified` or `Invalid` |
//!
//! All five are refused while the ledger is paused. Reads never are.
//!
//! ## Error Codes
//!
//! | Code | Error | Category |
//! |------|-------|----------|
//! | 100 | `NotAuthorized` | Authorization |
//! | 101 | `Paused` | Suspended |
//! | 102 | `InsufficientQuantity` | Validation |
//! | 103 | `InvalidMetadata` | Validation |
//! | 104 | `BatchAlreadyExists` | StateConflict |
//! | 105 | `ZeroAddress` | Validation |
//! | 106 | `InvalidBatchId` | NotFound |
//! | 107 | `NotOwner` | Authorization |
//! | 108 | `InvalidStatus` | StateConflict / Validation |
//! | 109 | `MergeMismatch` | StateConflict |
//! | 110 | `OracleOnly` | Authorization |
//! | 111 | `CapacityExceeded` | Capacity |
//! | 112 | `SelfMerge` | Validation |
//! | 113 | `QuantityOverflow` | Validation |
//!
//! ## Usage Example
//!
//! ```ignore
//! use provenance_ledger::prelude::*;
//! use std::sync::Arc;
//!
//! let governance = Arc::new(InMemoryGovernance::new(admin, verifier));
//! let sink = Arc::new(TracingEventSink);
//! let service = ProvenanceService::new(LedgerConfig::from_env(), governance, sink)?;
//!
//! let ctx = CallContext::new(admin, height);
//! let id = service.register_batch(ctx, BatchDraft::new(100, "Farm A", date))?;
//! let child = service.split_batch(ctx, id, 40)?;
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        Batch, BatchDraft, BatchStatus, CallContext, HistoryAction, HistoryEntry, HistoryRef,
    };

    // Value objects
    pub use crate::domain::value_objects::{Address, BatchId};

    // Domain services
    pub use crate::domain::engine::LifecycleEngine;
    pub use crate::domain::guard::GovernanceContext;
    pub use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
    pub use crate::domain::state::LedgerState;

    // Configuration
    pub use crate::config::{LedgerConfig, LedgerLimits};

    // Errors
    pub use crate::errors::{ErrorCategory, ErrorCode, LedgerError, LedgerResult};

    // Events
    pub use crate::events::{LedgerEvent, LedgerEventEnvelope};

    // Ports
    pub use crate::ports::{EventSink, GovernanceSource, ProvenanceApi};

    // Adapters
    pub use crate::adapters::{
        InMemoryEventSink, InMemoryGovernance, NoopEventSink, TracingEventSink,
    };

    // Service
    pub use crate::service::{ProvenanceService, ServiceStats};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
