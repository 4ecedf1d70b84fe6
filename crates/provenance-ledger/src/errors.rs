//! # Error Types
//!
//! All error types for the provenance ledger.
//!
//! Every rejected operation returns a [`LedgerError`]. Hosts that need a flat
//! error code (the table in the crate docs) use [`LedgerError::code`]; hosts
//! that route on the kind of failure use [`LedgerError::category`].

use crate::config::LedgerLimits;
use crate::domain::entities::BatchStatus;
use crate::domain::value_objects::{Address, BatchId};
use thiserror::Error;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Bounded collections whose capacity can be exhausted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapacityResource {
    /// Certifications attached to one batch.
    Certifications,
    /// History entries recorded for one batch.
    History,
    /// The batch identifier space.
    BatchIds,
}

impl std::fmt::Display for CapacityResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Certifications => write!(f, "certifications"),
            Self::History => write!(f, "history"),
            Self::BatchIds => write!(f, "batch ids"),
        }
    }
}

/// Errors returned by lifecycle operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Operations are globally suspended.
    #[error("operations are paused")]
    Paused,

    /// Caller is not the administrator.
    #[error("caller {caller} is not the administrator")]
    NotAuthorized { caller: Address },

    /// Caller is not the verifier.
    #[error("caller {caller} is not the verifier")]
    OracleOnly { caller: Address },

    /// Caller does not own the batch.
    #[error("caller {caller} does not own batch {batch_id}")]
    NotOwner { batch_id: BatchId, caller: Address },

    /// Recipient is the reserved null identity.
    #[error("recipient is the zero address")]
    ZeroAddress,

    /// No batch with this id exists.
    #[error("unknown batch id: {0}")]
    InvalidBatchId(BatchId),

    /// Registration with a zero quantity.
    #[error("quantity must be greater than zero")]
    ZeroQuantity,

    /// Split amount outside `0 < split < quantity`.
    #[error("insufficient quantity: cannot split {requested} from batch holding {available}")]
    SplitOutOfRange { requested: u64, available: u64 },

    /// Sum of two batch quantities does not fit.
    #[error("quantity overflow: {left} + {right}")]
    QuantityOverflow { left: u64, right: u64 },

    /// Origin or certification text is malformed.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Verification target outside `{Verified, Invalid}`.
    #[error("status {0:?} cannot be set by verification")]
    InvalidStatusTarget(BatchStatus),

    /// Transfer of a batch whose status is `Invalid`.
    #[error("batch {0} is invalid and cannot change owner")]
    BatchInvalidated(BatchId),

    /// Merge inputs differ in provenance metadata or status.
    #[error("cannot merge batches {left} and {right}: {field} differs")]
    MergeMismatch {
        left: BatchId,
        right: BatchId,
        field: &'static str,
    },

    /// Merge of a batch with itself.
    #[error("cannot merge batch {0} with itself")]
    SelfMerge(BatchId),

    /// Allocated id is already occupied.
    #[error("batch {0} already exists")]
    BatchAlreadyExists(BatchId),

    /// A bounded collection is full.
    #[error("{resource} capacity exceeded: limit {limit}")]
    CapacityExceeded {
        resource: CapacityResource,
        limit: usize,
    },
}

/// Broad classes of failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller lacks the required role or ownership.
    Authorization,
    /// Malformed quantity, metadata, recipient or status target.
    Validation,
    /// Unknown batch id.
    NotFound,
    /// Request conflicts with current batch state.
    StateConflict,
    /// Operations globally paused.
    Suspended,
    /// A bounded collection is full.
    Capacity,
}

/// Stable error codes exposed to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    NotAuthorized = 100,
    Paused = 101,
    InsufficientQuantity = 102,
    InvalidMetadata = 103,
    BatchAlreadyExists = 104,
    ZeroAddress = 105,
    InvalidBatchId = 106,
    NotOwner = 107,
    InvalidStatus = 108,
    MergeMismatch = 109,
    OracleOnly = 110,
    CapacityExceeded = 111,
    SelfMerge = 112,
    QuantityOverflow = 113,
}

impl ErrorCode {
    /// Numeric form of the code.
    #[must_use]
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

impl LedgerError {
    /// The stable code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Paused => ErrorCode::Paused,
            Self::NotAuthorized { .. } => ErrorCode::NotAuthorized,
            Self::OracleOnly { .. } => ErrorCode::OracleOnly,
            Self::NotOwner { .. } => ErrorCode::NotOwner,
            Self::ZeroAddress => ErrorCode::ZeroAddress,
            Self::InvalidBatchId(_) => ErrorCode::InvalidBatchId,
            Self::ZeroQuantity | Self::SplitOutOfRange { .. } => ErrorCode::InsufficientQuantity,
            Self::QuantityOverflow { .. } => ErrorCode::QuantityOverflow,
            Self::InvalidMetadata(_) => ErrorCode::InvalidMetadata,
            Self::InvalidStatusTarget(_) | Self::BatchInvalidated(_) => ErrorCode::InvalidStatus,
            Self::MergeMismatch { .. } => ErrorCode::MergeMismatch,
            Self::SelfMerge(_) => ErrorCode::SelfMerge,
            Self::BatchAlreadyExists(_) => ErrorCode::BatchAlreadyExists,
            Self::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
        }
    }

    /// The class of failure for this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotAuthorized { .. } | Self::OracleOnly { .. } | Self::NotOwner { .. } => {
                ErrorCategory::Authorization
            }
            Self::ZeroAddress
            | Self::ZeroQuantity
            | Self::SplitOutOfRange { .. }
            | Self::QuantityOverflow { .. }
            | Self::InvalidMetadata(_)
            | Self::InvalidStatusTarget(_)
            | Self::SelfMerge(_) => ErrorCategory::Validation,
            Self::InvalidBatchId(_) => ErrorCategory::NotFound,
            Self::BatchInvalidated(_)
            | Self::MergeMismatch { .. }
            | Self::BatchAlreadyExists(_) => ErrorCategory::StateConflict,
            Self::Paused => ErrorCategory::Suspended,
            Self::CapacityExceeded { .. } => ErrorCategory::Capacity,
        }
    }
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Invalid ledger configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A limit that must be positive was set to zero.
    #[error("configuration limit `{name}` must be greater than zero")]
    ZeroLimit { name: &'static str },

    /// Configured limits differ from those recorded in an existing ledger.
    #[error("configured limits {configured:?} differ from ledger limits {recorded:?}")]
    LimitsMismatch {
        configured: LedgerLimits,
        recorded: LedgerLimits,
    },
}

// =============================================================================
// TESTS
// =============================================================================
