//! # Identity Guard
//!
//! Pure role and recipient checks against a governance snapshot.
//!
//! Role administration and the pause switch belong to the host. The engine
//! receives a [`GovernanceContext`] with every call and only ever reads it.

use crate::domain::value_objects::Address;
use crate::errors::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};

/// Snapshot of the externally administered roles and pause flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceContext {
    /// Principal allowed to register batches.
    pub administrator: Address,
    /// Principal allowed to set compliance status.
    pub verifier: Address,
    /// All mutating operations are suspended while set.
    pub paused: bool,
}

impl GovernanceContext {
    /// Create an unpaused context.
    #[must_use]
    pub const fn new(administrator: Address, verifier: Address) -> Self {
        Self {
            administrator,
            verifier,
            paused: false,
        }
    }

    /// Builder method to set the pause flag.
    #[must_use]
    pub const fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// Returns true if `caller` holds the administrator role.
    #[must_use]
    pub fn is_administrator(&self, caller: Address) -> bool {
        !caller.is_zero() && caller == self.administrator
    }

    /// Returns true if `caller` holds the verifier role.
    #[must_use]
    pub fn is_verifier(&self, caller: Address) -> bool {
        !caller.is_zero() && caller == self.verifier
    }

    /// Returns true if `identity` may receive a batch.
    #[must_use]
    pub fn is_valid_recipient(identity: Address) -> bool {
        !identity.is_zero()
    }

    /// Fail with `Paused` while operations are suspended.
    pub fn ensure_active(&self) -> LedgerResult<()> {
        if self.paused {
            return Err(LedgerError::Paused);
        }
        Ok(())
    }

    /// Fail with `NotAuthorized` unless `caller` is the administrator.
    pub fn ensure_administrator(&self, caller: Address) -> LedgerResult<()> {
        if !self.is_administrator(caller) {
            return Err(LedgerError::NotAuthorized { caller });
        }
        Ok(())
    }

    /// Fail with `OracleOnly` unless `caller` is the verifier.
    pub fn ensure_verifier(&self, caller: Address) -> LedgerResult<()> {
        if !self.is_verifier(caller) {
            return Err(LedgerError::OracleOnly { caller });
        }
        Ok(())
    }

    /// Fail with `ZeroAddress` if `identity` is the reserved null identity.
    pub fn ensure_valid_recipient(identity: Address) -> LedgerResult<()> {
        if !Self::is_valid_recipient(identity) {
            return Err(LedgerError::ZeroAddress);
        }
        Ok(())
    }
}
