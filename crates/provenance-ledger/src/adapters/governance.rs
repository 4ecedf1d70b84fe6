//! # Governance Adapter
//!
//! In-memory role registry and pause switch.

use crate::domain::guard::GovernanceContext;
use crate::domain::value_objects::Address;
use crate::ports::outbound::GovernanceSource;
use parking_lot::RwLock;
use tracing::info;

/// Mutable role registry for testing and single-process hosts.
#[derive(Debug)]
pub struct InMemoryGovernance {
    context: RwLock<GovernanceContext>,
}

impl InMemoryGovernance {
    /// Create an unpaused registry.
    #[must_use]
    pub fn new(administrator: Address, verifier: Address) -> Self {
        Self {
            context: RwLock::new(GovernanceContext::new(administrator, verifier)),
        }
    }

    /// Hand the administrator role to `administrator`.
    pub fn set_administrator(&self, administrator: Address) {
        self.context.write().administrator = administrator;
        info!(%administrator, "Administrator role reassigned");
    }

    /// Hand the verifier role to `verifier`.
    pub fn set_verifier(&self, verifier: Address) {
        self.context.write().verifier = verifier;
        info!(%verifier, "Verifier role reassigned");
    }

    /// Suspend or resume all mutating operations.
    pub fn set_paused(&self, paused: bool) {
        self.context.write().paused = paused;
        info!(paused, "Pause flag changed");
    }
}

impl GovernanceSource for InMemoryGovernance {
    fn governance(&self) -> GovernanceContext {
        *self.context.read()
    }
}

/// A fixed snapshot is its own source.
impl GovernanceSource for GovernanceContext {
    fn governance(&self) -> GovernanceContext {
        *self
    }
}
