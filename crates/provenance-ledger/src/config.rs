//! # Ledger Configuration
//!
//! Capacity limits and service switches.
//!
//! The defaults reproduce the bounds of the ledger data model: origin text up
//! to 256 characters, certification tokens up to 64 characters, at most 10
//! certifications and 50 history entries per batch.
//!
//! ## Environment Variables
//!
//! - `PROVENANCE_MAX_ORIGIN_LEN`: origin length bound (default: 256)
//! - `PROVENANCE_MAX_CERTIFICATION_LEN`: certification token bound (default: 64)
//! - `PROVENANCE_MAX_CERTIFICATIONS`: certifications per batch (default: 10)
//! - `PROVENANCE_MAX_HISTORY_ENTRIES`: history entries per batch (default: 50)
//! - `PROVENANCE_PUBLISH_EVENTS`: publish ledger events (default: true)

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

/// Upper bounds enforced on every stored batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLimits {
    /// Maximum origin length in characters.
    pub max_origin_len: usize,
    /// Maximum length of one certification token in characters.
    pub max_certification_len: usize,
    /// Maximum certifications attached to one batch.
    pub max_certifications: usize,
    /// Maximum history entries recorded for one batch.
    pub max_history_entries: usize,
}

impl Default for LedgerLimits {
    fn default() -> Self {
        Self {
            max_origin_len: 256,
            max_certification_len: 64,
            max_certifications: 10,
            max_history_entries: 50,
        }
    }
}

impl LedgerLimits {
    /// Reject limits that would make every registration fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("max_origin_len", self.max_origin_len),
            ("max_certification_len", self.max_certification_len),
            ("max_certifications", self.max_certifications),
            ("max_history_entries", self.max_history_entries),
        ];
        for (name, value) in named {
            if value == 0 {
                return Err(ConfigError::ZeroLimit { name });
            }
        }
        Ok(())
    }
}

/// Complete ledger configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Capacity limits.
    pub limits: LedgerLimits,
    /// Publish a ledger event after every committed operation.
    pub publish_events: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            limits: LedgerLimits::default(),
            publish_events: true,
        }
    }
}

impl LedgerConfig {
    /// Defaults overridden by `PROVENANCE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by values from `lookup`.
    ///
    /// Values that fail to parse are ignored and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let limits = &mut config.limits;

        override_usize(&lookup, "PROVENANCE_MAX_ORIGIN_LEN", &mut limits.max_origin_len);
        override_usize(
            &lookup,
            "PROVENANCE_MAX_CERTIFICATION_LEN",
            &mut limits.max_certification_len,
        );
        override_usize(
            &lookup,
            "PROVENANCE_MAX_CERTIFICATIONS",
            &mut limits.max_certifications,
        );
        override_usize(
            &lookup,
            "PROVENANCE_MAX_HISTORY_ENTRIES",
            &mut limits.max_history_entries,
        );

        if let Some(raw) = lookup("PROVENANCE_PUBLISH_EVENTS") {
            config.publish_events = raw.to_lowercase() != "false" && raw != "0";
        }

        config
    }

    /// Validate the configuration before starting a service.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()
    }

    /// Builder-style method to set the limits.
    #[must_use]
    pub fn with_limits(mut self, limits: LedgerLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Builder-style method to toggle event publication.
    #[must_use]
    pub fn with_publish_events(mut self, publish: bool) -> Self {
        self.publish_events = publish;
        self
    }
}

fn override_usize<F>(lookup: &F, key: &str, slot: &mut usize)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *slot = value,
            Err(_) => warn!(key, value = %raw, "Ignoring unparsable configuration override"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
