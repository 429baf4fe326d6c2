//! Per-cycle claim configuration.

use payout_types::{ClaimFrequency, Staker};
use serde::{Deserialize, Serialize};

use crate::ClaimError;

/// Default number of payout calls wrapped into one batch transaction.
pub const DEFAULT_BATCH_SIZE: usize = 8;

/// Where to fetch external (non chat-user) claim wallets from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalFeedConfig {
    /// Feed endpoint URL.
    pub endpoint: String,
    /// Pre-shared key sent with the fetch.
    pub auth_key: String,
}

/// Immutable configuration for one claim cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimConfig {
    /// Which subscriptions this cycle covers. Used only as the repository
    /// filter; the scheduling itself lives outside the engine.
    pub frequency: ClaimFrequency,

    /// Upper bound on payout calls per batch transaction.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Price everything but broadcast nothing.
    #[serde(default)]
    pub dry_run: bool,

    /// Explicit staker list for ad-hoc claims. When set, repository and
    /// external-feed lookups are skipped entirely.
    #[serde(default)]
    pub stakers: Option<Vec<Staker>>,

    /// Optional external feed of additional claim wallets.
    #[serde(default)]
    pub external_feed: Option<ExternalFeedConfig>,
}

impl ClaimConfig {
    /// Config for a scheduled cycle with defaults for everything else.
    pub fn new(frequency: ClaimFrequency) -> Self {
        Self {
            frequency,
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
            stakers: None,
            external_feed: None,
        }
    }

    /// Rejects configurations a cycle cannot run with.
    pub fn validate(&self) -> Result<(), ClaimError> {
        if self.batch_size == 0 {
            return Err(ClaimError::Configuration(
                "batch_size must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
