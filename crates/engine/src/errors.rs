//! Claim cycle error taxonomy.
//!
//! Only failures that happen before any on-chain write are errors here;
//! per-batch submission failures are data (membership in the failure set)
//! and never abort sibling batches.

use payout_chain::ChainError;
use thiserror::Error;

/// Fatal claim-cycle errors.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// The cycle configuration is unusable; the cycle never starts.
    #[error("invalid claim configuration: {0}")]
    Configuration(String),

    /// The staker repository or external feed could not produce the
    /// wallet list.
    #[error("staker source failed: {0}")]
    StakerSource(String),

    /// Connecting to the chain or querying the claimable-era window failed.
    /// Retried by the next scheduled trigger, not within the cycle.
    #[error("chain unavailable")]
    ChainUnavailable(#[source] ChainError),

    /// The multi-wallet reward query failed; the cycle aborts before any
    /// transaction is built, so nothing needs rolling back.
    #[error("reward query failed")]
    RewardQueryFailed(#[source] ChainError),
}
