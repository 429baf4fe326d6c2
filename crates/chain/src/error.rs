//! Chain capability errors.

use thiserror::Error;

/// Errors surfaced by a [`crate::ChainClient`] backend or key handling.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Could not reach or stay connected to the chain endpoint.
    #[error("chain endpoint unavailable: {0}")]
    Connect(String),

    /// An RPC query failed after the connection was established.
    #[error("rpc query failed: {0}")]
    Rpc(String),

    /// Fee estimation for a batch transaction failed.
    #[error("fee quote failed: {0}")]
    FeeQuote(String),

    /// Broadcasting or finality tracking of a transaction failed.
    #[error("submission failed: {0}")]
    Submission(String),

    /// The signing keystore could not be decrypted.
    #[error("keystore locked: {0}")]
    KeystoreLocked(String),
}
