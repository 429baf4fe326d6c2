//! Chain capability surface for the payout claim engine.
//!
//! The engine never speaks to an RPC endpoint directly; everything it needs
//! from the chain is expressed through the [`ChainClient`] trait so cycles
//! can run against any backend (or a mock in tests).

mod client;
mod error;
mod price;
mod signer;

pub use client::{BatchTx, ChainClient, FinalizationResult, PayoutCall};
pub use error::ChainError;
pub use price::{PriceCache, PriceOracle};
pub use signer::SigningKey;

#[cfg(any(test, feature = "test-utils"))]
pub use client::MockChainClient;
#[cfg(any(test, feature = "test-utils"))]
pub use price::MockPriceOracle;
