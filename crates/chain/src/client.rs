//! The chain client capability trait and its transaction types.

use async_trait::async_trait;
use payout_types::{Address, Balance, EraIndex, EraReward};

use crate::{ChainError, SigningKey};

/// One `payout_stakers(validator, era)` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutCall {
    /// Validator whose era payout is distributed.
    pub validator: Address,
    /// Era to pay out.
    pub era: EraIndex,
}

/// An atomic batch transaction wrapping several payout calls.
///
/// All-or-nothing: either every wrapped call executes or none do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchTx {
    calls: Vec<PayoutCall>,
}

impl BatchTx {
    /// Wraps calls into one atomic transaction.
    pub fn new(calls: Vec<PayoutCall>) -> Self {
        Self { calls }
    }

    /// The wrapped calls, in submission order.
    pub fn calls(&self) -> &[PayoutCall] {
        &self.calls
    }

    /// Number of wrapped calls.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Whether the batch wraps no calls.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

/// Outcome of a submission once the transaction reached finality.
///
/// Finality, not mere block inclusion, is the completion signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizationResult {
    /// Hash of the finalized block containing the transaction.
    pub finalized_block: String,
}

/// Capability needed from a chain backend to run claim cycles.
///
/// Calls have no internal timeout; a hung endpoint will hang the calling
/// cycle. Backends must tolerate concurrent use by independent cycles.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The eras that are still claimable (the chain's history depth window).
    async fn historic_eras(&self) -> Result<Vec<EraIndex>, ChainError>;

    /// Unclaimed reward records per wallet across the given eras.
    ///
    /// One batched query for all wallets; the result is index-aligned with
    /// `wallets`. A wallet with nothing to claim yields an empty list.
    async fn staker_rewards(
        &self,
        wallets: Vec<Address>,
        eras: Vec<EraIndex>,
    ) -> Result<Vec<Vec<(EraIndex, EraReward)>>, ChainError>;

    /// Free balance of an account.
    async fn free_balance(&self, address: Address) -> Result<Balance, ChainError>;

    /// Quotes the fee for signing and submitting `tx` with `key`.
    async fn quote_fee(&self, tx: &BatchTx, key: &SigningKey) -> Result<Balance, ChainError>;

    /// Signs, broadcasts and awaits finality of `tx`.
    async fn submit_and_finalize(
        &self,
        tx: &BatchTx,
        key: &SigningKey,
    ) -> Result<FinalizationResult, ChainError>;

    /// Releases the underlying connection.
    ///
    /// Called at the end of every cycle on all exit paths.
    async fn disconnect(&self);
}
