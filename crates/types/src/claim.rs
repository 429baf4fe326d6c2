//! Claim units and batch outcomes.

use serde::{Deserialize, Serialize};

use crate::{Address, Balance, ClaimFrequency, EraIndex, StakerRewards};

/// The atomic unit of on-chain work: one validator's payout for one era.
///
/// Exactly one `EraClaim` exists per distinct (era, validator) pair within
/// a cycle; `claimants` lists every staker entitled to a share of the
/// notification for that payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraClaim {
    /// The era being paid out.
    pub era: EraIndex,
    /// The validator whose era payout is claimed.
    pub validator: Address,
    /// Stakers whose wallets earned from this (era, validator).
    pub claimants: Vec<StakerRewards>,
    /// This unit's even share of its batch fee, known after pricing.
    pub fee: Option<Balance>,
}

impl EraClaim {
    /// New unpriced claim unit.
    pub fn new(era: EraIndex, validator: impl Into<Address>) -> Self {
        Self {
            era,
            validator: validator.into(),
            claimants: Vec::new(),
            fee: None,
        }
    }

    /// Attaches the unit's share of the batch fee.
    pub fn with_fee(mut self, fee: Balance) -> Self {
        self.fee = Some(fee);
        self
    }

    /// Per-claimant share of this unit's fee.
    pub fn claimant_fee_share(&self) -> Balance {
        self.fee
            .unwrap_or(Balance::ZERO)
            .split_evenly(self.claimants.len())
    }
}

/// Lifecycle of one batch inside the submitter.
///
/// `Pending → Priced → {Submitted | DryRunSkipped} → {Fulfilled | Failed}`.
/// Tracked for logging; the public outcome is membership in the fulfilled
/// or failed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    /// Calls built, fee not yet quoted.
    Pending,
    /// Fee quote obtained.
    Priced,
    /// Broadcast, awaiting finality.
    Submitted,
    /// Dry-run mode: priced but never broadcast.
    DryRunSkipped,
    /// Finalized (or dry-run complete) with fee attached.
    Fulfilled,
    /// Pricing or submission failed; all units moved to the failure set.
    Failed,
}

/// End-of-cycle counts, published with the admin summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSummary {
    /// Frequency tag the cycle ran under.
    pub frequency: ClaimFrequency,
    /// Stakers resolved for the cycle.
    pub stakers: usize,
    /// Deduplicated (era, validator) claim units attempted.
    pub units: usize,
    /// Units whose batch finalized (or dry-ran) successfully.
    pub fulfilled: usize,
    /// Units whose batch failed to price or submit.
    pub failed: usize,
    /// Claim wallet balance after the cycle, when the query succeeded.
    pub claim_wallet_balance: Option<Balance>,
}
