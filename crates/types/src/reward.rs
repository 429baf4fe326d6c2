//! Unclaimed reward snapshots discovered by the reward query stage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Address, Balance, Staker};

/// A discrete reward-settlement period on the chain.
pub type EraIndex = u32;

/// One validator's payout entry inside an era record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorReward {
    /// The validator that produced the payout.
    pub validator: Address,
    /// Total era payout of the validator's stake pool.
    pub total: Balance,
    /// The slice of the payout owed to this wallet.
    pub value: Balance,
}

/// The unclaimed reward a single wallet earned in a single era.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraReward {
    /// Whether the wallet earned this as a validator (vs. a nominator).
    pub is_validator: bool,
    /// Validators that paid the wallet in this era. Non-empty in practice;
    /// a zero-value entry is still claimable and is retained as-is.
    pub validators: Vec<ValidatorReward>,
}

impl EraReward {
    /// Sum of this wallet's payout values across the era's validators.
    pub fn available(&self) -> Balance {
        self.validators.iter().map(|v| v.value).sum()
    }

    /// Grouping key for claim aggregation.
    ///
    /// A nominator spreading stake across validators can in principle name
    /// several validators in one era record; claims group by the first one
    /// only, matching on-chain payout-call granularity as observed.
    pub fn primary_validator(&self) -> Option<&Address> {
        self.validators.first().map(|v| &v.validator)
    }
}

/// A staker together with every unclaimed era reward found for its wallet.
///
/// Ephemeral: exists only for the duration of one claim cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakerRewards {
    /// The subscription this snapshot was taken for.
    pub staker: Staker,
    /// Unclaimed rewards keyed by era.
    pub rewards: BTreeMap<EraIndex, EraReward>,
}

impl StakerRewards {
    /// Snapshot with no unclaimed rewards.
    pub fn empty(staker: Staker) -> Self {
        Self {
            staker,
            rewards: BTreeMap::new(),
        }
    }

    /// Total claimable across all eras, used for reporting only.
    pub fn available(&self) -> Balance {
        self.rewards.values().map(EraReward::available).sum()
    }

    /// Whether any era has an unclaimed reward record.
    pub fn has_rewards(&self) -> bool {
        !self.rewards.is_empty()
    }
}
