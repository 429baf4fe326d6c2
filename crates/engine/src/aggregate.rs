//! Claim aggregation: per-wallet rewards into deduplicated claim units.

use std::collections::HashMap;

use payout_types::{Address, EraClaim, EraIndex, StakerRewards};
use tracing::debug;

/// Builds the cycle's claim pool.
///
/// Single pass over every (staker, era) reward record into one map keyed
/// by the composite (era, validator) pair, then a flattening step. The
/// dedup invariant: exactly one [`EraClaim`] exists per distinct pair, no
/// matter how many stakers share it, so no payout call is issued twice.
///
/// Grouping uses each record's first validator only (see
/// [`payout_types::EraReward::primary_validator`]); an era record with no
/// validator entries produces no unit.
pub fn build_claim_pool(rewards: &[StakerRewards]) -> Vec<EraClaim> {
    let mut pool: HashMap<(EraIndex, Address), EraClaim> = HashMap::new();

    for snapshot in rewards {
        for (&era, record) in &snapshot.rewards {
            let Some(validator) = record.primary_validator() else {
                continue;
            };
            pool.entry((era, validator.clone()))
                .or_insert_with(|| EraClaim::new(era, validator.clone()))
                .claimants
                .push(snapshot.clone());
        }
    }

    let mut units: Vec<EraClaim> = pool.into_values().collect();
    // deterministic submission order; correctness only needs uniqueness
    units.sort_by(|a, b| (a.era, &a.validator).cmp(&(b.era, &b.validator)));
    debug!(n_units = units.len(), "claim pool built");
    units
}
