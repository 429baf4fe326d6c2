//! Reward discovery: which eras does each wallet still have to claim.

use std::collections::BTreeSet;

use payout_chain::{ChainClient, ChainError};
use payout_types::{EraIndex, Staker, StakerRewards};
use tracing::{debug, info};

use crate::ClaimError;

/// Queries the chain for every staker's unclaimed reward eras.
///
/// Two RPC round-trips total: one for the claimable-era window, one batched
/// multi-wallet reward query. The result is index-aligned with `stakers`.
/// Zero-value era records are retained; they are valid claims, not noise.
/// Any chain failure aborts the whole fetch with no partial results.
pub async fn fetch_rewards<C>(
    client: &C,
    stakers: Vec<Staker>,
) -> Result<Vec<StakerRewards>, ClaimError>
where
    C: ChainClient + ?Sized,
{
    if stakers.is_empty() {
        return Ok(Vec::new());
    }

    let eras = client
        .historic_eras()
        .await
        .map_err(ClaimError::ChainUnavailable)?;
    debug!(n_eras = eras.len(), "claimable era window");

    let wallets: Vec<_> = stakers.iter().map(|s| s.wallet.clone()).collect();
    let per_wallet = client
        .staker_rewards(wallets, eras)
        .await
        .map_err(ClaimError::RewardQueryFailed)?;

    if per_wallet.len() != stakers.len() {
        return Err(ClaimError::RewardQueryFailed(ChainError::Rpc(format!(
            "reward response misaligned: {} wallets, {} records",
            stakers.len(),
            per_wallet.len()
        ))));
    }

    let snapshots: Vec<StakerRewards> = stakers
        .into_iter()
        .zip(per_wallet)
        .map(|(staker, records)| {
            let mut snapshot = StakerRewards::empty(staker);
            snapshot.rewards.extend(records);
            snapshot
        })
        .collect();

    let rewarded = snapshots.iter().filter(|s| s.has_rewards()).count();
    let eras_to_claim: BTreeSet<EraIndex> = snapshots
        .iter()
        .flat_map(|s| s.rewards.keys().copied())
        .collect();
    info!(
        rewarded,
        total = snapshots.len(),
        ?eras_to_claim,
        "gathered staker rewards"
    );
    for snapshot in snapshots.iter().filter(|s| s.has_rewards()) {
        debug!(
            who = snapshot.staker.display_name(),
            wallet = %snapshot.staker.wallet,
            available = %snapshot.available(),
            "claimable"
        );
    }

    Ok(snapshots)
}
