//! Staker resolution: which wallets does this cycle claim for.

use async_trait::async_trait;
use payout_types::{Address, ClaimFrequency, Staker};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{ClaimConfig, ClaimError};

/// Read side of the subscription store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StakerRepository: Send + Sync {
    /// All subscriptions due under the given frequency.
    async fn subscribers(&self, frequency: ClaimFrequency) -> Result<Vec<Staker>, String>;
}

/// A wallet entry returned by the external feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedWallet {
    /// The stake-holding wallet to claim for.
    pub wallet: Address,
    /// Requester tag recorded by the feed (e.g. an IP), kept as the alias.
    pub tag: String,
}

/// Optional source of claim wallets outside the chat-platform repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExternalStakerFeed: Send + Sync {
    /// Fetches the feed's current wallet list.
    async fn fetch(&self, endpoint: &str, auth_key: &str) -> Result<Vec<FeedWallet>, String>;
}

/// Placeholder feed for deployments without an external wallet source.
#[derive(Debug, Clone, Copy)]
pub struct NoExternalFeed;

#[async_trait]
impl ExternalStakerFeed for NoExternalFeed {
    async fn fetch(&self, _endpoint: &str, _auth_key: &str) -> Result<Vec<FeedWallet>, String> {
        Ok(Vec::new())
    }
}

/// Resolves the staker list for one cycle.
///
/// An explicit `cfg.stakers` list (ad-hoc/manual claims) takes precedence
/// and skips both the repository and the feed. Otherwise subscriptions are
/// pulled by frequency and, if a feed is configured, feed wallets are
/// appended tagged with the external sentinel. Zero stakers is not an
/// error; downstream stages handle the empty list.
pub async fn resolve_stakers<R, F>(
    cfg: &ClaimConfig,
    repo: &R,
    feed: Option<&F>,
) -> Result<Vec<Staker>, ClaimError>
where
    R: StakerRepository + ?Sized,
    F: ExternalStakerFeed + ?Sized,
{
    if let Some(explicit) = &cfg.stakers {
        debug!(n = explicit.len(), "using explicit staker list");
        return Ok(explicit.clone());
    }

    let mut stakers = repo
        .subscribers(cfg.frequency)
        .await
        .map_err(ClaimError::StakerSource)?;
    debug!(frequency = %cfg.frequency, n = stakers.len(), "resolved subscribers");

    if let (Some(feed_cfg), Some(feed)) = (&cfg.external_feed, feed) {
        let wallets = feed
            .fetch(&feed_cfg.endpoint, &feed_cfg.auth_key)
            .await
            .map_err(ClaimError::StakerSource)?;
        debug!(n = wallets.len(), "fetched external feed wallets");
        stakers.extend(
            wallets
                .into_iter()
                .map(|w| Staker::external(w.wallet, w.tag)),
        );
    }

    info!(frequency = %cfg.frequency, n_stakers = stakers.len(), "staker list resolved");
    Ok(stakers)
}
