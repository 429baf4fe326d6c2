//! One full claim cycle, from staker resolution to notification.

use payout_chain::{ChainClient, PriceCache, PriceOracle, SigningKey};
use payout_types::{AdminLog, ClaimSummary};
use tracing::{error, info};

use crate::{
    build_claim_pool, fetch_rewards, project_notifications, publish_results, resolve_stakers,
    submit_claims, ClaimConfig, ClaimError, EventBus, ExternalStakerFeed, StakerRepository,
};

/// Runs one claim cycle.
///
/// Stages run strictly in sequence; an error before submission aborts the
/// cycle cleanly (no on-chain action was taken, so nothing is notified).
/// Per-batch submission failures do not abort the cycle. The chain client
/// is disconnected on every exit path. Safe to invoke repeatedly; each
/// invocation is fully independent.
pub async fn run_claim_cycle<C, R, F, B, O>(
    cfg: &ClaimConfig,
    client: &C,
    key: &SigningKey,
    repo: &R,
    feed: Option<&F>,
    bus: &B,
    price: &PriceCache<O>,
) -> Result<ClaimSummary, ClaimError>
where
    C: ChainClient + ?Sized,
    R: StakerRepository + ?Sized,
    F: ExternalStakerFeed + ?Sized,
    B: EventBus + ?Sized,
    O: PriceOracle,
{
    let mut n_stakers = 0usize;
    let mut n_units = 0usize;

    let result = async {
        cfg.validate()?;

        let stakers = resolve_stakers(cfg, repo, feed).await?;
        n_stakers = stakers.len();
        if stakers.is_empty() {
            info!(frequency = %cfg.frequency, "no stakers for this cycle");
            return Ok(ClaimSummary {
                frequency: cfg.frequency,
                stakers: 0,
                units: 0,
                fulfilled: 0,
                failed: 0,
                claim_wallet_balance: None,
            });
        }

        let rewards = fetch_rewards(client, stakers).await?;
        let units = build_claim_pool(&rewards);
        n_units = units.len();
        info!(
            frequency = %cfg.frequency,
            n_stakers,
            n_units,
            dry_run = cfg.dry_run,
            "claim pool ready"
        );

        let (fulfilled, failed) = submit_claims(client, key, units, cfg).await;
        let summary = ClaimSummary {
            frequency: cfg.frequency,
            stakers: n_stakers,
            units: n_units,
            fulfilled: fulfilled.len(),
            failed: failed.len(),
            claim_wallet_balance: client.free_balance(key.address().clone()).await.ok(),
        };

        let price_usd = price.get_or_refresh().await;
        let published = publish_results(
            bus,
            cfg.frequency,
            project_notifications(&fulfilled),
            project_notifications(&failed),
            price_usd,
        )
        .await;
        bus.publish_admin(AdminLog(summary_lines(&summary, published)))
            .await;

        Ok(summary)
    }
    .await;

    // resource cleanup on all exit paths
    client.disconnect().await;

    match &result {
        Ok(summary) => info!(
            frequency = %summary.frequency,
            fulfilled = summary.fulfilled,
            failed = summary.failed,
            "claim cycle finished"
        ),
        Err(e) => error!(
            frequency = %cfg.frequency,
            n_stakers,
            n_units,
            err = %e,
            "claim cycle aborted"
        ),
    }

    result
}

fn summary_lines(summary: &ClaimSummary, published: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "{} claim cycle: {} staker(s), {} unit(s), {} fulfilled, {} failed, {} user event(s)",
        summary.frequency,
        summary.stakers,
        summary.units,
        summary.fulfilled,
        summary.failed,
        published,
    )];
    if let Some(balance) = summary.claim_wallet_balance {
        lines.push(format!("claim wallet balance remaining: {balance}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use payout_chain::{ChainError, FinalizationResult, MockChainClient, MockPriceOracle};
    use payout_types::{Balance, ClaimFrequency, EraReward, Staker, ValidatorReward};

    use super::*;
    use crate::{notify::MockEventBus, source::MockStakerRepository, NoExternalFeed};

    fn key() -> SigningKey {
        SigningKey::from_keystore(r#"{"address": "5Claim", "encoded": "material"}"#, "pw")
            .unwrap()
    }

    fn price_cache() -> PriceCache<MockPriceOracle> {
        let mut oracle = MockPriceOracle::new();
        oracle
            .expect_usd_price()
            .returning(|| Err("offline".to_owned()));
        PriceCache::new(oracle, Duration::from_secs(60))
    }

    fn era_reward(validator: &str, value: u128) -> EraReward {
        EraReward {
            is_validator: false,
            validators: vec![ValidatorReward {
                validator: validator.to_owned(),
                total: Balance::from_units(value * 10),
                value: Balance::from_units(value),
            }],
        }
    }

    #[tokio::test]
    async fn test_empty_cycle_publishes_nothing() {
        let cfg = ClaimConfig::new(ClaimFrequency::Daily);
        let mut repo = MockStakerRepository::new();
        repo.expect_subscribers().returning(|_| Ok(Vec::new()));

        let mut client = MockChainClient::new();
        client.expect_historic_eras().times(0);
        client.expect_disconnect().times(1).returning(|| ());

        let mut bus = MockEventBus::new();
        bus.expect_publish_claim().times(0);
        bus.expect_publish_admin().times(0);

        let summary = run_claim_cycle(
            &cfg,
            &client,
            &key(),
            &repo,
            None::<&NoExternalFeed>,
            &bus,
            &price_cache(),
        )
        .await
        .unwrap();

        assert_eq!(summary.stakers, 0);
        assert_eq!(summary.units, 0);
    }

    #[tokio::test]
    async fn test_two_nominators_one_validator_end_to_end() {
        // alice/W1 and bob/W2 both nominate V1; both have an unclaimed
        // reward in era 100
        let cfg = ClaimConfig::new(ClaimFrequency::Daily);

        let mut repo = MockStakerRepository::new();
        repo.expect_subscribers()
            .returning(|_| Ok(vec![Staker::new("alice", "W1"), Staker::new("bob", "W2")]));

        let mut client = MockChainClient::new();
        client.expect_historic_eras().returning(|| Ok(vec![100]));
        client.expect_staker_rewards().returning(|_, _| {
            Ok(vec![
                vec![(100, era_reward("V1", 40))],
                vec![(100, era_reward("V1", 2))],
            ])
        });
        // one unit -> one chunk -> one quote and one submission
        client
            .expect_quote_fee()
            .times(1)
            .withf(|tx, _| tx.len() == 1)
            .returning(|_, _| Ok(Balance::from_units(20)));
        client
            .expect_submit_and_finalize()
            .times(1)
            .returning(|_, _| {
                Ok(FinalizationResult {
                    finalized_block: "0xfinal".to_owned(),
                })
            });
        client
            .expect_free_balance()
            .returning(|_| Ok(Balance::from_coins(3)));
        client.expect_disconnect().times(1).returning(|| ());

        let mut bus = MockEventBus::new();
        // each user gets one event; the unit fee (20) splits across the two
        // claimants of the (100, V1) unit, 10 each
        bus.expect_publish_claim()
            .times(1)
            .withf(|ev| {
                ev.user_id == "alice"
                    && ev.success
                    && ev.wallets["W1"][0].era == 100
                    && ev.wallets["W1"][0].payout == Balance::from_units(40)
                    && ev.wallets["W1"][0].fee_share == Balance::from_units(10)
            })
            .returning(|_| ());
        bus.expect_publish_claim()
            .times(1)
            .withf(|ev| {
                ev.user_id == "bob"
                    && ev.wallets["W2"][0].payout == Balance::from_units(2)
                    && ev.wallets["W2"][0].fee_share == Balance::from_units(10)
            })
            .returning(|_| ());
        bus.expect_publish_admin()
            .times(1)
            .withf(|log| log.0[0].contains("1 fulfilled, 0 failed"))
            .returning(|_| ());

        let summary = run_claim_cycle(
            &cfg,
            &client,
            &key(),
            &repo,
            None::<&NoExternalFeed>,
            &bus,
            &price_cache(),
        )
        .await
        .unwrap();

        assert_eq!(summary.stakers, 2);
        assert_eq!(summary.units, 1);
        assert_eq!(summary.fulfilled, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.claim_wallet_balance, Some(Balance::from_coins(3)));
    }

    #[tokio::test]
    async fn test_reward_query_failure_aborts_but_disconnects() {
        let cfg = ClaimConfig::new(ClaimFrequency::Weekly);

        let mut repo = MockStakerRepository::new();
        repo.expect_subscribers()
            .returning(|_| Ok(vec![Staker::new("alice", "W1")]));

        let mut client = MockChainClient::new();
        client.expect_historic_eras().returning(|| Ok(vec![100]));
        client
            .expect_staker_rewards()
            .returning(|_, _| Err(ChainError::Rpc("boom".to_owned())));
        // nothing may be quoted or submitted after the failed query
        client.expect_quote_fee().times(0);
        client.expect_submit_and_finalize().times(0);
        client.expect_disconnect().times(1).returning(|| ());

        let mut bus = MockEventBus::new();
        bus.expect_publish_claim().times(0);
        bus.expect_publish_admin().times(0);

        let err = run_claim_cycle(
            &cfg,
            &client,
            &key(),
            &repo,
            None::<&NoExternalFeed>,
            &bus,
            &price_cache(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ClaimError::RewardQueryFailed(_)));
    }

    #[tokio::test]
    async fn test_invalid_config_never_touches_collaborators() {
        let mut cfg = ClaimConfig::new(ClaimFrequency::Daily);
        cfg.batch_size = 0;

        let repo = MockStakerRepository::new();
        let mut client = MockChainClient::new();
        client.expect_disconnect().times(1).returning(|| ());
        let bus = MockEventBus::new();

        let err = run_claim_cycle(
            &cfg,
            &client,
            &key(),
            &repo,
            None::<&NoExternalFeed>,
            &bus,
            &price_cache(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ClaimError::Configuration(_)));
    }
}
