//! Batch construction and submission of claim units.

use payout_chain::{BatchTx, ChainClient, PayoutCall, SigningKey};
use payout_types::{Balance, BatchPhase, EraClaim};
use tracing::{debug, info, warn};

use crate::ClaimConfig;

/// Submits claim units in size-bounded atomic batches.
///
/// Chunks follow the input order of `units`; no reordering for packing.
/// Per chunk: one payout call per unit, wrapped in one atomic batch
/// transaction, fee-quoted, then signed and broadcast (awaiting finality)
/// unless `cfg.dry_run` is set, in which case the chunk is fulfilled with
/// the quoted fee attached but nothing reaches the network.
///
/// Failures are isolated per chunk: a pricing or submission error moves
/// the whole chunk to the failure set and the loop continues with the next
/// chunk. Every input unit ends up in exactly one of the two output sets.
pub async fn submit_claims<C>(
    client: &C,
    key: &SigningKey,
    units: Vec<EraClaim>,
    cfg: &ClaimConfig,
) -> (Vec<EraClaim>, Vec<EraClaim>)
where
    C: ChainClient + ?Sized,
{
    let mut fulfilled = Vec::new();
    let mut failed = Vec::new();

    for chunk in units.chunks(cfg.batch_size.max(1)) {
        match submit_chunk(client, key, chunk, cfg.dry_run).await {
            Ok(fee_per_unit) => {
                fulfilled.extend(chunk.iter().cloned().map(|u| u.with_fee(fee_per_unit)));
            }
            Err(phase) => {
                warn!(n_units = chunk.len(), ?phase, "batch failed, continuing with next");
                failed.extend(chunk.iter().cloned());
            }
        }
    }

    info!(
        fulfilled = fulfilled.len(),
        failed = failed.len(),
        "claim submission finished"
    );
    (fulfilled, failed)
}

/// Prices and (unless dry-running) submits one chunk.
///
/// Returns the even per-unit fee share on success, or the phase the chunk
/// failed in.
async fn submit_chunk<C>(
    client: &C,
    key: &SigningKey,
    chunk: &[EraClaim],
    dry_run: bool,
) -> Result<Balance, BatchPhase>
where
    C: ChainClient + ?Sized,
{
    let mut phase = BatchPhase::Pending;

    let calls: Vec<PayoutCall> = chunk
        .iter()
        .map(|unit| {
            debug!(
                era = unit.era,
                validator = %unit.validator,
                claimants = unit.claimants.len(),
                "adding payout call"
            );
            PayoutCall {
                validator: unit.validator.clone(),
                era: unit.era,
            }
        })
        .collect();
    let tx = BatchTx::new(calls);

    let quoted = match client.quote_fee(&tx, key).await {
        Ok(fee) => fee,
        Err(e) => {
            warn!(err = %e, "fee quote failed");
            return Err(phase);
        }
    };
    phase = BatchPhase::Priced;
    debug!(n_calls = tx.len(), fee = %quoted, "batch priced");

    if dry_run {
        phase = BatchPhase::DryRunSkipped;
        info!(n_calls = tx.len(), fee = %quoted, "dry run, not broadcasting");
    } else {
        match client.submit_and_finalize(&tx, key).await {
            Ok(result) => {
                phase = BatchPhase::Submitted;
                info!(
                    n_calls = tx.len(),
                    finalized_block = %result.finalized_block,
                    "batch finalized"
                );
            }
            Err(e) => {
                warn!(err = %e, ?phase, "batch submission failed");
                return Err(phase);
            }
        }
    }

    debug!(from = ?phase, to = ?BatchPhase::Fulfilled, "batch complete");
    Ok(quoted.split_evenly(chunk.len()))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use payout_chain::{ChainError, FinalizationResult, MockChainClient};
    use payout_types::ClaimFrequency;
    use proptest::prelude::*;

    use super::*;

    fn unit(era: u32, validator: &str) -> EraClaim {
        EraClaim::new(era, validator)
    }

    fn units(n: usize) -> Vec<EraClaim> {
        (0..n).map(|i| unit(100 + i as u32, "V1")).collect()
    }

    fn key() -> SigningKey {
        SigningKey::from_keystore(r#"{"address": "5Claim", "encoded": "material"}"#, "pw")
            .unwrap()
    }

    fn cfg(batch_size: usize, dry_run: bool) -> ClaimConfig {
        let mut cfg = ClaimConfig::new(ClaimFrequency::Daily);
        cfg.batch_size = batch_size;
        cfg.dry_run = dry_run;
        cfg
    }

    fn happy_client(observed: Arc<Mutex<Vec<usize>>>) -> MockChainClient {
        let mut client = MockChainClient::new();
        let sizes = observed.clone();
        client.expect_quote_fee().returning(move |tx, _| {
            sizes.lock().unwrap().push(tx.len());
            Ok(Balance::from_units(100))
        });
        client
            .expect_submit_and_finalize()
            .returning(|_, _| {
                Ok(FinalizationResult {
                    finalized_block: "0xfinal".to_owned(),
                })
            });
        client
    }

    #[tokio::test]
    async fn test_chunks_follow_input_order_and_bound() {
        // scenario: 5 units, batch_size 2 -> chunks of [2, 2, 1]
        let observed = Arc::new(Mutex::new(Vec::new()));
        let client = happy_client(observed.clone());

        let (fulfilled, failed) = submit_claims(&client, &key(), units(5), &cfg(2, false)).await;

        assert_eq!(observed.lock().unwrap().as_slice(), &[2, 2, 1]);
        assert_eq!(fulfilled.len(), 5);
        assert!(failed.is_empty());
        // input order preserved across chunks
        let eras: Vec<u32> = fulfilled.iter().map(|u| u.era).collect();
        assert_eq!(eras, [100, 101, 102, 103, 104]);
    }

    #[tokio::test]
    async fn test_fee_divided_evenly_across_chunk() {
        let observed = Arc::new(Mutex::new(Vec::new()));
        let client = happy_client(observed);

        let (fulfilled, _) = submit_claims(&client, &key(), units(4), &cfg(4, false)).await;

        // 100 quoted over 4 units
        for u in &fulfilled {
            assert_eq!(u.fee, Some(Balance::from_units(25)));
        }
        let total: Balance = fulfilled.iter().filter_map(|u| u.fee).sum();
        assert_eq!(total, Balance::from_units(100));
    }

    #[tokio::test]
    async fn test_fee_division_rounding_tolerance() {
        let observed = Arc::new(Mutex::new(Vec::new()));
        let client = happy_client(observed);

        let (fulfilled, _) = submit_claims(&client, &key(), units(3), &cfg(3, false)).await;

        let total: u128 = fulfilled.iter().filter_map(|u| u.fee).map(|f| f.units()).sum();
        // floor division may under-report by at most one unit per share
        assert!(total <= 100 && total >= 100 - 3);
    }

    #[tokio::test]
    async fn test_dry_run_prices_but_never_broadcasts() {
        let mut client = MockChainClient::new();
        client
            .expect_quote_fee()
            .returning(|_, _| Ok(Balance::from_units(10)));
        client.expect_submit_and_finalize().times(0);

        let (fulfilled, failed) = submit_claims(&client, &key(), units(2), &cfg(2, true)).await;

        assert!(failed.is_empty());
        assert_eq!(fulfilled.len(), 2);
        for u in &fulfilled {
            assert_eq!(u.fee, Some(Balance::from_units(5)));
        }
    }

    #[tokio::test]
    async fn test_failed_chunk_does_not_abort_later_chunks() {
        // scenario: 2 chunks, first submission throws, second succeeds
        let mut client = MockChainClient::new();
        client
            .expect_quote_fee()
            .returning(|_, _| Ok(Balance::from_units(10)));
        let mut first = true;
        client.expect_submit_and_finalize().returning(move |_, _| {
            if first {
                first = false;
                Err(ChainError::Submission("dropped".to_owned()))
            } else {
                Ok(FinalizationResult {
                    finalized_block: "0xfinal".to_owned(),
                })
            }
        });

        let (fulfilled, failed) = submit_claims(&client, &key(), units(4), &cfg(2, false)).await;

        let failed_eras: Vec<u32> = failed.iter().map(|u| u.era).collect();
        let fulfilled_eras: Vec<u32> = fulfilled.iter().map(|u| u.era).collect();
        assert_eq!(failed_eras, [100, 101]);
        assert_eq!(fulfilled_eras, [102, 103]);
    }

    #[tokio::test]
    async fn test_fee_quote_failure_fails_whole_chunk() {
        let mut client = MockChainClient::new();
        client
            .expect_quote_fee()
            .returning(|_, _| Err(ChainError::FeeQuote("no signer".to_owned())));
        client.expect_submit_and_finalize().times(0);

        let (fulfilled, failed) = submit_claims(&client, &key(), units(3), &cfg(10, false)).await;

        assert!(fulfilled.is_empty());
        assert_eq!(failed.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_input_produces_empty_sets() {
        // no expectations: any chain call would panic the mock
        let client = MockChainClient::new();
        let (fulfilled, failed) = submit_claims(&client, &key(), Vec::new(), &cfg(2, false)).await;
        assert!(fulfilled.is_empty());
        assert!(failed.is_empty());
    }

    proptest! {
        #[test]
        fn prop_every_unit_lands_in_exactly_one_set(
            n_units in 0usize..40,
            batch_size in 1usize..10,
            fail_mask in any::<u64>(),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            rt.block_on(async move {
                let sizes = Arc::new(Mutex::new(Vec::new()));
                let observed = sizes.clone();
                let mut client = MockChainClient::new();
                client.expect_quote_fee().returning(move |tx, _| {
                    observed.lock().unwrap().push(tx.len());
                    Ok(Balance::from_units(10))
                });
                let mut chunk_no = 0u64;
                client.expect_submit_and_finalize().returning(move |_, _| {
                    let fail = (fail_mask >> (chunk_no % 64)) & 1 == 1;
                    chunk_no += 1;
                    if fail {
                        Err(ChainError::Submission("flaky".to_owned()))
                    } else {
                        Ok(FinalizationResult {
                            finalized_block: "0xfinal".to_owned(),
                        })
                    }
                });

                let (fulfilled, failed) =
                    submit_claims(&client, &key(), units(n_units), &cfg(batch_size, false)).await;

                // coverage: nothing dropped, nothing duplicated
                assert_eq!(fulfilled.len() + failed.len(), n_units);
                let mut eras: Vec<u32> = fulfilled
                    .iter()
                    .chain(failed.iter())
                    .map(|u| u.era)
                    .collect();
                eras.sort_unstable();
                let expected: Vec<u32> = (0..n_units).map(|i| 100 + i as u32).collect();
                assert_eq!(eras, expected);

                // every fulfilled unit carries a fee
                assert!(fulfilled.iter().all(|u| u.fee.is_some()));

                // batch size bound held for every constructed chunk
                assert!(sizes.lock().unwrap().iter().all(|&s| s <= batch_size));
            });
        }
    }
}
