//! Coin price lookup with an explicit, injected TTL cache.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

/// External USD price source (e.g. an exchange API client).
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Current USD price of one coin, or a human-readable failure.
    async fn usd_price(&self) -> Result<f64, String>;
}

/// Caches the last successful oracle answer for a bounded time.
///
/// Owned by the orchestrator and passed to the stages that render USD
/// amounts. Price failures are non-fatal: callers get `None` and render
/// amounts without USD.
#[derive(Debug)]
pub struct PriceCache<O> {
    oracle: O,
    ttl: Duration,
    cached: Mutex<Option<(Instant, f64)>>,
}

impl<O: PriceOracle> PriceCache<O> {
    /// New cache around an oracle with the given refresh interval.
    pub fn new(oracle: O, ttl: Duration) -> Self {
        Self {
            oracle,
            ttl,
            cached: Mutex::new(None),
        }
    }

    /// Cached price if fresh, otherwise a refreshed one.
    ///
    /// On refresh failure the stale value (if any) is kept but not
    /// returned; the next call retries the oracle.
    pub async fn get_or_refresh(&self) -> Option<f64> {
        let mut cached = self.cached.lock().await;
        if let Some((at, price)) = *cached {
            if at.elapsed() < self.ttl {
                return Some(price);
            }
        }
        match self.oracle.usd_price().await {
            Ok(price) => {
                *cached = Some((Instant::now(), price));
                Some(price)
            }
            Err(e) => {
                warn!(err = %e, "price lookup failed, rendering without USD");
                None
            }
        }
    }
}
