//! Projection of batch results into per-user notification events.

use std::collections::BTreeMap;

use async_trait::async_trait;
use payout_types::{
    AdminLog, Address, BotKind, ClaimEvent, ClaimFrequency, EraClaim, StakerNotify,
};
use tracing::debug;

/// Outbound event publication. Delivery to chat platforms is entirely the
/// subscriber's concern; the engine is done once `publish_*` returns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publishes one per-user claim outcome event.
    async fn publish_claim(&self, event: ClaimEvent);

    /// Publishes operator-facing log lines.
    async fn publish_admin(&self, log: AdminLog);
}

/// Claim results grouped bot → user → wallet, ready for per-user fan-out.
pub type NotifyMap = BTreeMap<BotKind, BTreeMap<String, BTreeMap<Address, Vec<StakerNotify>>>>;

/// Projects claim units into the per-user notification grouping.
///
/// One [`StakerNotify`] per (unit, claimant): the payout is read back from
/// the claimant's own reward record for the unit's era, and the unit's fee
/// is divided evenly among its claimants. External-feed claimants (the
/// sentinel user id) receive no notification and are skipped here.
pub fn project_notifications(units: &[EraClaim]) -> NotifyMap {
    let mut map = NotifyMap::new();

    for unit in units {
        let fee_share = unit.claimant_fee_share();
        for claimant in &unit.claimants {
            if claimant.staker.is_external() {
                continue;
            }
            let Some(record) = claimant.rewards.get(&unit.era) else {
                // claimant was grouped into this unit, so its era record
                // must exist; tolerate a gap rather than panic mid-cycle
                debug!(era = unit.era, wallet = %claimant.staker.wallet, "missing era record");
                continue;
            };
            let bot = claimant.staker.bot.unwrap_or(BotKind::Discord);
            map.entry(bot)
                .or_default()
                .entry(claimant.staker.user_id.clone())
                .or_default()
                .entry(claimant.staker.wallet.clone())
                .or_default()
                .push(StakerNotify {
                    era: unit.era,
                    wallet: claimant.staker.wallet.clone(),
                    alias: claimant.staker.alias.clone(),
                    payout: record.available(),
                    fee_share,
                    is_validator: record.is_validator,
                    validators: record.validators.clone(),
                });
        }
    }

    map
}

/// Publishes projected results.
///
/// Fulfilled claims fan out as one [`ClaimEvent`] per (bot, user) — not per
/// wallet, so a user with several claimed wallets gets one consolidated
/// event. Failed claims are an operator concern: they are rendered through
/// the same per-user grouping but published to the admin log only, never
/// to the claimants.
///
/// Returns the number of user events published.
pub async fn publish_results<B>(
    bus: &B,
    frequency: ClaimFrequency,
    fulfilled: NotifyMap,
    failed: NotifyMap,
    price_usd: Option<f64>,
) -> usize
where
    B: EventBus + ?Sized,
{
    let mut published = 0;

    for (bot, users) in fulfilled {
        for (user_id, wallets) in users {
            let event = ClaimEvent {
                bot,
                user_id,
                success: true,
                frequency,
                wallets,
            };
            bus.publish_claim(event).await;
            published += 1;
        }
    }

    for (bot, users) in failed {
        for (user_id, wallets) in users {
            let event = ClaimEvent {
                bot,
                user_id: user_id.clone(),
                success: false,
                frequency,
                wallets,
            };
            let mut lines = vec![format!("claim failure for {bot} user {user_id}:")];
            lines.extend(event.summary_lines(price_usd));
            bus.publish_admin(AdminLog(lines)).await;
        }
    }

    published
}
