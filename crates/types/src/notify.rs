//! Notification payloads published at the end of a claim cycle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Address, Balance, BotKind, ClaimFrequency, EraIndex, ValidatorReward};

/// One claimed era for one (user, wallet), as surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakerNotify {
    /// The era that was paid out.
    pub era: EraIndex,
    /// The wallet the payout went to.
    pub wallet: Address,
    /// Friendly wallet name, if the user set one.
    pub alias: Option<String>,
    /// Amount paid to the wallet for this era.
    pub payout: Balance,
    /// This claimant's even share of the claim unit's fee.
    pub fee_share: Balance,
    /// Whether the wallet earned as a validator (vs. nominator).
    pub is_validator: bool,
    /// The validators that paid the wallet in this era.
    pub validators: Vec<ValidatorReward>,
}

/// A per-user claim outcome event, one per (bot, user) per cycle.
///
/// Carries every claimed wallet of that user so the subscriber can render
/// one consolidated message. Delivery is the subscriber's concern; the
/// engine's responsibility ends at publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimEvent {
    /// Platform the user subscribed from.
    pub bot: BotKind,
    /// The user to notify.
    pub user_id: String,
    /// Whether the claims in this event succeeded or failed.
    pub success: bool,
    /// Frequency tag of the cycle that produced the event.
    pub frequency: ClaimFrequency,
    /// Claimed eras grouped by wallet.
    pub wallets: BTreeMap<Address, Vec<StakerNotify>>,
}

impl ClaimEvent {
    /// Total payout across all wallets and eras in the event.
    pub fn total_payout(&self) -> Balance {
        self.wallets
            .values()
            .flatten()
            .map(|n| n.payout)
            .sum()
    }

    /// Total fee shares attributed to this user.
    pub fn total_fees(&self) -> Balance {
        self.wallets
            .values()
            .flatten()
            .map(|n| n.fee_share)
            .sum()
    }

    /// Number of distinct eras claimed across the event's wallets.
    pub fn era_count(&self) -> usize {
        let mut eras: Vec<EraIndex> = self.wallets.values().flatten().map(|n| n.era).collect();
        eras.sort_unstable();
        eras.dedup();
        eras.len()
    }

    /// Human-readable summary rows for the event payload.
    ///
    /// USD amounts are appended only when a price is available.
    pub fn summary_lines(&self, price_usd: Option<f64>) -> Vec<String> {
        let total = self.total_payout();
        let mut lines = Vec::new();
        let header = if self.success {
            format!(
                "Claimed rewards {} for {} era(s) / {} wallet(s)",
                display_amount(total, price_usd),
                self.era_count(),
                self.wallets.len(),
            )
        } else {
            format!(
                "Failed to claim rewards for {} era(s) / {} wallet(s)",
                self.era_count(),
                self.wallets.len(),
            )
        };
        lines.push(header);

        for (wallet, claims) in &self.wallets {
            let alias = claims.iter().find_map(|c| c.alias.clone());
            match alias {
                Some(alias) => lines.push(format!("{alias} / {wallet}:")),
                None => lines.push(format!("{wallet}:")),
            }
            for claim in claims {
                let role = if claim.is_validator {
                    "as validator".to_owned()
                } else {
                    let vals: Vec<&str> = claim
                        .validators
                        .iter()
                        .map(|v| v.validator.as_str())
                        .collect();
                    format!("as nominator of {}", vals.join(", "))
                };
                lines.push(format!(
                    "  Era {}: {} {role}",
                    claim.era,
                    display_amount(claim.payout, price_usd),
                ));
            }
        }

        let fees = self.total_fees();
        if !fees.is_zero() {
            lines.push(format!("This claim used {} in fees", display_amount(fees, price_usd)));
        }

        lines
    }
}

/// Lines routed to the operator channel (cycle summaries, batch failures).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminLog(pub Vec<String>);

fn display_amount(amount: Balance, price_usd: Option<f64>) -> String {
    match price_usd {
        Some(price) => format!("{amount} ({})", amount.display_usd(price)),
        None => amount.to_string(),
    }
}
