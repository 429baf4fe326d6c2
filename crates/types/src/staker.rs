//! Subscription records and claim scheduling tags.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Address;

/// User id carried by stakers sourced from the external web feed.
///
/// Feed claimants are not registered chat users; the notification stage
/// recognizes this sentinel and skips them.
pub const EXTERNAL_SENTINEL: &str = "external";

/// The chat platform a subscription belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotKind {
    Discord,
    Telegram,
}

impl fmt::Display for BotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotKind::Discord => write!(f, "discord"),
            BotKind::Telegram => write!(f, "telegram"),
        }
    }
}

/// How often a subscription wants its rewards claimed.
///
/// `Now` is the ad-hoc trigger used by manual claims; when used as a
/// repository filter it matches subscriptions of every frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimFrequency {
    Daily,
    Weekly,
    Now,
}

impl ClaimFrequency {
    /// Whether a subscription with frequency `other` is due under `self`.
    pub fn matches(&self, other: ClaimFrequency) -> bool {
        *self == ClaimFrequency::Now || *self == other
    }
}

impl fmt::Display for ClaimFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimFrequency::Daily => write!(f, "daily"),
            ClaimFrequency::Weekly => write!(f, "weekly"),
            ClaimFrequency::Now => write!(f, "now"),
        }
    }
}

/// A subscription record: who claims on behalf of which wallet.
///
/// Read-only to the engine; created by the chat-platform subscription
/// commands or synthesized from the external feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staker {
    /// Chat-platform user id, or [`EXTERNAL_SENTINEL`] for feed claimants.
    pub user_id: String,
    /// The stake-holding wallet to claim for.
    pub wallet: Address,
    /// Friendly wallet name chosen by the user.
    pub alias: Option<String>,
    /// Platform the user subscribed from, if known.
    pub bot: Option<BotKind>,
}

impl Staker {
    /// Creates a record for a chat-platform subscription.
    pub fn new(user_id: impl Into<String>, wallet: impl Into<Address>) -> Self {
        Self {
            user_id: user_id.into(),
            wallet: wallet.into(),
            alias: None,
            bot: None,
        }
    }

    /// Creates a record for a wallet pulled from the external feed.
    pub fn external(wallet: impl Into<Address>, tag: impl Into<String>) -> Self {
        Self {
            user_id: EXTERNAL_SENTINEL.to_owned(),
            wallet: wallet.into(),
            alias: Some(tag.into()),
            bot: None,
        }
    }

    /// Whether this staker came from the external feed.
    pub fn is_external(&self) -> bool {
        self.user_id == EXTERNAL_SENTINEL
    }

    /// Alias if set, otherwise the wallet address.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.wallet)
    }
}
