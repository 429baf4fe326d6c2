//! Core data types for the staking payout claim engine.
//!
//! Everything here is cycle-scoped: reward snapshots, claim units, batch
//! outcomes and notification payloads are built fresh each claim cycle and
//! discarded after the notification events are published.

mod balance;
mod claim;
mod notify;
mod reward;
mod staker;

pub use balance::{Balance, UNITS_PER_COIN};
pub use claim::{BatchPhase, ClaimSummary, EraClaim};
pub use notify::{AdminLog, ClaimEvent, StakerNotify};
pub use reward::{EraIndex, EraReward, StakerRewards, ValidatorReward};
pub use staker::{BotKind, ClaimFrequency, Staker, EXTERNAL_SENTINEL};

/// A chain address in its string (SS58-style) encoding.
///
/// The engine never inspects address structure, it only forwards addresses
/// between the repository, the chain client and the notification payloads.
pub type Address = String;
