//! Reward-claiming aggregation and settlement engine.
//!
//! One claim cycle runs five stages in sequence:
//!
//! 1. [`resolve_stakers`] — which wallets to claim for;
//! 2. [`fetch_rewards`] — their unclaimed reward eras, in one batched query;
//! 3. [`build_claim_pool`] — deduplicated (era, validator) claim units;
//! 4. [`submit_claims`] — size-bounded atomic batch transactions;
//! 5. [`project_notifications`] / [`publish_results`] — per-user events.
//!
//! [`run_claim_cycle`] sequences the stages for one invocation. Cycles are
//! fully independent: nothing carries over in memory between invocations,
//! so an external scheduler may trigger them freely.

mod aggregate;
mod config;
mod errors;
mod notify;
mod rewards;
mod run;
mod source;
mod submit;

pub use aggregate::build_claim_pool;
pub use config::{ClaimConfig, ExternalFeedConfig, DEFAULT_BATCH_SIZE};
pub use errors::ClaimError;
pub use notify::{project_notifications, publish_results, EventBus, NotifyMap};
pub use rewards::fetch_rewards;
pub use run::run_claim_cycle;
pub use source::{
    resolve_stakers, ExternalStakerFeed, FeedWallet, NoExternalFeed, StakerRepository,
};
pub use submit::submit_claims;
