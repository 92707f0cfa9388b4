//! TokenFarm: the staking reward engine.
//!
//! Stakers deposit a stakeable token and accrue a reward token in proportion
//! to their share of the pool, per elapsed block:
//! `reward = rate × elapsed × stake / total_staked`
//!
//! This crate handles:
//! - The balance ledger (deposit, full withdraw)
//! - Block-based accrual and per-account checkpoints (settlement)
//! - Bulk distribution across every known staker, and claims
//! - Persistence of pool state through a `FarmStore`
//!
//! Every public operation settles before it mutates stake, and commits nothing
//! unless the asset transfer it depends on succeeds.

pub mod accrual;
pub mod config;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod state;

pub use accrual::{accrued_reward, settle};
pub use config::FarmConfig;
pub use distribution::DistributionReport;
pub use engine::TokenFarm;
pub use error::FarmError;
pub use events::{EventBus, FarmEvent};
pub use state::{PoolState, UserAccount};
