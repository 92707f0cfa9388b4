//! Events emitted by the farm after an operation commits.

use serde::{Deserialize, Serialize};
use tokenfarm_types::AccountId;

/// Observable farm events. Field order is part of the contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FarmEvent {
    /// `amount` of the staking token was deposited by `account`.
    DepositSucceeded { account: AccountId, amount: u128 },
    /// `account`'s whole stake (`amount`) was returned.
    WithdrawSucceeded { account: AccountId, amount: u128 },
    /// `amount` of the reward token was paid to `account`.
    ClaimSucceeded { account: AccountId, amount: u128 },
    /// One bulk settlement pass over every known staker completed.
    RewardsDistributed,
}

impl FarmEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DepositSucceeded { .. } => "DepositSucceeded",
            Self::WithdrawSucceeded { .. } => "WithdrawSucceeded",
            Self::ClaimSucceeded { .. } => "ClaimSucceeded",
            Self::RewardsDistributed => "RewardsDistributed",
        }
    }
}

/// Synchronous fan-out event bus.
///
/// Listeners run inline on the calling thread, after state is committed.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&FarmEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&FarmEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &FarmEvent) {
        tracing::debug!(event = event.name(), listeners = self.listeners.len(), "emit");
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
