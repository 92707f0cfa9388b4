//! Bulk distribution and claims.

use serde::{Deserialize, Serialize};
use tokenfarm_types::{AccountId, BlockNumber};

use crate::engine::{TokenFarm, STAT_CLAIMS, STAT_DISTRIBUTIONS};
use crate::error::FarmError;
use crate::events::FarmEvent;

/// Outcome of one [`TokenFarm::distribute_rewards_all`] pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionReport {
    /// The single block every account was settled at.
    pub block: BlockNumber,
    pub accounts_settled: usize,
    /// Sum credited to `pending_rewards` across all accounts in this pass.
    pub rewards_credited: u128,
}

impl TokenFarm {
    /// Settle every known staker at `now`. Moves no tokens.
    ///
    /// All accounts are settled against the same block and the same pool
    /// total. The pass is staged in full before anything is written; if any
    /// account fails to settle, no account changes. Emits exactly one
    /// [`FarmEvent::RewardsDistributed`]. Cost is linear in the number of
    /// known stakers.
    pub fn distribute_rewards_all(
        &mut self,
        now: BlockNumber,
    ) -> Result<DistributionReport, FarmError> {
        let mut staged = Vec::with_capacity(self.pool.staker_count());
        let mut rewards_credited: u128 = 0;
        for id in self.pool.known_stakers() {
            let settled = self.pool.stage(id, now)?;
            rewards_credited = rewards_credited
                .checked_add(settled.credited)
                .ok_or(FarmError::Overflow)?;
            staged.push((id.clone(), settled));
        }
        self.pool
            .rewards_settled()
            .checked_add(rewards_credited)
            .ok_or(FarmError::Overflow)?;

        let total_staked = self.pool.total_staked();
        let accounts_settled = staged.len();
        for (id, settled) in staged {
            tracing::debug!(account = %id, credited = settled.credited, "distributed");
            self.pool.apply(&id, settled, total_staked, 0);
        }

        self.stats.increment(STAT_DISTRIBUTIONS);
        tracing::info!(block = %now, accounts_settled, rewards_credited, "rewards distributed");
        self.events.emit(&FarmEvent::RewardsDistributed);
        Ok(DistributionReport {
            block: now,
            accounts_settled,
            rewards_credited,
        })
    }

    /// Pay out everything `account` has accrued up to `now`.
    ///
    /// Settles first, so the claim includes accrual since the last
    /// distribution. Returns the amount paid.
    pub fn claim_rewards(
        &mut self,
        account: &AccountId,
        now: BlockNumber,
    ) -> Result<u128, FarmError> {
        if !self.pool.is_known(account) {
            return Err(FarmError::NothingToClaim);
        }

        let mut staged = self.pool.stage(account, now)?;
        let amount = staged.account.pending_rewards;
        if amount == 0 {
            return Err(FarmError::NothingToClaim);
        }
        staged.account.pending_rewards = 0;
        self.pool
            .rewards_claimed()
            .checked_add(amount)
            .ok_or(FarmError::Overflow)?;

        self.reward_asset
            .transfer(&self.address, account, amount)
            .map_err(|e| self.transfer_failed("claim", account, amount, e))?;

        let total_staked = self.pool.total_staked();
        self.pool.apply(account, staged, total_staked, amount);
        self.stats.increment(STAT_CLAIMS);
        tracing::info!(%account, amount, block = %now, "rewards claimed");
        self.events.emit(&FarmEvent::ClaimSucceeded {
            account: account.clone(),
            amount,
        });
        Ok(amount)
    }
}
