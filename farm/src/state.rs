//! Per-account checkpoints and pool-wide state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokenfarm_store::{FarmStore, FarmWriteBatch};
use tokenfarm_types::{AccountId, BlockNumber};

use crate::accrual::settle;
use crate::error::FarmError;

/// One staker's position.
///
/// Created zero-valued on first deposit and never removed, so pending rewards
/// stay claimable after the stake returns to zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Currently deposited stake (smallest unit).
    pub staking_balance: u128,
    /// Settled but unclaimed reward. Only settlement raises it; only a claim
    /// lowers it, and then to exactly zero.
    pub pending_rewards: u128,
    /// Last block at which this account was settled.
    pub checkpoint: BlockNumber,
}

/// An account settled against the pool but not yet written back.
///
/// Operations stage first, perform their external transfer, and only then
/// [`PoolState::apply`] the staged value, so a failed transfer discards it.
#[derive(Clone, Debug)]
pub(crate) struct Staged {
    pub account: UserAccount,
    pub credited: u128,
}

/// Pool-wide state owned by a single engine instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoolState {
    /// Reward emitted to the whole pool per elapsed block.
    reward_rate_per_block: u128,
    /// Sum of every account's `staking_balance`.
    total_staked: u128,
    /// Cumulative reward ever credited by settlement.
    rewards_settled: u128,
    /// Cumulative reward ever paid out by claims.
    rewards_claimed: u128,
    accounts: HashMap<AccountId, UserAccount>,
    /// Every account that ever deposited, in first-deposit order.
    known_stakers: Vec<AccountId>,
}

impl PoolState {
    pub fn new(reward_rate_per_block: u128) -> Self {
        Self {
            reward_rate_per_block,
            total_staked: 0,
            rewards_settled: 0,
            rewards_claimed: 0,
            accounts: HashMap::new(),
            known_stakers: Vec::new(),
        }
    }

    /// Reward emitted to the whole pool per elapsed block.
    pub fn reward_rate_per_block(&self) -> u128 {
        self.reward_rate_per_block
    }

    pub fn total_staked(&self) -> u128 {
        self.total_staked
    }

    pub fn rewards_settled(&self) -> u128 {
        self.rewards_settled
    }

    pub fn rewards_claimed(&self) -> u128 {
        self.rewards_claimed
    }

    pub fn account(&self, id: &AccountId) -> Option<&UserAccount> {
        self.accounts.get(id)
    }

    pub fn is_known(&self, id: &AccountId) -> bool {
        self.accounts.contains_key(id)
    }

    pub fn known_stakers(&self) -> &[AccountId] {
        &self.known_stakers
    }

    pub fn staker_count(&self) -> usize {
        self.known_stakers.len()
    }

    /// Sum of outstanding `pending_rewards` across all accounts.
    pub fn total_pending(&self) -> u128 {
        self.accounts
            .values()
            .fold(0u128, |acc, a| acc.saturating_add(a.pending_rewards))
    }

    /// Settle a copy of `id`'s account at `now` without touching the pool.
    ///
    /// Unknown accounts stage as a fresh zero-valued account.
    pub(crate) fn stage(&self, id: &AccountId, now: BlockNumber) -> Result<Staged, FarmError> {
        let mut account = self.accounts.get(id).cloned().unwrap_or_default();
        let credited = settle(
            &mut account,
            self.total_staked,
            self.reward_rate_per_block,
            now,
        )?;
        self.rewards_settled
            .checked_add(credited)
            .ok_or(FarmError::Overflow)?;
        Ok(Staged { account, credited })
    }

    /// Write a staged account back, registering it on first sight.
    ///
    /// `total_staked` and `claimed` are the pool total after the operation and
    /// the amount paid out by it; both were validated before the transfer.
    pub(crate) fn apply(
        &mut self,
        id: &AccountId,
        staged: Staged,
        total_staked: u128,
        claimed: u128,
    ) {
        if !self.accounts.contains_key(id) {
            self.known_stakers.push(id.clone());
        }
        self.accounts.insert(id.clone(), staged.account);
        self.total_staked = total_staked;
        self.rewards_settled = self.rewards_settled.saturating_add(staged.credited);
        self.rewards_claimed = self.rewards_claimed.saturating_add(claimed);
    }

    /// Recheck the bookkeeping identities.
    ///
    /// - `total_staked == Σ staking_balance`
    /// - `rewards_settled == rewards_claimed + Σ pending_rewards`
    /// - every known staker has exactly one account
    pub fn verify_invariants(&self) -> Result<(), FarmError> {
        let staked = self
            .accounts
            .values()
            .try_fold(0u128, |acc, a| acc.checked_add(a.staking_balance))
            .ok_or(FarmError::Overflow)?;
        if staked != self.total_staked {
            return Err(FarmError::InvariantViolated(format!(
                "total staked {} but accounts sum to {}",
                self.total_staked, staked
            )));
        }

        let pending = self
            .accounts
            .values()
            .try_fold(0u128, |acc, a| acc.checked_add(a.pending_rewards))
            .ok_or(FarmError::Overflow)?;
        let outstanding = self
            .rewards_claimed
            .checked_add(pending)
            .ok_or(FarmError::Overflow)?;
        if outstanding != self.rewards_settled {
            return Err(FarmError::InvariantViolated(format!(
                "settled {} but claimed {} + pending {}",
                self.rewards_settled, self.rewards_claimed, pending
            )));
        }

        if self.known_stakers.len() != self.accounts.len()
            || self.known_stakers.iter().any(|id| !self.accounts.contains_key(id))
        {
            return Err(FarmError::InvariantViolated(
                "known stakers do not match account set".into(),
            ));
        }
        Ok(())
    }
}

/// Pool fields persisted under a single meta key.
#[derive(Serialize, Deserialize)]
struct PoolMeta {
    reward_rate_per_block: u128,
    total_staked: u128,
    rewards_settled: u128,
    rewards_claimed: u128,
    known_stakers: Vec<AccountId>,
}

const POOL_META_KEY: &[u8] = b"pool";

impl PoolState {
    /// Persist the pool and every account to a farm store.
    ///
    /// Everything goes out in one [`FarmWriteBatch`], so a failed save leaves
    /// the previous snapshot in place.
    pub fn save_to_store(&self, store: &dyn FarmStore) -> Result<(), FarmError> {
        let meta = PoolMeta {
            reward_rate_per_block: self.reward_rate_per_block,
            total_staked: self.total_staked,
            rewards_settled: self.rewards_settled,
            rewards_claimed: self.rewards_claimed,
            known_stakers: self.known_stakers.clone(),
        };

        let mut batch = FarmWriteBatch::new();
        for id in &self.known_stakers {
            if let Some(account) = self.accounts.get(id) {
                let bytes = bincode::serialize(account)
                    .map_err(|e| FarmError::Serialization(e.to_string()))?;
                batch.put_account_state(id, &bytes);
            }
        }
        let meta_bytes =
            bincode::serialize(&meta).map_err(|e| FarmError::Serialization(e.to_string()))?;
        batch.put_meta(POOL_META_KEY, &meta_bytes);

        let records = batch.len();
        store
            .write_batch(batch)
            .map_err(|e| FarmError::Store(e.to_string()))?;
        tracing::debug!(records, stakers = self.known_stakers.len(), "pool saved");
        Ok(())
    }

    /// Restore a pool from a farm store.
    ///
    /// An empty store yields `None`. A restored pool is checked with
    /// [`PoolState::verify_invariants`] before it is returned.
    pub fn load_from_store(store: &dyn FarmStore) -> Result<Option<Self>, FarmError> {
        let meta_bytes = match store
            .get_meta(POOL_META_KEY)
            .map_err(|e| FarmError::Store(e.to_string()))?
        {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let meta: PoolMeta = bincode::deserialize(&meta_bytes)
            .map_err(|e| FarmError::Serialization(e.to_string()))?;

        let mut accounts = HashMap::with_capacity(meta.known_stakers.len());
        for id in &meta.known_stakers {
            let bytes = store
                .get_account_state(id)
                .map_err(|e| FarmError::Store(e.to_string()))?
                .ok_or_else(|| FarmError::Store(format!("missing account state for {id}")))?;
            let account: UserAccount = bincode::deserialize(&bytes)
                .map_err(|e| FarmError::Serialization(e.to_string()))?;
            accounts.insert(id.clone(), account);
        }

        let pool = Self {
            reward_rate_per_block: meta.reward_rate_per_block,
            total_staked: meta.total_staked,
            rewards_settled: meta.rewards_settled,
            rewards_claimed: meta.rewards_claimed,
            accounts,
            known_stakers: meta.known_stakers,
        };
        pool.verify_invariants()?;
        Ok(Some(pool))
    }
}
