//! The farm engine: owns the pool, talks to the two asset ledgers.

use std::sync::Arc;

use tokenfarm_store::FarmStore;
use tokenfarm_token::AssetLedger;
use tokenfarm_types::{AccountId, BlockNumber};
use tokenfarm_utils::StatsCounter;

use crate::config::FarmConfig;
use crate::error::FarmError;
use crate::events::{EventBus, FarmEvent};
use crate::state::{PoolState, UserAccount};

pub(crate) const STAT_DEPOSITS: &str = "deposits";
pub(crate) const STAT_WITHDRAWALS: &str = "withdrawals";
pub(crate) const STAT_CLAIMS: &str = "claims";
pub(crate) const STAT_DISTRIBUTIONS: &str = "distributions";
pub(crate) const STAT_TRANSFER_FAILURES: &str = "transfer_failures";

/// A staking farm.
///
/// Stakers deposit the staking asset into the farm's own account
/// (`address`), and are paid the reward asset out of it. Every mutating
/// operation takes `&mut self` and the current block; callers serialize
/// access and supply a non-decreasing block number.
///
/// Operations live next to their component: deposit and withdraw in
/// [`crate::ledger`], distribution and claims in [`crate::distribution`].
pub struct TokenFarm {
    pub(crate) address: AccountId,
    pub(crate) pool: PoolState,
    pub(crate) staking_asset: Arc<dyn AssetLedger>,
    pub(crate) reward_asset: Arc<dyn AssetLedger>,
    pub(crate) events: EventBus,
    pub(crate) stats: StatsCounter,
}

impl TokenFarm {
    /// Create a farm with an empty pool emitting `config.reward_rate_per_block`.
    pub fn new(
        address: AccountId,
        config: &FarmConfig,
        staking_asset: Arc<dyn AssetLedger>,
        reward_asset: Arc<dyn AssetLedger>,
    ) -> Self {
        let pool = PoolState::new(u128::from(config.reward_rate_per_block));
        Self::with_pool(address, pool, staking_asset, reward_asset)
    }

    /// Create a farm around an existing pool (e.g. one restored from a store).
    pub fn with_pool(
        address: AccountId,
        pool: PoolState,
        staking_asset: Arc<dyn AssetLedger>,
        reward_asset: Arc<dyn AssetLedger>,
    ) -> Self {
        tracing::info!(
            farm = %address,
            rate = pool.reward_rate_per_block(),
            stakers = pool.staker_count(),
            "farm initialised"
        );
        Self {
            address,
            pool,
            staking_asset,
            reward_asset,
            events: EventBus::new(),
            stats: StatsCounter::new(&[
                STAT_DEPOSITS,
                STAT_WITHDRAWALS,
                STAT_CLAIMS,
                STAT_DISTRIBUTIONS,
                STAT_TRANSFER_FAILURES,
            ]),
        }
    }

    /// Restore a farm from `store`, or start an empty one if the store is empty.
    ///
    /// A restored pool keeps its persisted reward rate; `config` only seeds a
    /// fresh pool.
    pub fn load_from_store(
        address: AccountId,
        config: &FarmConfig,
        store: &dyn FarmStore,
        staking_asset: Arc<dyn AssetLedger>,
        reward_asset: Arc<dyn AssetLedger>,
    ) -> Result<Self, FarmError> {
        match PoolState::load_from_store(store)? {
            Some(pool) => {
                let configured = u128::from(config.reward_rate_per_block);
                if configured != pool.reward_rate_per_block() {
                    tracing::warn!(
                        farm = %address,
                        configured,
                        persisted = pool.reward_rate_per_block(),
                        "configured reward rate ignored, keeping persisted rate"
                    );
                }
                Ok(Self::with_pool(address, pool, staking_asset, reward_asset))
            }
            None => Ok(Self::new(address, config, staking_asset, reward_asset)),
        }
    }

    /// Persist the pool to `store`.
    pub fn save_to_store(&self, store: &dyn FarmStore) -> Result<(), FarmError> {
        self.pool.save_to_store(store)
    }

    /// Register a listener for events emitted after each committed operation.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&FarmEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    /// The farm's own account on both asset ledgers.
    pub fn address(&self) -> &AccountId {
        &self.address
    }

    pub fn pool(&self) -> &PoolState {
        &self.pool
    }

    /// Read-only account query. `None` for accounts that never deposited.
    pub fn get_account(&self, account: &AccountId) -> Option<&UserAccount> {
        self.pool.account(account)
    }

    pub fn total_staked(&self) -> u128 {
        self.pool.total_staked()
    }

    pub fn reward_rate(&self) -> u128 {
        self.pool.reward_rate_per_block()
    }

    pub fn known_stakers(&self) -> &[AccountId] {
        self.pool.known_stakers()
    }

    pub fn staker_count(&self) -> usize {
        self.pool.staker_count()
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    /// What a claim at `now` would pay: pending rewards plus unsettled accrual.
    ///
    /// Does not mutate anything. Unknown accounts preview zero.
    pub fn pending_rewards_at(
        &self,
        account: &AccountId,
        now: BlockNumber,
    ) -> Result<u128, FarmError> {
        if !self.pool.is_known(account) {
            return Ok(0);
        }
        Ok(self.pool.stage(account, now)?.account.pending_rewards)
    }

    /// Recheck the pool's bookkeeping identities.
    pub fn verify_invariants(&self) -> Result<(), FarmError> {
        self.pool.verify_invariants()
    }

    /// Log and count a collaborator failure before it is returned.
    pub(crate) fn transfer_failed(
        &self,
        operation: &'static str,
        account: &AccountId,
        amount: u128,
        err: tokenfarm_token::TokenError,
    ) -> FarmError {
        self.stats.increment(STAT_TRANSFER_FAILURES);
        tracing::warn!(operation, %account, amount, error = %err, "asset transfer rejected");
        FarmError::TransferFailed(err)
    }
}
