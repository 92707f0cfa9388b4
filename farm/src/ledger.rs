//! Balance ledger: deposit and full withdraw.
//!
//! Both operations settle the account against the pool as it stood before
//! the call, then move the staking asset, then commit.

use tokenfarm_types::{AccountId, BlockNumber};

use crate::engine::{TokenFarm, STAT_DEPOSITS, STAT_WITHDRAWALS};
use crate::error::FarmError;
use crate::events::FarmEvent;

impl TokenFarm {
    /// Stake `amount` of the staking asset from `account`.
    ///
    /// The farm pulls the tokens with `transfer_from`, so `account` must have
    /// approved the farm's address beforehand. The first deposit registers the
    /// account as a known staker.
    pub fn deposit(
        &mut self,
        account: &AccountId,
        amount: u128,
        now: BlockNumber,
    ) -> Result<(), FarmError> {
        if amount == 0 {
            return Err(FarmError::InvalidAmount);
        }

        let mut staged = self.pool.stage(account, now)?;
        staged.account.staking_balance = staged
            .account
            .staking_balance
            .checked_add(amount)
            .ok_or(FarmError::Overflow)?;
        let total_staked = self
            .pool
            .total_staked()
            .checked_add(amount)
            .ok_or(FarmError::Overflow)?;

        self.staking_asset
            .transfer_from(&self.address, account, &self.address, amount)
            .map_err(|e| self.transfer_failed("deposit", account, amount, e))?;

        let first_deposit = !self.pool.is_known(account);
        let credited = staged.credited;
        self.pool.apply(account, staged, total_staked, 0);
        self.stats.increment(STAT_DEPOSITS);
        tracing::info!(
            %account,
            amount,
            credited,
            first_deposit,
            block = %now,
            total_staked,
            "deposit"
        );
        self.events.emit(&FarmEvent::DepositSucceeded {
            account: account.clone(),
            amount,
        });
        Ok(())
    }

    /// Return `account`'s entire stake. Returns the amount withdrawn.
    ///
    /// Pending rewards are settled and kept; they stay claimable.
    pub fn withdraw(&mut self, account: &AccountId, now: BlockNumber) -> Result<u128, FarmError> {
        let staked = self
            .pool
            .account(account)
            .map(|a| a.staking_balance)
            .unwrap_or(0);
        if staked == 0 {
            return Err(FarmError::NothingStaked);
        }

        let mut staged = self.pool.stage(account, now)?;
        let amount = staged.account.staking_balance;
        staged.account.staking_balance = 0;
        let total_staked = self.pool.total_staked().checked_sub(amount).ok_or_else(|| {
            FarmError::InvariantViolated(format!(
                "stake {} exceeds pool total {}",
                amount,
                self.pool.total_staked()
            ))
        })?;

        self.staking_asset
            .transfer(&self.address, account, amount)
            .map_err(|e| self.transfer_failed("withdraw", account, amount, e))?;

        let credited = staged.credited;
        self.pool.apply(account, staged, total_staked, 0);
        self.stats.increment(STAT_WITHDRAWALS);
        tracing::info!(%account, amount, credited, block = %now, total_staked, "withdraw");
        self.events.emit(&FarmEvent::WithdrawSucceeded {
            account: account.clone(),
            amount,
        });
        Ok(amount)
    }
}
