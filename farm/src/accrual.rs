//! Block-based reward accrual and settlement.
//!
//! `reward = rate × elapsed × stake / total_staked`
//!
//! The product is formed in 512-bit space and divided once, last. Dividing
//! first would truncate `stake / total_staked` to zero for every account that
//! is not the whole pool. The final division truncates toward zero, so a tiny
//! stake over a short window can legitimately accrue nothing.

use primitive_types::U512;
use tokenfarm_types::BlockNumber;

use crate::error::FarmError;
use crate::state::UserAccount;

/// Reward owed for `elapsed` blocks to a `stake` out of `total_staked`.
///
/// Returns zero when nothing elapsed, nothing is staked, or the rate is zero.
/// Fails with [`FarmError::Overflow`] only if the result does not fit `u128`.
pub fn accrued_reward(
    rate_per_block: u128,
    elapsed: u64,
    stake: u128,
    total_staked: u128,
) -> Result<u128, FarmError> {
    if elapsed == 0 || total_staked == 0 || stake == 0 || rate_per_block == 0 {
        return Ok(0);
    }
    // At most 2^128 · 2^64 · 2^128 = 2^320; cannot overflow U512.
    let numerator = U512::from(rate_per_block) * U512::from(elapsed) * U512::from(stake);
    let reward = numerator / U512::from(total_staked);
    if reward > U512::from(u128::MAX) {
        return Err(FarmError::Overflow);
    }
    Ok(reward.low_u128())
}

/// Credit everything `account` accrued since its checkpoint and advance the
/// checkpoint to `now`.
///
/// `total_staked` must be the pool total *before* any stake change in the
/// calling operation. Returns the amount credited. On error the account is
/// left untouched.
pub fn settle(
    account: &mut UserAccount,
    total_staked: u128,
    rate_per_block: u128,
    now: BlockNumber,
) -> Result<u128, FarmError> {
    if now < account.checkpoint {
        return Err(FarmError::BlockInPast {
            checkpoint: account.checkpoint,
            now,
        });
    }
    let elapsed = account.checkpoint.elapsed_since(now);
    let reward = accrued_reward(rate_per_block, elapsed, account.staking_balance, total_staked)?;
    let pending = account
        .pending_rewards
        .checked_add(reward)
        .ok_or(FarmError::Overflow)?;

    account.pending_rewards = pending;
    account.checkpoint = now;
    if reward > 0 {
        tracing::debug!(reward, elapsed, stake = account.staking_balance, "settled");
    }
    Ok(reward)
}
