//! Farm engine errors.
//!
//! Every error is a rejected operation: no pool or account state changes
//! when one is returned.

use thiserror::Error;
use tokenfarm_token::TokenError;
use tokenfarm_types::BlockNumber;

#[derive(Debug, Error)]
pub enum FarmError {
    #[error("deposit amount must be greater than zero")]
    InvalidAmount,

    #[error("account has nothing staked")]
    NothingStaked,

    #[error("account has no pending rewards to claim")]
    NothingToClaim,

    #[error("asset transfer failed: {0}")]
    TransferFailed(#[from] TokenError),

    #[error("arithmetic overflow in reward computation")]
    Overflow,

    #[error("block {now} precedes account checkpoint {checkpoint}")]
    BlockInPast {
        checkpoint: BlockNumber,
        now: BlockNumber,
    },

    #[error("ledger invariant violated: {0}")]
    InvariantViolated(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Store(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
