//! Fundamental types for the TokenFarm staking engine.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account identifiers, the abstract block-number time unit, and token-unit helpers.

pub mod address;
pub mod amount;
pub mod time;

pub use address::AccountId;
pub use amount::{format_units, from_units, TOKEN_DECIMALS, TOKEN_UNIT};
pub use time::BlockNumber;
