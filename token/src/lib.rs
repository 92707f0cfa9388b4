//! Fungible token ledger used as the farm's asset-transfer collaborator.
//!
//! The farm only ever talks to an [`AssetLedger`]: `transfer_from`, `transfer`
//! and `balance_of`. Every call is all-or-nothing; a returned error means no
//! balance or allowance changed.
//!
//! [`Token`] is the in-memory implementation: owner-gated minting, ownership
//! transfer, allowances. Two instances model the stakeable LP token and the
//! reward token.

pub mod asset;
pub mod error;
pub mod token;

pub use asset::AssetLedger;
pub use error::TokenError;
pub use token::Token;
