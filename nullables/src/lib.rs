//! Nullable infrastructure for deterministic testing.
//!
//! Everything outside the reward engine (block clock, storage, asset
//! transfers) sits behind a trait or an explicit parameter. This crate
//! provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod asset;
pub mod clock;
pub mod store;

pub use asset::{NullAsset, RecordedTransfer};
pub use clock::NullClock;
pub use store::NullFarmStore;
