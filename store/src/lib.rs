//! Abstract storage traits for TokenFarm.
//!
//! Storage backends (on-disk, in-memory for testing) implement these traits.
//! The engine depends only on the traits.

pub mod error;
pub mod farm;

pub use error::StoreError;
pub use farm::{FarmStore, FarmWriteBatch};
