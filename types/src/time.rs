//! Block number: the discrete time unit rewards accrue over.
//!
//! The engine never produces blocks. The environment supplies the current
//! block number to every operation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block number (discrete, monotonically increasing time unit).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlockNumber(u64);

impl BlockNumber {
    pub fn new(height: u64) -> Self {
        Self(height)
    }

    /// Blocks elapsed since this block (relative to `now`), saturating at zero.
    pub fn elapsed_since(&self, now: BlockNumber) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// The block `n` blocks after this one, saturating at `u64::MAX`.
    pub fn advanced_by(&self, n: u64) -> Self {
        Self(self.0.saturating_add(n))
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
