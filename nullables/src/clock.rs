//! Nullable clock: deterministic block numbers for testing.

use std::cell::Cell;
use tokenfarm_types::BlockNumber;

/// A deterministic block clock for testing.
///
/// Blocks are only mined when you tell it to.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_block: u64) -> Self {
        Self {
            current: Cell::new(initial_block),
        }
    }

    /// Get the current block.
    pub fn now(&self) -> BlockNumber {
        BlockNumber::new(self.current.get())
    }

    /// Mine a single block and return the new head.
    pub fn mine(&self) -> BlockNumber {
        self.advance(1);
        self.now()
    }

    /// Advance by a number of blocks.
    pub fn advance(&self, blocks: u64) {
        self.current.set(self.current.get() + blocks);
    }

    /// Set the head to a specific block.
    pub fn set(&self, block: u64) {
        self.current.set(block);
    }
}
