//! Shared utilities for the TokenFarm workspace.

pub mod logging;
pub mod stats;

pub use logging::{init_logging, LogFormat};
pub use stats::StatsCounter;
