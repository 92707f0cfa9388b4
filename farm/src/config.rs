//! Farm configuration with TOML file support.

use serde::{Deserialize, Serialize};
use tokenfarm_types::TOKEN_DECIMALS;
use tokenfarm_utils::LogFormat;

use crate::FarmError;

/// Configuration for a farm instance.
///
/// Can be loaded from a TOML file via [`FarmConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FarmConfig {
    /// Reward-token units emitted to the whole pool per block.
    #[serde(default = "default_reward_rate")]
    pub reward_rate_per_block: u64,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

/// One whole reward token per block.
const ONE_TOKEN_PER_BLOCK: u64 = 10u64.pow(TOKEN_DECIMALS);

fn default_reward_rate() -> u64 {
    ONE_TOKEN_PER_BLOCK
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl FarmConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, FarmError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| FarmError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, FarmError> {
        toml::from_str(s).map_err(|e| FarmError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, FarmError> {
        toml::to_string_pretty(self).map_err(|e| FarmError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber described by this config.
    pub fn init_logging(&self) -> Result<(), FarmError> {
        tokenfarm_utils::init_logging(self.log_format, &self.log_level)
            .map_err(|e| FarmError::Config(e.to_string()))
    }
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            reward_rate_per_block: default_reward_rate(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = FarmConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = FarmConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.reward_rate_per_block, config.reward_rate_per_block);
        assert_eq!(parsed.log_format, config.log_format);
    }

    #[test]
    fn default_rate_is_one_whole_token() {
        assert_eq!(
            u128::from(FarmConfig::default().reward_rate_per_block),
            tokenfarm_types::TOKEN_UNIT
        );
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = FarmConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.reward_rate_per_block, 1_000_000_000_000_000_000);
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            reward_rate_per_block = 250
            log_format = "json"
        "#;
        let config = FarmConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.reward_rate_per_block, 250);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let result = FarmConfig::from_toml_str(r#"log_format = "xml""#);
        assert!(matches!(result, Err(FarmError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "reward_rate_per_block = 42").unwrap();
        let config = FarmConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.reward_rate_per_block, 42);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = FarmConfig::from_toml_file("/nonexistent/farm.toml");
        assert!(matches!(result, Err(FarmError::Config(_))));
    }
}
