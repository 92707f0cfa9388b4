//! Account identifier type with `0x` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account identifier, always prefixed with `0x`.
///
/// The engine never interprets the body; identifiers are compared by value
/// and ordered only by the insertion order the pool records.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// The standard prefix for all account identifiers.
    pub const PREFIX: &'static str = "0x";

    /// Length of the hex body of a well-formed identifier.
    pub const HEX_LEN: usize = 40;

    /// Create a new account identifier from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `0x`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "account id must start with 0x");
        Self(s)
    }

    /// Build a well-formed identifier from a numeric seed (`0x000…0n`).
    pub fn from_seed(seed: u64) -> Self {
        Self(format!("0x{:040x}", seed))
    }

    /// Return the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this identifier is `0x` followed by 40 hex digits.
    pub fn is_valid(&self) -> bool {
        match self.0.strip_prefix(Self::PREFIX) {
            Some(body) => {
                body.len() == Self::HEX_LEN && body.chars().all(|c| c.is_ascii_hexdigit())
            }
            None => false,
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_ids_are_valid_and_distinct() {
        let a = AccountId::from_seed(1);
        let b = AccountId::from_seed(2);
        assert!(a.is_valid());
        assert!(b.is_valid());
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 42);
    }

    #[test]
    fn short_body_is_not_valid() {
        assert!(!AccountId::new("0xabc").is_valid());
        assert!(!AccountId::new("0x").is_valid());
    }

    #[test]
    #[should_panic(expected = "must start with 0x")]
    fn missing_prefix_panics() {
        AccountId::new("farmer");
    }
}
