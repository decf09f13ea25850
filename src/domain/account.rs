//! Ledger account identifier.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::error::DomainError;

/// Number of hex digits in an address, excluding the `0x` prefix.
const ADDRESS_HEX_LEN: usize = 40;

/// Ledger account address.
///
/// The inner string is stored lowercased, so equality and hashing are
/// case-insensitive: `0xAbC...` and `0xabc...` are the same account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Account(String);

impl Account {
    /// The zero account. Delegating to it means "no delegate".
    pub const ZERO_STR: &'static str = "0x0000000000000000000000000000000000000000";

    /// Create an account from any string form without validation.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_ascii_lowercase())
    }

    /// Parse a `0x`-prefixed 20-byte hex address.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAccount`] when the prefix, length or
    /// digits are wrong.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        let invalid = |reason| DomainError::InvalidAccount {
            value: value.to_string(),
            reason,
        };

        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| invalid("missing 0x prefix"))?;
        if hex.len() != ADDRESS_HEX_LEN {
            return Err(invalid("expected 40 hex digits"));
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid("non-hex digit"));
        }
        Ok(Self::new(trimmed))
    }

    /// The zero account.
    #[must_use]
    pub fn zero() -> Self {
        Self(Self::ZERO_STR.to_string())
    }

    /// True for the zero account.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == Self::ZERO_STR
    }

    /// Get the lowercased address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Account {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Account {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Account {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}
