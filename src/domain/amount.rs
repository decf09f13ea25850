//! Fixed-point token amounts and the ratio conversion used by every metric.
//!
//! Balances are kept in the ledger's native representation: an unsigned
//! 256-bit integer counting 10^-18 token units. Sums never leave the integer
//! domain. Only [`TokenAmount::ratio`] produces a [`Decimal`], rounded half-up
//! to [`RATIO_DECIMALS`] places.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use alloy_primitives::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::DomainError;

/// Fractional digits of the ledger's fixed-point convention.
pub const TOKEN_DECIMALS: usize = 18;

/// Decimal places kept by ratio and percentage conversions.
pub const RATIO_DECIMALS: u32 = 6;

/// 10^18 raw units per whole token.
const UNIT: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// 10^RATIO_DECIMALS.
const RATIO_SCALE: U256 = U256::from_limbs([1_000_000, 0, 0, 0]);

/// Token balance in raw 18-decimal units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(U256);

impl TokenAmount {
    /// Zero tokens.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Wrap a raw unit count as returned by the ledger.
    #[must_use]
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Whole-token amount, mostly useful for tests and fixtures.
    #[must_use]
    pub fn from_tokens(tokens: u64) -> Self {
        Self(U256::from(tokens).saturating_mul(UNIT))
    }

    /// Parse a decimal token string such as `"350"` or `"12.5"`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] for empty input, signs,
    /// non-digit characters, more than 18 fractional digits or overflow.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let invalid = |reason| DomainError::InvalidAmount {
            value: value.to_string(),
            reason,
        };
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty"));
        }

        let (int_part, frac_part) = match trimmed.split_once('.') {
            Some((i, f)) => (i, f),
            None => (trimmed, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid("no digits"));
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected decimal digits"));
        }
        if frac_part.len() > TOKEN_DECIMALS {
            return Err(invalid("more than 18 fractional digits"));
        }

        let int = if int_part.is_empty() {
            U256::ZERO
        } else {
            U256::from_str_radix(int_part, 10).map_err(|_| invalid("overflow"))?
        };
        let frac = if frac_part.is_empty() {
            U256::ZERO
        } else {
            let padded = format!("{frac_part:0<width$}", width = TOKEN_DECIMALS);
            U256::from_str_radix(&padded, 10).map_err(|_| invalid("overflow"))?
        };

        int.checked_mul(UNIT)
            .and_then(|whole| whole.checked_add(frac))
            .map(Self)
            .ok_or_else(|| invalid("overflow"))
    }

    /// Raw unit count.
    #[must_use]
    pub const fn raw(&self) -> U256 {
        self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Integer division by a count; zero when the count is zero.
    #[must_use]
    pub fn per(&self, count: u64) -> Self {
        if count == 0 {
            return Self::ZERO;
        }
        Self(self.0 / U256::from(count))
    }

    /// `self / denominator` as a decimal rounded half-up to [`RATIO_DECIMALS`].
    ///
    /// Zero when the denominator is zero. Saturates at [`Decimal::MAX`] for
    /// ratios that do not fit a decimal.
    #[must_use]
    pub fn ratio(&self, denominator: Self) -> Decimal {
        if denominator.is_zero() {
            return Decimal::ZERO;
        }
        let two = U256::from(2u8);
        let scaled = self
            .0
            .checked_mul(RATIO_SCALE)
            .and_then(|n| n.checked_mul(two))
            .and_then(|n| n.checked_add(denominator.0))
            .and_then(|n| denominator.0.checked_mul(two).map(|d| n / d));

        scaled
            .and_then(|s| i128::try_from(s).ok())
            .and_then(|s| Decimal::try_from_i128_with_scale(s, RATIO_DECIMALS).ok())
            .map_or(Decimal::MAX, |d| d.normalize())
    }
}

impl Add for TokenAmount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for TokenAmount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sum for TokenAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a TokenAmount> for TokenAmount {
    fn sum<I: Iterator<Item = &'a TokenAmount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / UNIT;
        let frac = self.0 % UNIT;
        if frac.is_zero() {
            return write!(f, "{int}");
        }
        let digits = format!("{:0>width$}", frac.to_string(), width = TOKEN_DECIMALS);
        write!(f, "{int}.{}", digits.trim_end_matches('0'))
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
