//! Domain validation errors for core domain types.
//!
//! These errors are returned by the `parse` constructors of [`Account`] and
//! [`TokenAmount`] when text coming from configuration or a wire payload does
//! not describe a valid value.
//!
//! # Examples
//!
//! ```
//! use govgraph::domain::{Account, DomainError};
//!
//! let result = Account::parse("0x1234");
//! assert!(matches!(result, Err(DomainError::InvalidAccount { .. })));
//! ```
//!
//! [`Account`]: crate::domain::Account
//! [`TokenAmount`]: crate::domain::TokenAmount

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Account text is not a 20-byte hex address.
    #[error("invalid account '{value}': {reason}")]
    InvalidAccount {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Amount text is not a non-negative decimal with at most 18 fractional digits.
    #[error("invalid token amount '{value}': {reason}")]
    InvalidAmount {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}
