//! Ledger-agnostic domain types and pure metric functions.

mod account;
mod amount;
mod category;
mod delegation;
mod payload;
mod token;

pub mod error;
pub mod metrics;

pub use account::Account;
pub use amount::{TokenAmount, RATIO_DECIMALS, TOKEN_DECIMALS};
pub use category::Category;
pub use delegation::{CrawlResult, DelegateAggregate, DelegationEdge};
pub use error::DomainError;
pub use payload::Payload;
pub use token::TokenStats;
