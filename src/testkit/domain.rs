//! Builders for domain primitives used across tests.
//!
//! Accounts are numbered so tests read as "1 delegates to 9" rather than as
//! forty-digit hex strings.

use chrono::Utc;

use crate::application::crawler::build_result;
use crate::domain::{Account, CrawlResult, DelegationEdge, TokenAmount};

/// Account `0x000…0n`.
pub fn account(n: u8) -> Account {
    Account::new(format!("0x{n:040x}"))
}

/// Depth-1 edge from `account(delegator)` to `account(delegate)` carrying `tokens`.
///
/// # Panics
///
/// Panics if the edge is not a delegation (self-delegation or zero tokens).
pub fn edge(delegator: u8, delegate: u8, tokens: u64) -> DelegationEdge {
    DelegationEdge::try_new(
        account(delegator),
        account(delegate),
        TokenAmount::from_tokens(tokens),
        1,
    )
    .expect("test edge must be a delegation")
}

/// Crawl result over `edges` with `supply_tokens` in circulation, at block 1.
pub fn crawl_result(edges: Vec<DelegationEdge>, supply_tokens: u64) -> CrawlResult {
    build_result(edges, TokenAmount::from_tokens(supply_tokens), 20, 1, Utc::now())
}
