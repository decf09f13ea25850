//! Delegation crawler tuning.
//!
//! Lookback windows and caps bound the number of ledger queries per crawl.
//! The defaults suit a public RPC provider; tighten them for rate-limited
//! endpoints.

use serde::Deserialize;

use crate::domain::Account;

/// Configuration for [`DelegationCrawler`](super::DelegationCrawler).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Blocks scanned backwards for `DelegateChanged` events.
    pub delegate_changed_lookback_blocks: u64,
    /// Blocks scanned backwards for `Transfer` events when too few edges were found.
    pub transfer_lookback_blocks: u64,
    /// Edge count below which the transfer scan runs.
    pub min_edges_before_transfer_scan: usize,
    /// Maximum number of new accounts taken from the transfer scan.
    pub max_transfer_accounts: usize,
    /// Number of aggregates kept in a crawl result.
    pub top_delegates: usize,
    /// Delegates requested from the helper's concentration ranking.
    pub helper_top_delegates: usize,
    /// Delegators enumerated per helper-ranked delegate.
    pub delegator_fan_out: usize,
    /// Accounts always visited first (treasury, known protocol addresses).
    pub important_accounts: Vec<Account>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            delegate_changed_lookback_blocks: 50_000,
            transfer_lookback_blocks: 200_000,
            min_edges_before_transfer_scan: 10,
            max_transfer_accounts: 200,
            top_delegates: 20,
            helper_top_delegates: 10,
            delegator_fan_out: 25,
            important_accounts: Vec::new(),
        }
    }
}
