//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use crate::application::crawler::CrawlerConfig;
use crate::domain::Account;

/// Crawler config that never widens to the transfer scan and visits `important` first.
pub fn crawler(important: Vec<Account>) -> CrawlerConfig {
    CrawlerConfig {
        min_edges_before_transfer_scan: 0,
        important_accounts: important,
        ..CrawlerConfig::default()
    }
}
