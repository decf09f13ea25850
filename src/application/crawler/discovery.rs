//! Seed discovery and per-crawl bookkeeping.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::application::cancel::CancelToken;
use crate::domain::{Account, DelegationEdge};
use crate::error::Result;
use crate::port::{EventKind, LedgerClient, LedgerEvent};

/// Where a batch of seed accounts came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    /// Caller or configuration supplied.
    Important,
    /// `DelegateChanged` event window.
    DelegateEvents,
    /// Helper concentration ranking and its delegators.
    Helper,
    /// `Transfer` event window.
    Transfers,
}

/// Counters reported at the end of a crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub accounts_queried: usize,
    pub failed_queries: usize,
    pub important_seeds: usize,
    pub event_seeds: usize,
    pub helper_seeds: usize,
    pub transfer_seeds: usize,
}

impl CrawlStats {
    pub(crate) fn record_seeds(&mut self, source: SeedSource, count: usize) {
        match source {
            SeedSource::Important => self.important_seeds += count,
            SeedSource::DelegateEvents => self.event_seeds += count,
            SeedSource::Helper => self.helper_seeds += count,
            SeedSource::Transfers => self.transfer_seeds += count,
        }
    }
}

/// Mutable state of one crawl: visited set, edges found and counters.
#[derive(Debug, Default)]
pub struct Discovery {
    visited: HashSet<Account>,
    pub edges: Vec<DelegationEdge>,
    pub stats: CrawlStats,
}

impl Discovery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `account` visited. Returns false if it already was.
    pub fn mark_visited(&mut self, account: &Account) -> bool {
        self.visited.insert(account.clone())
    }

    #[must_use]
    pub fn is_visited(&self, account: &Account) -> bool {
        self.visited.contains(account)
    }

    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

/// Distinct non-zero accounts named by `events`, in first-seen order.
#[must_use]
pub fn event_accounts(events: &[LedgerEvent]) -> Vec<Account> {
    let mut seen = HashSet::new();
    events
        .iter()
        .flat_map(LedgerEvent::accounts)
        .filter(|account| !account.is_zero())
        .filter(|account| seen.insert((*account).clone()))
        .cloned()
        .collect()
}

/// Accounts named in `kind` events over the `lookback` blocks ending at `block`.
///
/// A failed scan is logged and yields no accounts.
pub async fn scan_window(
    ledger: &dyn LedgerClient,
    kind: EventKind,
    lookback: u64,
    block: u64,
    cancel: &CancelToken,
) -> Result<Vec<Account>> {
    cancel.check()?;
    let from_block = block.saturating_sub(lookback);
    match ledger.query_events(kind, from_block, block).await {
        Ok(events) => {
            let accounts = event_accounts(&events);
            debug!(
                event = kind.as_str(),
                from_block,
                to_block = block,
                events = events.len(),
                accounts = accounts.len(),
                "Event window scanned"
            );
            Ok(accounts)
        }
        Err(e) => {
            warn!(event = kind.as_str(), from_block, to_block = block, error = %e, "Event scan failed");
            Ok(Vec::new())
        }
    }
}
