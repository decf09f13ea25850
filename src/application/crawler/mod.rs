//! Delegation graph crawler.
//!
//! Reconstructs "who delegates to whom" from a ledger that only answers point
//! queries and event scans. Every query of a crawl is pinned to the block read
//! at the start, so the result describes one consistent ledger state.
//!
//! # Flow
//!
//! ```text
//! current block + total supply  (failure => SourceUnavailable)
//!         |
//!         v
//! seeds: important accounts -> DelegateChanged window -> helper ranking
//!        -> Transfer window (only while edges < threshold, capped)
//!         |
//!         v
//! per unvisited account: delegate_of + balance_of (joint), optional depth
//!         |
//!         v
//! aggregate -> CrawlResult
//! ```

mod aggregate;
mod config;
mod delegation;
mod discovery;

pub use aggregate::{aggregate, build_result, Aggregation};
pub use config::CrawlerConfig;
pub use delegation::{pin_context, CrawlContext, DelegationCrawler};
pub use discovery::{event_accounts, scan_window, CrawlStats, Discovery, SeedSource};
