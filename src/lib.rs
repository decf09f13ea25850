//! Govgraph - delegation-graph aggregation for DAO governance analytics.
//!
//! Reconstructs "who delegates voting power to whom" from a ledger that only
//! answers point queries and event scans, aggregates it per delegate, and
//! serves per-category analytics through a cached, cancellable orchestrator.
//!
//! # Architecture
//!
//! - **`domain`** - Accounts, fixed-point token amounts, delegation edges,
//!   crawl results and the pure metric functions
//! - **`port`** - Traits for the ledger, the optional delegation helper, the
//!   remote precomputed source and report sources
//! - **`application`** - Result cache, cancellation, the delegation crawler,
//!   token and report collectors, and the fetch orchestrator
//! - **`adapter`** - HTTP remote source with wire normalization, file and
//!   HTTP report sources
//! - **`infrastructure`** - TOML configuration, logging and wiring
//!
//! # Features
//!
//! - `testkit` - Export mock ledgers and scripted sources for integration tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use govgraph::application::orchestration::RequestContext;
//! use govgraph::infrastructure::bootstrap::build_orchestrator;
//! use govgraph::infrastructure::config::settings::Config;
//! use govgraph::port::LedgerClient;
//!
//! async fn top_delegates(ledger: Arc<dyn LedgerClient>) -> govgraph::error::Result<()> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!
//!     let orchestrator = build_orchestrator(&config, ledger, None)?;
//!     let result = orchestrator
//!         .request_delegation(&RequestContext::detached())
//!         .await?;
//!     for delegate in &result.top_delegates {
//!         println!("{} {}", delegate.address, delegate.delegated_power);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
