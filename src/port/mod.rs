//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  cache, crawler,        │
//!     ┌──────────────┤  orchestrator           ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Ledger  │            │ Precomputed │              │  Report   │
//! │ Client  │            │   Source    │              │  Source   │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`LedgerClient`], [`DelegationHelper`] - Ledger state and events
//! - [`PrecomputedSource`] - Results computed by a remote service
//! - [`ReportSource`] - JSON report locations for the fallback chain

pub mod outbound;

pub use outbound::ledger::{DelegationHelper, EventKind, LedgerClient, LedgerEvent};
pub use outbound::remote::PrecomputedSource;
pub use outbound::report::ReportSource;
