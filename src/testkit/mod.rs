//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`ledger`] - `MockLedger` and `MockHelper`, scriptable ledger ports with
//!   failure injection and a gate for holding a crawl mid-flight.
//! - [`remote`] - `ScriptedRemote` precomputed source.
//! - [`report`] - `StaticReport` report source.
//! - [`domain`] - Builders for accounts, edges and crawl results.
//! - [`config`] - Canonical test configurations.

pub mod config;
pub mod domain;
pub mod ledger;
pub mod remote;
pub mod report;
