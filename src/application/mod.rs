//! Application services (use cases).
//!
//! The orchestrator serves category results from the cache, a remote
//! precomputed source, or a [`Collector`](collector::Collector). Collectors
//! reach ledgers and report files only through the traits in
//! [`crate::port`].

pub mod cache;
pub mod cancel;
pub mod collector;
pub mod crawler;
pub mod orchestration;
pub mod report;
pub mod token;
