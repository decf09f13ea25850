//! Remote precomputed-results adapter.
//!
//! - [`client`]: HTTP [`PrecomputedSource`](crate::port::PrecomputedSource)
//! - [`wire`]: normalization of the response shapes indexers publish

pub mod client;
pub mod wire;

pub use client::HttpPrecomputedSource;
