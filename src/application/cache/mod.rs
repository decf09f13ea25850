//! Runtime caches used by application services.
//!
//! - [`result::ResultCache`]: category results with TTL-based validity

pub mod result;

pub use result::{CacheEntry, CacheLookup, ResultCache, StaleReason, DEFAULT_TTL};
