//! Remote precomputed-results port.

use async_trait::async_trait;

use crate::domain::{Category, Payload};
use crate::error::Result;

/// Service that serves results computed elsewhere (an indexer or API).
///
/// The orchestrator bounds every call with a timeout and treats any failure as
/// a reason to fall back to collecting locally.
#[async_trait]
pub trait PrecomputedSource: Send + Sync {
    /// Return the source name for logging.
    fn name(&self) -> &str;

    /// Fetch the latest result for `category`.
    ///
    /// Returns `Ok(None)` when the source has nothing for the category.
    async fn fetch(&self, category: Category) -> Result<Option<Payload>>;
}
