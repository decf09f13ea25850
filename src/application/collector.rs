//! Collector extension point: produces the result for one category.

use async_trait::async_trait;

use crate::application::orchestration::RequestContext;
use crate::domain::{Category, Payload};
use crate::error::Result;

/// Computes a category's result from primary sources.
///
/// The orchestrator calls a collector only after the cache and the remote
/// precomputed source have both come up empty. Implementations must check
/// `ctx.cancel` before every external call.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Category this collector produces.
    fn category(&self) -> Category;

    /// Produce a fresh result.
    async fn collect(&self, ctx: &RequestContext) -> Result<Payload>;
}
