//! Report source port: one location of a JSON report file.

use async_trait::async_trait;

use crate::error::Result;

/// A single place a JSON report can be loaded from.
///
/// Sources are tried in priority order by
/// [`ReportChain`](crate::application::report::ReportChain).
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Human-readable location, used in logs and error summaries.
    fn name(&self) -> &str;

    /// Load and parse the report.
    async fn fetch(&self) -> Result<serde_json::Value>;
}
