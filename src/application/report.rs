//! JSON report loading with source fallback.
//!
//! A report (e.g. the "current stats" file) may be published in several
//! places. [`ReportChain`] tries them in priority order and returns the first
//! one that loads; [`ReportCollector`] serves a category from it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::application::cancel::CancelToken;
use crate::application::collector::Collector;
use crate::application::orchestration::RequestContext;
use crate::domain::{Category, Payload};
use crate::error::{Error, Result};
use crate::port::ReportSource;

/// Report sources in priority order.
#[derive(Clone, Default)]
pub struct ReportChain {
    sources: Vec<Arc<dyn ReportSource>>,
}

impl ReportChain {
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn ReportSource>>) -> Self {
        Self { sources }
    }

    /// Append a lower-priority source.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn ReportSource>) -> Self {
        self.sources.push(source);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Load the report from the first source that succeeds.
    ///
    /// # Errors
    ///
    /// [`Error::AllSourcesFailed`] naming every source and its failure, or
    /// [`Error::Cancelled`] if `cancel` fires first.
    pub async fn fetch(&self, cancel: &CancelToken) -> Result<serde_json::Value> {
        let mut attempts = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            cancel.check()?;
            let outcome = tokio::select! {
                () = cancel.cancelled() => return Err(Error::Cancelled),
                outcome = source.fetch() => outcome,
            };
            match outcome {
                Ok(report) => {
                    info!(source = source.name(), failed_before = attempts.len(), "Report loaded");
                    return Ok(report);
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Report source failed, trying next");
                    attempts.push(format!("{}: {e}", source.name()));
                }
            }
        }

        Err(Error::AllSourcesFailed { attempts })
    }
}

/// Serves a category from a report, optionally from one top-level section.
pub struct ReportCollector {
    category: Category,
    chain: Arc<ReportChain>,
    section: Option<String>,
}

impl ReportCollector {
    /// Serve the whole report as `category`.
    #[must_use]
    pub fn new(category: Category, chain: Arc<ReportChain>) -> Self {
        Self {
            category,
            chain,
            section: None,
        }
    }

    /// Serve only the `section` key of the report.
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }
}

#[async_trait]
impl Collector for ReportCollector {
    fn category(&self) -> Category {
        self.category
    }

    async fn collect(&self, ctx: &RequestContext) -> Result<Payload> {
        let mut report = self.chain.fetch(&ctx.cancel).await?;
        let value = match &self.section {
            Some(section) => match report.get_mut(section.as_str()) {
                Some(value) => value.take(),
                None => {
                    debug!(category = %self.category, section = %section, "Report section missing");
                    serde_json::Value::Null
                }
            },
            None => report,
        };
        Ok(Payload::Report(value))
    }
}
