//! Composition root: wires configured adapters into a [`FetchOrchestrator`].

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::remote::HttpPrecomputedSource;
use crate::adapter::outbound::report::{FileReportSource, HttpReportSource};
use crate::application::cache::ResultCache;
use crate::application::crawler::DelegationCrawler;
use crate::application::orchestration::FetchOrchestrator;
use crate::application::report::{ReportChain, ReportCollector};
use crate::application::token::TokenCollector;
use crate::domain::Category;
use crate::error::Result;
use crate::infrastructure::config::report::{ReportConfig, ReportSourceConfig};
use crate::infrastructure::config::settings::Config;
use crate::port::{DelegationHelper, LedgerClient, ReportSource};

/// Build the report fallback chain from configuration.
///
/// # Errors
///
/// Returns an error if an HTTP source URL does not parse.
pub fn build_report_chain(config: &ReportConfig) -> Result<ReportChain> {
    let mut chain = ReportChain::default();
    for source in &config.sources {
        let source: Arc<dyn ReportSource> = match source {
            ReportSourceConfig::File { path } => Arc::new(FileReportSource::new(path)),
            ReportSourceConfig::Http { url } => Arc::new(HttpReportSource::new(url)?),
        };
        chain = chain.with_source(source);
    }
    Ok(chain)
}

/// Build the orchestrator with every collector the configuration enables.
///
/// The delegation and token collectors always run against `ledger`; report
/// categories are served only when report sources are configured.
///
/// # Errors
///
/// Returns an error if a configured URL does not parse.
pub fn build_orchestrator(
    config: &Config,
    ledger: Arc<dyn LedgerClient>,
    helper: Option<Arc<dyn DelegationHelper>>,
) -> Result<FetchOrchestrator> {
    let mut crawler = DelegationCrawler::new(Arc::clone(&ledger), config.crawler.clone());
    if let Some(helper) = helper {
        crawler = crawler.with_helper(helper);
    }

    let mut builder = FetchOrchestrator::builder()
        .cache(Arc::new(ResultCache::new(config.cache.ttl())))
        .remote_timeout(config.remote.timeout())
        .collector(Arc::new(crawler))
        .collector(Arc::new(TokenCollector::new(ledger, &config.crawler)));

    if !config.report.sources.is_empty() {
        let chain = Arc::new(build_report_chain(&config.report)?);
        builder = builder
            .collector(Arc::new(ReportCollector::new(
                Category::CurrentStats,
                Arc::clone(&chain),
            )))
            .collector(Arc::new(
                ReportCollector::new(Category::Proposal, Arc::clone(&chain))
                    .with_section(config.report.proposal_section.as_str()),
            ))
            .collector(Arc::new(
                ReportCollector::new(Category::Timelock, chain)
                    .with_section(config.report.timelock_section.as_str()),
            ));
        info!(sources = config.report.sources.len(), "Report collectors enabled");
    }

    if let Some(base_url) = &config.remote.base_url {
        let remote = HttpPrecomputedSource::new(base_url, config.crawler.top_delegates)?;
        builder = builder.remote(Arc::new(remote));
        info!(base_url = %base_url, "Remote precomputed source enabled");
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::ledger::MockLedger;

    #[test]
    fn report_collectors_need_sources() {
        let ledger: Arc<dyn LedgerClient> = Arc::new(MockLedger::new(1, 1));
        let orch = build_orchestrator(&Config::default(), Arc::clone(&ledger), None).unwrap();
        assert_eq!(orch.categories(), vec![Category::Token, Category::Delegation]);

        let config = Config::parse_toml(
            "[report]\nsources = [{ type = \"file\", path = \"stats.json\" }]\n",
        )
        .unwrap();
        let orch = build_orchestrator(&config, ledger, None).unwrap();
        assert_eq!(orch.categories().len(), 5);
    }

    #[test]
    fn invalid_remote_url_fails() {
        let config = Config::parse_toml("[remote]\nbase_url = \"::nope\"\n").unwrap();
        let ledger: Arc<dyn LedgerClient> = Arc::new(MockLedger::new(1, 1));
        assert!(build_orchestrator(&config, ledger, None).is_err());
    }
}
