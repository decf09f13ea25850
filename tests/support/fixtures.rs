use std::sync::Arc;

use govgraph::application::crawler::DelegationCrawler;
use govgraph::application::orchestration::FetchOrchestrator;
use govgraph::testkit::config;
use govgraph::testkit::domain::account;
use govgraph::testkit::ledger::MockLedger;

/// Ledger at block 100 where accounts 1 and 2 delegate 300 of 1000 tokens to account 9.
pub fn two_delegators() -> MockLedger {
    MockLedger::new(100, 1000)
        .with_delegation(account(1), account(9), 100)
        .with_delegation(account(2), account(9), 200)
}

/// Orchestrator with only a delegation crawler over `ledger`.
pub fn delegation_orchestrator(ledger: Arc<MockLedger>) -> Arc<FetchOrchestrator> {
    let crawler = DelegationCrawler::new(ledger, config::crawler(vec![account(1), account(2)]));
    Arc::new(FetchOrchestrator::builder().collector(Arc::new(crawler)).build())
}
