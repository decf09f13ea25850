//! The delegation crawler and the ledger context it is pinned to.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, trace, warn};

use super::aggregate::build_result;
use super::config::CrawlerConfig;
use super::discovery::{scan_window, Discovery, SeedSource};
use crate::application::cancel::CancelToken;
use crate::application::collector::Collector;
use crate::application::orchestration::RequestContext;
use crate::domain::{Account, Category, CrawlResult, DelegationEdge, Payload, TokenAmount};
use crate::error::{Error, Result};
use crate::port::{DelegationHelper, EventKind, LedgerClient};

/// Block height and supply every query of a crawl is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlContext {
    pub block: u64,
    pub total_supply: TokenAmount,
}

/// Read the block height and total supply a crawl is pinned to.
///
/// # Errors
///
/// [`Error::SourceUnavailable`] if either query fails, [`Error::Cancelled`]
/// if `cancel` fires first.
pub async fn pin_context(ledger: &dyn LedgerClient, cancel: &CancelToken) -> Result<CrawlContext> {
    cancel.check()?;
    let block = ledger
        .current_block()
        .await
        .map_err(|e| Error::SourceUnavailable {
            reason: format!("current block: {e}"),
        })?;

    cancel.check()?;
    let total_supply = ledger
        .total_supply(block)
        .await
        .map_err(|e| Error::SourceUnavailable {
            reason: format!("total supply at block {block}: {e}"),
        })?;

    Ok(CrawlContext {
        block,
        total_supply,
    })
}

/// Discovers delegation edges and aggregates them per delegate.
pub struct DelegationCrawler {
    ledger: Arc<dyn LedgerClient>,
    helper: Option<Arc<dyn DelegationHelper>>,
    config: CrawlerConfig,
}

impl DelegationCrawler {
    #[must_use]
    pub fn new(ledger: Arc<dyn LedgerClient>, config: CrawlerConfig) -> Self {
        Self {
            ledger,
            helper: None,
            config,
        }
    }

    /// Attach the optional depth / concentration helper.
    #[must_use]
    pub fn with_helper(mut self, helper: Arc<dyn DelegationHelper>) -> Self {
        self.helper = Some(helper);
        self
    }

    #[must_use]
    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Run one crawl. `seeds` are visited before any configured or discovered account.
    ///
    /// # Errors
    ///
    /// [`Error::SourceUnavailable`] when the block height or total supply
    /// cannot be read; [`Error::Cancelled`] when `cancel` fires. Individual
    /// account failures are logged and skipped.
    pub async fn crawl(&self, seeds: &[Account], cancel: &CancelToken) -> Result<CrawlResult> {
        let ctx = pin_context(self.ledger.as_ref(), cancel).await?;
        info!(
            ledger = self.ledger.name(),
            block = ctx.block,
            total_supply = %ctx.total_supply,
            seeds = seeds.len(),
            "Delegation crawl started"
        );

        let mut discovery = Discovery::new();

        let important: Vec<Account> = seeds
            .iter()
            .chain(&self.config.important_accounts)
            .cloned()
            .collect();
        self.visit_all(&important, SeedSource::Important, &ctx, &mut discovery, cancel)
            .await?;

        let changed = scan_window(
            self.ledger.as_ref(),
            EventKind::DelegateChanged,
            self.config.delegate_changed_lookback_blocks,
            ctx.block,
            cancel,
        )
        .await?;
        self.visit_all(&changed, SeedSource::DelegateEvents, &ctx, &mut discovery, cancel)
            .await?;

        if let Some(helper) = &self.helper {
            let ranked = self.helper_seeds(helper.as_ref(), cancel).await?;
            self.visit_all(&ranked, SeedSource::Helper, &ctx, &mut discovery, cancel)
                .await?;
        }

        if discovery.edges.len() < self.config.min_edges_before_transfer_scan {
            debug!(
                edges = discovery.edges.len(),
                threshold = self.config.min_edges_before_transfer_scan,
                "Too few edges, widening search to transfers"
            );
            let transfers = scan_window(
                self.ledger.as_ref(),
                EventKind::Transfer,
                self.config.transfer_lookback_blocks,
                ctx.block,
                cancel,
            )
            .await?;
            let capped: Vec<Account> = transfers
                .into_iter()
                .filter(|account| !discovery.is_visited(account))
                .take(self.config.max_transfer_accounts)
                .collect();
            self.visit_all(&capped, SeedSource::Transfers, &ctx, &mut discovery, cancel)
                .await?;
        }

        let Discovery { edges, stats, .. } = discovery;
        let result = build_result(
            edges,
            ctx.total_supply,
            self.config.top_delegates,
            ctx.block,
            Utc::now(),
        );

        info!(
            block = result.observed_at_block,
            edges = result.edges.len(),
            delegates = result.unique_delegate_count,
            accounts_queried = stats.accounts_queried,
            failed_queries = stats.failed_queries,
            important_seeds = stats.important_seeds,
            event_seeds = stats.event_seeds,
            helper_seeds = stats.helper_seeds,
            transfer_seeds = stats.transfer_seeds,
            "Delegation crawl finished"
        );
        Ok(result)
    }

    async fn visit_all(
        &self,
        accounts: &[Account],
        source: SeedSource,
        ctx: &CrawlContext,
        discovery: &mut Discovery,
        cancel: &CancelToken,
    ) -> Result<()> {
        discovery.stats.record_seeds(source, accounts.len());
        for account in accounts {
            self.visit(account, ctx, discovery, cancel).await?;
        }
        Ok(())
    }

    /// Resolve one account's delegation edge.
    async fn visit(
        &self,
        account: &Account,
        ctx: &CrawlContext,
        discovery: &mut Discovery,
        cancel: &CancelToken,
    ) -> Result<()> {
        cancel.check()?;
        if account.is_zero() || !discovery.mark_visited(account) {
            return Ok(());
        }
        discovery.stats.accounts_queried += 1;

        let (delegate, balance) = tokio::join!(
            self.ledger.delegate_of(account, ctx.block),
            self.ledger.balance_of(account, ctx.block),
        );
        let (delegate, balance) = match (delegate, balance) {
            (Ok(delegate), Ok(balance)) => (delegate, balance),
            (Err(e), _) | (_, Err(e)) => {
                warn!(account = %account, error = %e, "Account query failed, skipping");
                discovery.stats.failed_queries += 1;
                return Ok(());
            }
        };

        let Some(delegate) = delegate else {
            trace!(account = %account, "No delegate");
            return Ok(());
        };
        let Some(mut edge) = DelegationEdge::try_new(account.clone(), delegate, balance, 1) else {
            trace!(account = %account, "Self-delegated, undelegated or empty balance");
            return Ok(());
        };

        edge.depth = self.resolve_depth(account, ctx.block, cancel).await?;
        trace!(
            delegator = %edge.delegator,
            delegate = %edge.delegate,
            power = %edge.voting_power,
            depth = edge.depth,
            "Edge recorded"
        );
        discovery.edges.push(edge);
        Ok(())
    }

    /// Depth from the helper, or 1 when there is no helper or it fails.
    async fn resolve_depth(&self, account: &Account, block: u64, cancel: &CancelToken) -> Result<u32> {
        let Some(helper) = &self.helper else {
            return Ok(1);
        };
        cancel.check()?;
        match helper.delegation_depth(account, block).await {
            Ok(depth) => Ok(depth.max(1)),
            Err(e) => {
                debug!(account = %account, error = %e, "Depth lookup failed, using 1");
                Ok(1)
            }
        }
    }

    /// Helper-ranked delegates followed by up to `delegator_fan_out` of their delegators each.
    async fn helper_seeds(
        &self,
        helper: &dyn DelegationHelper,
        cancel: &CancelToken,
    ) -> Result<Vec<Account>> {
        cancel.check()?;
        let ranked = match helper
            .top_delegates_by_concentration(self.config.helper_top_delegates)
            .await
        {
            Ok(ranked) => ranked,
            Err(e) => {
                warn!(error = %e, "Top delegate lookup failed");
                return Ok(Vec::new());
            }
        };

        let mut seeds = Vec::new();
        for delegate in ranked {
            cancel.check()?;
            match self.ledger.delegators_of(&delegate).await {
                Ok(delegators) => {
                    seeds.push(delegate);
                    seeds.extend(delegators.into_iter().take(self.config.delegator_fan_out));
                }
                Err(e) => {
                    debug!(delegate = %delegate, error = %e, "Delegator enumeration unavailable");
                    seeds.push(delegate);
                }
            }
        }
        Ok(seeds)
    }
}

#[async_trait]
impl Collector for DelegationCrawler {
    fn category(&self) -> Category {
        Category::Delegation
    }

    async fn collect(&self, ctx: &RequestContext) -> Result<Payload> {
        self.crawl(&ctx.important_accounts, &ctx.cancel)
            .await
            .map(Payload::Delegation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cancel::CancelSource;
    use crate::testkit::domain::account;
    use crate::testkit::ledger::{MockHelper, MockLedger};
    use rust_decimal_macros::dec;

    fn crawler(ledger: MockLedger) -> (DelegationCrawler, Arc<MockLedger>) {
        let ledger = Arc::new(ledger);
        let config = CrawlerConfig {
            min_edges_before_transfer_scan: 0,
            ..CrawlerConfig::default()
        };
        (DelegationCrawler::new(ledger.clone(), config), ledger)
    }

    #[tokio::test]
    async fn three_delegators_scenario() {
        let ledger = MockLedger::new(500, 1000)
            .with_delegation(account(1), account(9), 100)
            .with_delegation(account(2), account(9), 200)
            .with_delegation(account(3), account(9), 50)
            .with_self_delegation(account(9), 10);
        let (crawler, _) = crawler(ledger);

        let seeds = [account(1), account(2), account(3), account(9)];
        let result = crawler.crawl(&seeds, &CancelToken::never()).await.unwrap();

        assert_eq!(result.edges.len(), 3);
        assert_eq!(result.top_delegates.len(), 1);
        let d = &result.top_delegates[0];
        assert_eq!(d.address, account(9));
        assert_eq!(d.delegated_power, TokenAmount::from_tokens(350));
        assert_eq!(d.delegator_count, 3);
        assert_eq!(d.percentage, dec!(0.35));
        assert_eq!(result.observed_at_block, 500);
    }

    #[tokio::test]
    async fn delegation_to_zero_account_is_dropped() {
        let ledger = MockLedger::new(10, 1000).with_delegation(account(1), Account::zero(), 100);
        let (crawler, _) = crawler(ledger);

        let result = crawler.crawl(&[account(1)], &CancelToken::never()).await.unwrap();
        assert!(result.edges.is_empty());
        assert_eq!(result.unique_delegator_count, 0);
    }

    #[tokio::test]
    async fn repeated_seeds_are_queried_once() {
        let upper = Account::new("0xABCDEF0000000000000000000000000000000001");
        let lower = Account::new("0xabcdef0000000000000000000000000000000001");
        let ledger = MockLedger::new(10, 1000).with_delegation(lower.clone(), account(9), 100);
        let (crawler, ledger) = crawler(ledger);

        let seeds = [upper.clone(), lower.clone(), upper];
        let result = crawler.crawl(&seeds, &CancelToken::never()).await.unwrap();
        assert_eq!(result.edges.len(), 1);
        assert_eq!(ledger.balance_calls(), 1);
    }

    #[tokio::test]
    async fn failing_depth_helper_falls_back_to_one() {
        let ledger = MockLedger::new(10, 1000)
            .with_delegation(account(1), account(9), 100)
            .with_delegation(account(2), account(9), 100);
        let helper = MockHelper::new()
            .with_depth(account(2), 3)
            .with_failing_depth(account(1));
        let (crawler, _) = crawler(ledger);
        let crawler = crawler.with_helper(Arc::new(helper));

        let result = crawler
            .crawl(&[account(1), account(2)], &CancelToken::never())
            .await
            .unwrap();
        assert_eq!(result.edges.len(), 2);
        assert_eq!(result.edges[0].delegator, account(1));
        assert_eq!(result.edges[0].depth, 1);
        assert_eq!(result.edges[1].depth, 3);
    }

    #[tokio::test]
    async fn account_failures_are_not_fatal() {
        let ledger = MockLedger::new(10, 1000)
            .with_delegation(account(1), account(9), 100)
            .with_delegation(account(2), account(9), 100)
            .with_failing_account(account(1));
        let (crawler, _) = crawler(ledger);

        let result = crawler
            .crawl(&[account(1), account(2)], &CancelToken::never())
            .await
            .unwrap();
        assert_eq!(result.edges.len(), 1);
        assert_eq!(result.edges[0].delegator, account(2));
    }

    #[tokio::test]
    async fn unavailable_supply_fails_the_crawl() {
        let ledger = MockLedger::new(10, 1000).with_failing_supply();
        let (crawler, _) = crawler(ledger);
        let err = crawler.crawl(&[], &CancelToken::never()).await.unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn cancelled_crawl_stops_before_querying() {
        let ledger = MockLedger::new(10, 1000).with_delegation(account(1), account(9), 100);
        let (crawler, ledger) = crawler(ledger);
        let source = CancelSource::new();
        source.cancel();

        let err = crawler.crawl(&[account(1)], &source.token()).await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(ledger.balance_calls(), 0);
    }

    #[tokio::test]
    async fn delegate_changed_events_seed_the_crawl() {
        let ledger = MockLedger::new(1000, 1000)
            .with_delegation(account(1), account(9), 40)
            .with_delegate_changed(account(1), Account::zero(), account(9), 990);
        let (crawler, _) = crawler(ledger);

        let result = crawler.crawl(&[], &CancelToken::never()).await.unwrap();
        assert_eq!(result.edges.len(), 1);
        assert_eq!(result.edges[0].voting_power, TokenAmount::from_tokens(40));
    }

    #[tokio::test]
    async fn transfer_scan_runs_only_below_threshold() {
        let ledger = MockLedger::new(1000, 1000)
            .with_delegation(account(1), account(9), 40)
            .with_delegation(account(2), account(9), 60)
            .with_transfer(account(1), account(2), 5, 900);
        let ledger = Arc::new(ledger);

        let eager = DelegationCrawler::new(
            ledger.clone(),
            CrawlerConfig {
                min_edges_before_transfer_scan: 5,
                ..CrawlerConfig::default()
            },
        );
        let result = eager.crawl(&[], &CancelToken::never()).await.unwrap();
        assert_eq!(result.edges.len(), 2);

        let satisfied = DelegationCrawler::new(
            ledger,
            CrawlerConfig {
                min_edges_before_transfer_scan: 1,
                important_accounts: vec![account(1)],
                ..CrawlerConfig::default()
            },
        );
        let result = satisfied.crawl(&[], &CancelToken::never()).await.unwrap();
        assert_eq!(result.edges.len(), 1);
    }

    #[tokio::test]
    async fn transfer_accounts_are_capped() {
        let mut ledger = MockLedger::new(1000, 100_000);
        for n in 1..=10u8 {
            ledger = ledger
                .with_delegation(account(n), account(200), 10)
                .with_transfer(account(n), Account::zero(), 1, 999);
        }
        let crawler = DelegationCrawler::new(
            Arc::new(ledger),
            CrawlerConfig {
                min_edges_before_transfer_scan: 100,
                max_transfer_accounts: 4,
                ..CrawlerConfig::default()
            },
        );
        let result = crawler.crawl(&[], &CancelToken::never()).await.unwrap();
        assert_eq!(result.edges.len(), 4);
    }

    #[tokio::test]
    async fn helper_ranking_adds_delegators() {
        let ledger = MockLedger::new(1000, 1000)
            .with_delegation(account(1), account(9), 70)
            .with_delegation(account(2), account(9), 30)
            .with_self_delegation(account(9), 5)
            .with_delegators(account(9), vec![account(1), account(2)]);
        let helper = MockHelper::new().with_top_delegates(vec![account(9)]);
        let (crawler, _) = crawler(ledger);
        let crawler = crawler.with_helper(Arc::new(helper));

        let result = crawler.crawl(&[], &CancelToken::never()).await.unwrap();
        assert_eq!(result.edges.len(), 2);
        assert_eq!(result.top_delegates[0].delegator_count, 2);
    }
}
