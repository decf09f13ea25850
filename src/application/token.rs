//! Token supply collector.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::application::collector::Collector;
use crate::application::crawler::{pin_context, scan_window, CrawlerConfig};
use crate::application::orchestration::RequestContext;
use crate::domain::metrics::tokens_per_holder;
use crate::domain::{Category, Payload, TokenStats};
use crate::error::Result;
use crate::port::{EventKind, LedgerClient};

/// Reads total supply and samples holders from the recent transfer window.
///
/// Shares the crawler's transfer window and account cap so both collectors
/// put the same load on the ledger.
pub struct TokenCollector {
    ledger: Arc<dyn LedgerClient>,
    transfer_lookback_blocks: u64,
    max_accounts: usize,
}

impl TokenCollector {
    #[must_use]
    pub fn new(ledger: Arc<dyn LedgerClient>, config: &CrawlerConfig) -> Self {
        Self {
            ledger,
            transfer_lookback_blocks: config.transfer_lookback_blocks,
            max_accounts: config.max_transfer_accounts,
        }
    }
}

#[async_trait]
impl Collector for TokenCollector {
    fn category(&self) -> Category {
        Category::Token
    }

    async fn collect(&self, ctx: &RequestContext) -> Result<Payload> {
        let pinned = pin_context(self.ledger.as_ref(), &ctx.cancel).await?;
        let accounts = scan_window(
            self.ledger.as_ref(),
            EventKind::Transfer,
            self.transfer_lookback_blocks,
            pinned.block,
            &ctx.cancel,
        )
        .await?;

        let mut holder_count = 0u64;
        for account in accounts.iter().take(self.max_accounts) {
            ctx.cancel.check()?;
            match self.ledger.balance_of(account, pinned.block).await {
                Ok(balance) if !balance.is_zero() => holder_count += 1,
                Ok(_) => {}
                Err(e) => debug!(account = %account, error = %e, "Balance lookup failed, skipping"),
            }
        }

        let stats = TokenStats {
            total_supply: pinned.total_supply,
            holder_count,
            tokens_per_holder: tokens_per_holder(pinned.total_supply, holder_count),
            observed_at_block: pinned.block,
            produced_at: Utc::now(),
        };
        info!(
            block = stats.observed_at_block,
            holders = stats.holder_count,
            total_supply = %stats.total_supply,
            "Token stats collected"
        );
        Ok(Payload::Token(stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, TokenAmount};
    use crate::testkit::domain::account;
    use crate::testkit::ledger::MockLedger;

    #[tokio::test]
    async fn counts_holders_with_nonzero_balance() {
        let ledger = MockLedger::new(1000, 900)
            .with_delegation(account(1), account(9), 100)
            .with_delegation(account(2), account(9), 50)
            .with_transfer(account(1), account(2), 5, 995)
            .with_transfer(account(3), Account::zero(), 5, 996);
        let collector = TokenCollector::new(Arc::new(ledger), &CrawlerConfig::default());

        let payload = collector.collect(&RequestContext::detached()).await.unwrap();
        let Payload::Token(stats) = payload else {
            panic!("expected token payload");
        };
        assert_eq!(stats.holder_count, 2);
        assert_eq!(stats.total_supply, TokenAmount::from_tokens(900));
        assert_eq!(stats.tokens_per_holder, TokenAmount::from_tokens(450));
        assert_eq!(stats.observed_at_block, 1000);
    }

    #[tokio::test]
    async fn no_transfers_means_no_holders() {
        let collector =
            TokenCollector::new(Arc::new(MockLedger::new(10, 100)), &CrawlerConfig::default());
        let Payload::Token(stats) = collector.collect(&RequestContext::detached()).await.unwrap() else {
            panic!("expected token payload");
        };
        assert_eq!(stats.holder_count, 0);
        assert!(stats.tokens_per_holder.is_zero());
    }
}
