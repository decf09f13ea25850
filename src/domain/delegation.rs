//! Delegation graph types: edges, per-delegate aggregates and crawl results.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::Account;
use super::amount::TokenAmount;

/// `delegator` has assigned its balance-derived voting power to `delegate`.
///
/// Never constructed for self-delegation or delegation to the zero account;
/// see [`DelegationEdge::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationEdge {
    pub delegator: Account,
    pub delegate: Account,
    pub voting_power: TokenAmount,
    /// Delegation depth reported by the helper service, 1 when unknown.
    /// Carried for display; no metric is weighted by it.
    pub depth: u32,
}

impl DelegationEdge {
    /// Build an edge, or `None` when the relationship is not a graph edge:
    /// zero balance, self-delegation or delegation to the zero account.
    #[must_use]
    pub fn try_new(
        delegator: Account,
        delegate: Account,
        voting_power: TokenAmount,
        depth: u32,
    ) -> Option<Self> {
        if voting_power.is_zero() || delegate.is_zero() || delegate == delegator {
            return None;
        }
        Some(Self {
            delegator,
            delegate,
            voting_power,
            depth: depth.max(1),
        })
    }
}

/// Incoming delegation summed for one delegate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateAggregate {
    pub address: Account,
    pub delegated_power: TokenAmount,
    pub delegator_count: u64,
    /// `delegated_power / total_supply`, in `[0, 1]`.
    pub percentage: Decimal,
}

/// Output of one delegation crawl at a fixed block height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// Edges in discovery order.
    pub edges: Vec<DelegationEdge>,
    /// Largest delegates first, truncated to the configured top-N.
    pub top_delegates: Vec<DelegateAggregate>,
    pub total_supply: TokenAmount,
    pub total_delegated: TokenAmount,
    pub percentage_delegated: Decimal,
    pub top5_concentration: Decimal,
    /// Distinct delegates before top-N truncation.
    pub unique_delegate_count: u64,
    pub unique_delegator_count: u64,
    pub observed_at_block: u64,
    pub produced_at: DateTime<Utc>,
}

impl CrawlResult {
    /// A crawl that found no edges is treated as failed by the cache.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(n: u8) -> Account {
        Account::new(format!("0x{:040x}", n))
    }

    #[test]
    fn self_delegation_is_not_an_edge() {
        let lower = Account::new("0xabcdef0000000000000000000000000000000001");
        let upper = Account::new("0xABCDEF0000000000000000000000000000000001");
        assert!(DelegationEdge::try_new(lower, upper, TokenAmount::from_tokens(1), 1).is_none());
    }

    #[test]
    fn zero_account_and_zero_balance_are_not_edges() {
        assert!(
            DelegationEdge::try_new(account(1), Account::zero(), TokenAmount::from_tokens(1), 1)
                .is_none()
        );
        assert!(DelegationEdge::try_new(account(1), account(2), TokenAmount::ZERO, 1).is_none());
    }

    #[test]
    fn depth_is_at_least_one() {
        let edge =
            DelegationEdge::try_new(account(1), account(2), TokenAmount::from_tokens(1), 0).unwrap();
        assert_eq!(edge.depth, 1);
    }
}
