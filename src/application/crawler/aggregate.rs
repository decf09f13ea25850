//! Aggregation of delegation edges into per-delegate totals.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::domain::metrics::{self, CONCENTRATION_TOP_N};
use crate::domain::{Account, CrawlResult, DelegateAggregate, DelegationEdge, TokenAmount};

/// Per-delegate totals for a set of edges, before truncation.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Largest first; equal totals keep first-discovered order.
    pub delegates: Vec<DelegateAggregate>,
    pub total_delegated: TokenAmount,
    pub unique_delegators: u64,
}

/// Group `edges` by delegate and rank the groups.
#[must_use]
pub fn aggregate(edges: &[DelegationEdge], total_supply: TokenAmount) -> Aggregation {
    let mut index: HashMap<&Account, usize> = HashMap::new();
    let mut delegates: Vec<DelegateAggregate> = Vec::new();
    let mut delegators_per_delegate: Vec<HashSet<&Account>> = Vec::new();
    let mut all_delegators: HashSet<&Account> = HashSet::new();
    let mut total_delegated = TokenAmount::ZERO;

    for edge in edges {
        let slot = *index.entry(&edge.delegate).or_insert_with(|| {
            delegates.push(DelegateAggregate {
                address: edge.delegate.clone(),
                delegated_power: TokenAmount::ZERO,
                delegator_count: 0,
                percentage: rust_decimal::Decimal::ZERO,
            });
            delegators_per_delegate.push(HashSet::new());
            delegates.len() - 1
        });

        delegates[slot].delegated_power += edge.voting_power;
        delegators_per_delegate[slot].insert(&edge.delegator);
        all_delegators.insert(&edge.delegator);
        total_delegated += edge.voting_power;
    }

    for (aggregate, delegators) in delegates.iter_mut().zip(&delegators_per_delegate) {
        aggregate.delegator_count = delegators.len() as u64;
        aggregate.percentage = aggregate.delegated_power.ratio(total_supply);
    }

    // sort_by is stable, so ties keep discovery order
    delegates.sort_by(|a, b| b.delegated_power.cmp(&a.delegated_power));

    Aggregation {
        delegates,
        total_delegated,
        unique_delegators: all_delegators.len() as u64,
    }
}

/// Build the full crawl result for `edges` observed at `block`.
#[must_use]
pub fn build_result(
    edges: Vec<DelegationEdge>,
    total_supply: TokenAmount,
    top_n: usize,
    block: u64,
    produced_at: DateTime<Utc>,
) -> CrawlResult {
    let Aggregation {
        mut delegates,
        total_delegated,
        unique_delegators,
    } = aggregate(&edges, total_supply);

    let unique_delegate_count = delegates.len() as u64;
    let top5_concentration = metrics::top_n_concentration(&delegates, CONCENTRATION_TOP_N);
    delegates.truncate(top_n);

    CrawlResult {
        edges,
        top_delegates: delegates,
        total_supply,
        total_delegated,
        percentage_delegated: metrics::percentage_delegated(total_delegated, total_supply),
        top5_concentration,
        unique_delegate_count,
        unique_delegator_count: unique_delegators,
        observed_at_block: block,
        produced_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{account, edge};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn three_delegators_to_one_delegate() {
        let edges = vec![edge(1, 9, 100), edge(2, 9, 200), edge(3, 9, 50)];
        let result = build_result(edges, TokenAmount::from_tokens(1000), 20, 42, Utc::now());

        assert_eq!(result.top_delegates.len(), 1);
        let d = &result.top_delegates[0];
        assert_eq!(d.address, account(9));
        assert_eq!(d.delegated_power, TokenAmount::from_tokens(350));
        assert_eq!(d.delegator_count, 3);
        assert_eq!(d.percentage, dec!(0.35));
        assert_eq!(result.percentage_delegated, dec!(0.35));
        assert_eq!(result.unique_delegator_count, 3);
        assert_eq!(result.observed_at_block, 42);
    }

    #[test]
    fn zero_supply_yields_zero_percentages() {
        let edges = vec![edge(1, 9, 100), edge(2, 8, 5)];
        let result = build_result(edges, TokenAmount::ZERO, 20, 1, Utc::now());
        assert_eq!(result.percentage_delegated, Decimal::ZERO);
        assert_eq!(result.top5_concentration, Decimal::ZERO);
        assert!(result.top_delegates.iter().all(|d| d.percentage.is_zero()));
    }

    #[test]
    fn ties_keep_discovery_order() {
        let edges = vec![edge(1, 7, 10), edge(2, 8, 30), edge(3, 9, 10), edge(4, 6, 10)];
        let aggregation = aggregate(&edges, TokenAmount::from_tokens(100));
        let order: Vec<_> = aggregation.delegates.iter().map(|d| d.address.clone()).collect();
        assert_eq!(order, vec![account(8), account(7), account(9), account(6)]);
    }

    #[test]
    fn truncation_keeps_untruncated_count() {
        let edges: Vec<_> = (1..=30u8).map(|n| edge(n, 100 + n, u64::from(n))).collect();
        let result = build_result(edges, TokenAmount::from_tokens(10_000), 20, 1, Utc::now());
        assert_eq!(result.top_delegates.len(), 20);
        assert_eq!(result.unique_delegate_count, 30);
        assert_eq!(result.top_delegates[0].address, account(130));
    }

    #[test]
    fn delegate_totals_conserve_edge_sum() {
        let edges = vec![
            edge(1, 9, 17),
            edge(2, 8, 23),
            edge(3, 9, 5),
            edge(4, 7, 1),
            edge(5, 8, 99),
        ];
        let edge_sum: TokenAmount = edges.iter().map(|e| e.voting_power).sum();
        let aggregation = aggregate(&edges, TokenAmount::from_tokens(1000));
        let aggregate_sum: TokenAmount =
            aggregation.delegates.iter().map(|d| d.delegated_power).sum();
        assert_eq!(aggregate_sum, edge_sum);
        assert_eq!(aggregation.total_delegated, edge_sum);
    }

    #[test]
    fn concentration_covers_first_five() {
        let edges: Vec<_> = (1..=7u8).map(|n| edge(n, 50 + n, 100)).collect();
        let result = build_result(edges, TokenAmount::from_tokens(1000), 3, 1, Utc::now());
        assert_eq!(result.top_delegates.len(), 3);
        assert_eq!(result.top5_concentration, dec!(0.5));
    }
}
