//! Derived reporting metrics.
//!
//! Pure, deterministic functions over aggregates. Every ratio is defined as
//! zero when its divisor is zero, so none of these can fault on an empty or
//! freshly deployed token.

use rust_decimal::{Decimal, RoundingStrategy};

use super::amount::{TokenAmount, RATIO_DECIMALS};
use super::delegation::DelegateAggregate;

/// Number of leading delegates used for the concentration health indicator.
pub const CONCENTRATION_TOP_N: usize = 5;

/// Share of total supply that is delegated.
#[must_use]
pub fn percentage_delegated(total_delegated: TokenAmount, total_supply: TokenAmount) -> Decimal {
    total_delegated.ratio(total_supply)
}

/// Sum of `percentage` over the first `n` aggregates.
///
/// Expects `aggregates` already sorted largest first.
#[must_use]
pub fn top_n_concentration(aggregates: &[DelegateAggregate], n: usize) -> Decimal {
    aggregates.iter().take(n).map(|a| a.percentage).sum()
}

/// Delegates per token holder.
#[must_use]
pub fn delegate_to_holder_ratio(delegates: u64, holders: u64) -> Decimal {
    count_ratio(delegates, holders)
}

/// Average delegated power per delegate.
#[must_use]
pub fn tokens_per_delegate(total_delegated: TokenAmount, delegates: u64) -> TokenAmount {
    total_delegated.per(delegates)
}

/// Average balance per holder.
#[must_use]
pub fn tokens_per_holder(total_supply: TokenAmount, holders: u64) -> TokenAmount {
    total_supply.per(holders)
}

/// Share of total supply that voted on a proposal.
#[must_use]
pub fn turnout(votes_cast: TokenAmount, total_supply: TokenAmount) -> Decimal {
    votes_cast.ratio(total_supply)
}

fn count_ratio(numerator: u64, denominator: u64) -> Decimal {
    if denominator == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(numerator) / Decimal::from(denominator))
        .round_dp_with_strategy(RATIO_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Account;
    use rust_decimal_macros::dec;

    fn aggregate(n: u8, percentage: Decimal) -> DelegateAggregate {
        DelegateAggregate {
            address: Account::new(format!("0x{:040x}", n)),
            delegated_power: TokenAmount::ZERO,
            delegator_count: 1,
            percentage,
        }
    }

    #[test]
    fn percentage_delegated_zero_supply() {
        assert_eq!(
            percentage_delegated(TokenAmount::from_tokens(10), TokenAmount::ZERO),
            Decimal::ZERO
        );
        assert_eq!(
            percentage_delegated(TokenAmount::from_tokens(350), TokenAmount::from_tokens(1000)),
            dec!(0.35)
        );
    }

    #[test]
    fn concentration_sums_leading_entries_only() {
        let aggregates: Vec<_> = (1..=7).map(|n| aggregate(n, dec!(0.1))).collect();
        assert_eq!(top_n_concentration(&aggregates, CONCENTRATION_TOP_N), dec!(0.5));
        assert_eq!(top_n_concentration(&aggregates[..2], CONCENTRATION_TOP_N), dec!(0.2));
        assert_eq!(top_n_concentration(&[], CONCENTRATION_TOP_N), Decimal::ZERO);
    }

    #[test]
    fn simple_ratios_handle_zero_divisors() {
        assert_eq!(delegate_to_holder_ratio(3, 0), Decimal::ZERO);
        assert_eq!(delegate_to_holder_ratio(1, 3), dec!(0.333333));
        assert_eq!(tokens_per_delegate(TokenAmount::from_tokens(9), 0), TokenAmount::ZERO);
        assert_eq!(tokens_per_holder(TokenAmount::from_tokens(9), 3), TokenAmount::from_tokens(3));
        assert_eq!(turnout(TokenAmount::from_tokens(1), TokenAmount::ZERO), Decimal::ZERO);
    }
}
