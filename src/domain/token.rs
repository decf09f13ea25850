//! Token supply statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::amount::TokenAmount;

/// Supply snapshot with a holder count sampled from recent transfers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStats {
    pub total_supply: TokenAmount,
    /// Accounts with a nonzero balance among those seen in the transfer window.
    pub holder_count: u64,
    pub tokens_per_holder: TokenAmount,
    pub observed_at_block: u64,
    pub produced_at: DateTime<Utc>,
}
