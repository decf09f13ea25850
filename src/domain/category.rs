//! Analytics categories served by the dashboard core.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Analytics category; the key of the result cache and of in-flight requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// Governance proposal history.
    Proposal,
    /// Token supply and holder statistics.
    Token,
    /// Timelock configuration.
    Timelock,
    /// Delegation graph.
    Delegation,
    /// Externally produced "current stats" report.
    CurrentStats,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 5] = [
        Self::Proposal,
        Self::Token,
        Self::Timelock,
        Self::Delegation,
        Self::CurrentStats,
    ];

    /// Stable name used in logs, cache keys and remote URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proposal => "proposal",
            Self::Token => "token",
            Self::Timelock => "timelock",
            Self::Delegation => "delegation",
            Self::CurrentStats => "currentStats",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
