//! Category results as stored in the cache and returned to callers.

use serde::{Deserialize, Serialize};

use super::delegation::CrawlResult;
use super::token::TokenStats;

/// Result produced for one analytics category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum Payload {
    Delegation(CrawlResult),
    Token(TokenStats),
    /// Externally produced JSON report (proposals, timelock, current stats).
    Report(serde_json::Value),
}

impl Payload {
    /// True when the payload indicates a failed collection and must not be
    /// served from cache: a delegation crawl without edges, or an empty report.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Delegation(result) => result.is_empty(),
            Self::Token(_) => false,
            Self::Report(value) => match value {
                serde_json::Value::Null => true,
                serde_json::Value::Object(map) => map.is_empty(),
                serde_json::Value::Array(items) => items.is_empty(),
                _ => false,
            },
        }
    }

    /// Borrow the delegation result, if this is one.
    #[must_use]
    pub fn as_delegation(&self) -> Option<&CrawlResult> {
        match self {
            Self::Delegation(result) => Some(result),
            _ => None,
        }
    }

    /// Take the delegation result, if this is one.
    #[must_use]
    pub fn into_delegation(self) -> Option<CrawlResult> {
        match self {
            Self::Delegation(result) => Some(result),
            _ => None,
        }
    }
}
