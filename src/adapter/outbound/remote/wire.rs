//! Wire formats of remote precomputed results.
//!
//! Indexers disagree on field names, so each shape is deserialized leniently
//! and converted into domain types. Delegation aggregates are never trusted:
//! they are recomputed from the edges.

use std::collections::HashSet;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::application::crawler::build_result;
use crate::domain::metrics::tokens_per_holder;
use crate::domain::{Account, Category, DelegationEdge, Payload, TokenAmount, TokenStats};
use crate::error::Result;

/// A token amount sent as a decimal string or a JSON number.
///
/// Both forms are in whole-token units. Integers above `u64` arrive as
/// floats in exponent form and keep only float precision, so indexers that
/// need exact raw balances should send strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireAmount {
    Text(String),
    Number(serde_json::Number),
}

impl WireAmount {
    fn to_amount(&self) -> Option<TokenAmount> {
        let parsed = match self {
            Self::Text(text) => TokenAmount::parse(text),
            Self::Number(number) => match number.as_u64() {
                Some(tokens) => return Some(TokenAmount::from_tokens(tokens)),
                None => TokenAmount::parse(&number.to_string()).or_else(|e| {
                    Decimal::from_scientific(&number.to_string())
                        .map_err(|_| e)
                        .and_then(|decimal| TokenAmount::parse(&decimal.normalize().to_string()))
                }),
            },
        };
        parsed.ok()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireEdge {
    #[serde(alias = "from")]
    pub delegator: String,
    #[serde(alias = "to")]
    pub delegate: String,
    #[serde(rename = "votingPower", alias = "balance", alias = "amount")]
    pub voting_power: WireAmount,
    #[serde(default)]
    pub depth: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireDelegations {
    #[serde(alias = "delegations", alias = "data")]
    pub edges: Vec<WireEdge>,
    #[serde(default, rename = "observedAtBlock", alias = "blockNumber", alias = "block")]
    pub observed_at_block: Option<u64>,
    #[serde(default, rename = "totalSupply", alias = "total_supply")]
    pub total_supply: Option<WireAmount>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum DelegationDocument {
    Wrapped(WireDelegations),
    Bare(Vec<WireEdge>),
}

#[derive(Debug, Clone, Deserialize)]
struct WireTokenStats {
    #[serde(rename = "totalSupply", alias = "total_supply")]
    total_supply: WireAmount,
    #[serde(default, rename = "holderCount", alias = "holders", alias = "holder_count")]
    holder_count: u64,
    #[serde(default, rename = "observedAtBlock", alias = "blockNumber", alias = "block")]
    observed_at_block: Option<u64>,
}

/// Convert a remote response body for `category` into a payload.
///
/// Returns `Ok(None)` for a JSON `null` body. Edges with malformed accounts or
/// amounts are dropped, as are edges that are not delegations (self, zero
/// delegate, zero power). A missing total supply yields zero percentages.
///
/// # Errors
///
/// [`Error::Json`](crate::error::Error::Json) when the body matches none of
/// the accepted shapes.
pub fn normalize(category: Category, body: Value, top_n: usize) -> Result<Option<Payload>> {
    if body.is_null() {
        return Ok(None);
    }
    let payload = match category {
        Category::Delegation => Payload::Delegation(normalize_delegations(body, top_n)?),
        Category::Token => Payload::Token(normalize_token(body)?),
        Category::Proposal | Category::Timelock | Category::CurrentStats => Payload::Report(body),
    };
    Ok(Some(payload))
}

fn normalize_delegations(body: Value, top_n: usize) -> Result<crate::domain::CrawlResult> {
    let document = match serde_json::from_value(body)? {
        DelegationDocument::Wrapped(wrapped) => wrapped,
        DelegationDocument::Bare(edges) => WireDelegations {
            edges,
            observed_at_block: None,
            total_supply: None,
        },
    };

    let received = document.edges.len();
    let usable: Vec<DelegationEdge> = document.edges.iter().filter_map(to_edge).collect();
    if usable.len() < received {
        debug!(received, kept = usable.len(), "Dropped unusable remote edges");
    }

    // One edge per delegator; the first one listed wins.
    let mut delegators = HashSet::new();
    let mut edges = Vec::with_capacity(usable.len());
    for edge in usable {
        if delegators.insert(edge.delegator.clone()) {
            edges.push(edge);
        } else {
            debug!(delegator = %edge.delegator, "Dropped duplicate remote edge");
        }
    }

    let total_supply = document
        .total_supply
        .as_ref()
        .and_then(WireAmount::to_amount)
        .unwrap_or(TokenAmount::ZERO);

    Ok(build_result(
        edges,
        total_supply,
        top_n,
        document.observed_at_block.unwrap_or_default(),
        Utc::now(),
    ))
}

fn to_edge(wire: &WireEdge) -> Option<DelegationEdge> {
    let delegator = Account::parse(&wire.delegator).ok()?;
    let delegate = Account::parse(&wire.delegate).ok()?;
    let power = wire.voting_power.to_amount()?;
    DelegationEdge::try_new(delegator, delegate, power, wire.depth.unwrap_or(1))
}

fn normalize_token(body: Value) -> Result<TokenStats> {
    let wire: WireTokenStats = serde_json::from_value(body)?;
    let total_supply = wire.total_supply.to_amount().unwrap_or(TokenAmount::ZERO);
    Ok(TokenStats {
        total_supply,
        holder_count: wire.holder_count,
        tokens_per_holder: tokens_per_holder(total_supply, wire.holder_count),
        observed_at_block: wire.observed_at_block.unwrap_or_default(),
        produced_at: Utc::now(),
    })
}
