//! Ledger port: read-only point queries and historical event scans.
//!
//! The ledger has no index of the delegation graph. Everything the crawler
//! knows is assembled from these calls, each pinned to one block height.

use async_trait::async_trait;

use crate::domain::{Account, TokenAmount};
use crate::error::LedgerError;

/// Event kinds the crawler scans for seed accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A delegator moved its voting power between delegates.
    DelegateChanged,
    /// Tokens moved between accounts.
    Transfer,
}

impl EventKind {
    /// Event name as emitted by the token contract.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DelegateChanged => "DelegateChanged",
            Self::Transfer => "Transfer",
        }
    }
}

/// Decoded ledger event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    DelegateChanged {
        delegator: Account,
        from_delegate: Account,
        to_delegate: Account,
        block: u64,
    },
    Transfer {
        from: Account,
        to: Account,
        value: TokenAmount,
        block: u64,
    },
}

impl LedgerEvent {
    /// Accounts named by the event, in argument order.
    #[must_use]
    pub fn accounts(&self) -> Vec<&Account> {
        match self {
            Self::DelegateChanged {
                delegator,
                from_delegate,
                to_delegate,
                ..
            } => vec![delegator, from_delegate, to_delegate],
            Self::Transfer { from, to, .. } => vec![from, to],
        }
    }

    /// Block the event was emitted in.
    #[must_use]
    pub const fn block(&self) -> u64 {
        match self {
            Self::DelegateChanged { block, .. } | Self::Transfer { block, .. } => *block,
        }
    }
}

/// Read-only access to the governance token's ledger state.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one client is shared by every
/// collector of an orchestrator.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Return the ledger name for logging.
    fn name(&self) -> &'static str;

    /// Latest block height.
    async fn current_block(&self) -> Result<u64, LedgerError>;

    /// Total token supply at `block`.
    async fn total_supply(&self, block: u64) -> Result<TokenAmount, LedgerError>;

    /// Token balance of `account` at `block`.
    async fn balance_of(&self, account: &Account, block: u64) -> Result<TokenAmount, LedgerError>;

    /// Current delegate of `account` at `block`, `None` if never delegated.
    async fn delegate_of(&self, account: &Account, block: u64)
        -> Result<Option<Account>, LedgerError>;

    /// Accounts delegating to `account`.
    ///
    /// Best-effort: most ledgers cannot answer this without an index.
    async fn delegators_of(&self, _account: &Account) -> Result<Vec<Account>, LedgerError> {
        Err(LedgerError::Unsupported("delegators_of"))
    }

    /// Events of `kind` emitted in `[from_block, to_block]`.
    async fn query_events(
        &self,
        kind: EventKind,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<LedgerEvent>, LedgerError>;
}

/// Optional helper service with knowledge the raw ledger lacks.
#[async_trait]
pub trait DelegationHelper: Send + Sync {
    /// Length of the delegation chain starting at `account`.
    async fn delegation_depth(&self, account: &Account, block: u64) -> Result<u32, LedgerError>;

    /// The `n` delegates holding the most delegated power.
    async fn top_delegates_by_concentration(&self, n: usize)
        -> Result<Vec<Account>, LedgerError>;
}
