//! In-memory [`LedgerClient`] and [`DelegationHelper`] for crawler tests.
//!
//! - [`MockLedger`]: scripted balances, delegates and events with failure
//!   injection, call counters, an advancing block height and an optional
//!   gate that parks the first `balance_of` call.
//! - [`MockHelper`]: scripted depths and concentration ranking.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::{Account, TokenAmount};
use crate::error::LedgerError;
use crate::port::{DelegationHelper, EventKind, LedgerClient, LedgerEvent};

/// Parks the next `balance_of` call after being armed, until released.
///
/// Lets a test hold a crawl mid-flight, issue a competing request, then let
/// the first crawl finish.
#[derive(Debug, Default)]
pub struct LedgerGate {
    armed: AtomicBool,
    entered: Notify,
    release: Notify,
}

impl LedgerGate {
    /// Wait until a crawl is parked at the gate.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Park the next `balance_of` call, even after the gate has fired.
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Let the parked call continue.
    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }
}

/// Scriptable ledger.
pub struct MockLedger {
    block: u64,
    block_step: u64,
    supply: TokenAmount,
    balances: HashMap<Account, TokenAmount>,
    delegates: HashMap<Account, Account>,
    delegators: HashMap<Account, Vec<Account>>,
    events: Vec<LedgerEvent>,
    failing_accounts: HashSet<Account>,
    fail_block: bool,
    fail_supply: bool,
    fail_events: bool,
    gate: Arc<LedgerGate>,
    block_calls: AtomicU64,
    balance_calls: AtomicUsize,
}

impl MockLedger {
    /// Ledger at `block` with `supply_tokens` whole tokens in circulation.
    pub fn new(block: u64, supply_tokens: u64) -> Self {
        Self {
            block,
            block_step: 0,
            supply: TokenAmount::from_tokens(supply_tokens),
            balances: HashMap::new(),
            delegates: HashMap::new(),
            delegators: HashMap::new(),
            events: Vec::new(),
            failing_accounts: HashSet::new(),
            fail_block: false,
            fail_supply: false,
            fail_events: false,
            gate: Arc::new(LedgerGate::default()),
            block_calls: AtomicU64::new(0),
            balance_calls: AtomicUsize::new(0),
        }
    }

    /// `delegator` holds `tokens` and delegates to `delegate`.
    pub fn with_delegation(mut self, delegator: Account, delegate: Account, tokens: u64) -> Self {
        self.balances
            .insert(delegator.clone(), TokenAmount::from_tokens(tokens));
        self.delegates.insert(delegator, delegate);
        self
    }

    pub fn with_self_delegation(self, account: Account, tokens: u64) -> Self {
        self.with_delegation(account.clone(), account, tokens)
    }

    pub fn with_balance(mut self, account: Account, tokens: u64) -> Self {
        self.balances.insert(account, TokenAmount::from_tokens(tokens));
        self
    }

    /// Both point queries for `account` fail.
    pub fn with_failing_account(mut self, account: Account) -> Self {
        self.failing_accounts.insert(account);
        self
    }

    pub fn with_failing_block(mut self) -> Self {
        self.fail_block = true;
        self
    }

    pub fn with_failing_supply(mut self) -> Self {
        self.fail_supply = true;
        self
    }

    pub fn with_failing_events(mut self) -> Self {
        self.fail_events = true;
        self
    }

    /// Each `current_block` call reports `step` blocks more than the last.
    pub fn with_advancing_block(mut self, step: u64) -> Self {
        self.block_step = step;
        self
    }

    /// Park the first `balance_of` call at [`gate`](Self::gate).
    pub fn with_gated_balance(self) -> Self {
        self.gate.arm();
        self
    }

    pub fn with_delegate_changed(
        mut self,
        delegator: Account,
        from_delegate: Account,
        to_delegate: Account,
        block: u64,
    ) -> Self {
        self.events.push(LedgerEvent::DelegateChanged {
            delegator,
            from_delegate,
            to_delegate,
            block,
        });
        self
    }

    pub fn with_transfer(mut self, from: Account, to: Account, tokens: u64, block: u64) -> Self {
        self.events.push(LedgerEvent::Transfer {
            from,
            to,
            value: TokenAmount::from_tokens(tokens),
            block,
        });
        self
    }

    /// Make `delegators_of(delegate)` answer with `delegators`.
    pub fn with_delegators(mut self, delegate: Account, delegators: Vec<Account>) -> Self {
        self.delegators.insert(delegate, delegators);
        self
    }

    pub fn gate(&self) -> Arc<LedgerGate> {
        Arc::clone(&self.gate)
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn block_calls(&self) -> u64 {
        self.block_calls.load(Ordering::SeqCst)
    }

    fn check_account(&self, account: &Account) -> Result<(), LedgerError> {
        if self.failing_accounts.contains(account) {
            return Err(LedgerError::Rpc(format!("scripted failure for {account}")));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn current_block(&self) -> Result<u64, LedgerError> {
        if self.fail_block {
            return Err(LedgerError::Rpc("block height unavailable".into()));
        }
        let calls = self.block_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.block + calls * self.block_step)
    }

    async fn total_supply(&self, _block: u64) -> Result<TokenAmount, LedgerError> {
        if self.fail_supply {
            return Err(LedgerError::Rpc("total supply unavailable".into()));
        }
        Ok(self.supply)
    }

    async fn balance_of(&self, account: &Account, _block: u64) -> Result<TokenAmount, LedgerError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        self.check_account(account)?;
        Ok(self
            .balances
            .get(account)
            .copied()
            .unwrap_or(TokenAmount::ZERO))
    }

    async fn delegate_of(&self, account: &Account, _block: u64) -> Result<Option<Account>, LedgerError> {
        self.check_account(account)?;
        Ok(self.delegates.get(account).cloned())
    }

    async fn delegators_of(&self, account: &Account) -> Result<Vec<Account>, LedgerError> {
        self.delegators
            .get(account)
            .cloned()
            .ok_or(LedgerError::Unsupported("delegators_of"))
    }

    async fn query_events(
        &self,
        kind: EventKind,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        if self.fail_events {
            return Err(LedgerError::Rpc("event scan unavailable".into()));
        }
        Ok(self
            .events
            .iter()
            .filter(|event| {
                let matches_kind = matches!(
                    (kind, event),
                    (EventKind::DelegateChanged, LedgerEvent::DelegateChanged { .. })
                        | (EventKind::Transfer, LedgerEvent::Transfer { .. })
                );
                matches_kind && (from_block..=to_block).contains(&event.block())
            })
            .cloned()
            .collect())
    }
}

/// Scriptable depth and concentration helper.
#[derive(Default)]
pub struct MockHelper {
    depths: HashMap<Account, u32>,
    failing_depths: HashSet<Account>,
    top_delegates: Vec<Account>,
}

impl MockHelper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_depth(mut self, account: Account, depth: u32) -> Self {
        self.depths.insert(account, depth);
        self
    }

    pub fn with_failing_depth(mut self, account: Account) -> Self {
        self.failing_depths.insert(account);
        self
    }

    pub fn with_top_delegates(mut self, delegates: Vec<Account>) -> Self {
        self.top_delegates = delegates;
        self
    }
}

#[async_trait]
impl DelegationHelper for MockHelper {
    async fn delegation_depth(&self, account: &Account, _block: u64) -> Result<u32, LedgerError> {
        if self.failing_depths.contains(account) {
            return Err(LedgerError::Rpc(format!("depth unavailable for {account}")));
        }
        Ok(self.depths.get(account).copied().unwrap_or(1))
    }

    async fn top_delegates_by_concentration(&self, n: usize) -> Result<Vec<Account>, LedgerError> {
        Ok(self.top_delegates.iter().take(n).cloned().collect())
    }
}
