//! Per-request context passed from callers through the orchestrator to collectors.

use crate::application::cancel::CancelToken;
use crate::domain::Account;

/// Caller-side parameters of one request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Fires when the caller no longer wants the result.
    pub cancel: CancelToken,
    /// Accounts the caller cares about (e.g. the connected wallet), visited first.
    pub important_accounts: Vec<Account>,
}

impl RequestContext {
    #[must_use]
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            cancel,
            important_accounts: Vec::new(),
        }
    }

    /// Context that is never cancelled by the caller.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_important_accounts(mut self, accounts: impl IntoIterator<Item = Account>) -> Self {
        self.important_accounts.extend(accounts);
        self
    }

    /// Same request with `token` linked into its cancellation.
    #[must_use]
    pub(crate) fn linked(&self, token: &CancelToken) -> Self {
        Self {
            cancel: self.cancel.linked(token),
            important_accounts: self.important_accounts.clone(),
        }
    }
}
