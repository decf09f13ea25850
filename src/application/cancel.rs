//! Cooperative cancellation built on `tokio::sync::watch`.
//!
//! A [`CancelSource`] owns the sending side; every [`CancelToken`] handed out
//! observes it. Dropping the source counts as cancellation, so a consumer that
//! is torn down without calling [`CancelSource::cancel`] still stops its work.

use futures_util::future::select_all;
use tokio::sync::watch;

use crate::error::{Error, Result};

/// Owner side of a cancellation signal.
#[derive(Debug)]
pub struct CancelSource {
    tx: watch::Sender<bool>,
}

impl CancelSource {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Token observing this source.
    #[must_use]
    pub fn token(&self) -> CancelToken {
        CancelToken {
            receivers: vec![self.tx.subscribe()],
        }
    }

    /// Signal every token. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of one or more cancellation signals.
///
/// A token is cancelled as soon as any linked source is cancelled or dropped.
/// The default token has no sources and is never cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    receivers: Vec<watch::Receiver<bool>>,
}

impl CancelToken {
    /// Token that never fires.
    #[must_use]
    pub fn never() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.receivers
            .iter()
            .any(|rx| *rx.borrow() || rx.has_changed().is_err())
    }

    /// `Err(Error::Cancelled)` once cancelled; called before every external request.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(())
    }

    /// Token that fires when either `self` or `other` fires.
    #[must_use]
    pub fn linked(&self, other: &Self) -> Self {
        let mut receivers = self.receivers.clone();
        receivers.extend(other.receivers.iter().cloned());
        Self { receivers }
    }

    /// Resolve once the token is cancelled. Pending forever for [`never`](Self::never).
    pub async fn cancelled(&self) {
        if self.receivers.is_empty() {
            return std::future::pending().await;
        }
        let waits = self.receivers.iter().cloned().map(|mut rx| {
            Box::pin(async move {
                // Err means the source was dropped, which also cancels.
                let _ = rx.wait_for(|cancelled| *cancelled).await;
            })
        });
        select_all(waits).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn never_token_is_not_cancelled() {
        assert!(!CancelToken::never().is_cancelled());
        assert!(CancelToken::never().check().is_ok());
    }

    #[test]
    fn cancel_reaches_tokens() {
        let source = CancelSource::new();
        let token = source.token();
        assert!(!token.is_cancelled());
        source.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(Error::Cancelled)));
    }

    #[test]
    fn dropping_source_cancels() {
        let source = CancelSource::new();
        let token = source.token();
        drop(source);
        assert!(token.is_cancelled());
    }

    #[test]
    fn linked_token_fires_for_either_source() {
        let a = CancelSource::new();
        let b = CancelSource::new();
        let linked = a.token().linked(&b.token());
        assert!(!linked.is_cancelled());
        b.cancel();
        assert!(linked.is_cancelled());
        assert!(!a.token().is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_future_resolves_after_cancel() {
        let source = CancelSource::new();
        let token = source.token();
        let waiter = tokio::spawn(async move { token.cancelled().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        source.cancel();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("cancelled() should resolve")
            .unwrap();
    }

    #[tokio::test]
    async fn never_token_stays_pending() {
        let token = CancelToken::never();
        let result = tokio::time::timeout(Duration::from_millis(20), token.cancelled()).await;
        assert!(result.is_err());
    }
}
