//! Scripted [`PrecomputedSource`] for orchestrator tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{Category, Payload};
use crate::error::{Error, Result};
use crate::port::PrecomputedSource;

enum Script {
    Respond(Payload),
    Nothing,
    Fail(String),
}

/// Remote source answering every category with one scripted outcome.
pub struct ScriptedRemote {
    script: Script,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedRemote {
    fn with_script(script: Script) -> Self {
        Self {
            script,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn responding(payload: Payload) -> Self {
        Self::with_script(Script::Respond(payload))
    }

    /// Answer with `payload` after `delay`.
    pub fn delayed(delay: Duration, payload: Payload) -> Self {
        Self {
            delay,
            ..Self::responding(payload)
        }
    }

    /// Source with no result for any category.
    pub fn empty() -> Self {
        Self::with_script(Script::Nothing)
    }

    pub fn failing(reason: &str) -> Self {
        Self::with_script(Script::Fail(reason.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PrecomputedSource for ScriptedRemote {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self, _category: Category) -> Result<Option<Payload>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.script {
            Script::Respond(payload) => Ok(Some(payload.clone())),
            Script::Nothing => Ok(None),
            Script::Fail(reason) => Err(Error::Remote(reason.clone())),
        }
    }
}
