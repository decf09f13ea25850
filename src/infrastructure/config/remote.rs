//! Remote precomputed-source configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::application::orchestration::DEFAULT_REMOTE_TIMEOUT;

/// Indexer serving precomputed results. Disabled when `base_url` is unset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: Option<String>,
    /// Upper bound on one remote lookup before falling back to collecting.
    pub timeout_ms: u64,
}

impl RemoteConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: DEFAULT_REMOTE_TIMEOUT.as_millis() as u64,
        }
    }
}
