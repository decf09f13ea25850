//! Report source configuration.
//!
//! ```toml
//! [report]
//! sources = [
//!     { type = "file", path = "data/current-stats.json" },
//!     { type = "http", url = "https://stats.example/current-stats.json" },
//! ]
//! ```

use std::path::PathBuf;

use serde::Deserialize;

/// One place the report is published, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReportSourceConfig {
    File { path: PathBuf },
    Http { url: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub sources: Vec<ReportSourceConfig>,
    /// Report key holding the proposal history.
    pub proposal_section: String,
    /// Report key holding the timelock configuration.
    pub timelock_section: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            proposal_section: "proposals".into(),
            timelock_section: "timelock".into(),
        }
    }
}
