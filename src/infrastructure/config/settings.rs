//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings. Every
//! section is optional; missing sections take their defaults.
//!
//! # Example
//!
//! ```no_run
//! use govgraph::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::cache::CacheConfig;
use super::logging::LoggingConfig;
use super::remote::RemoteConfig;
use super::report::{ReportConfig, ReportSourceConfig};
use crate::application::crawler::CrawlerConfig;
use crate::domain::Account;
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Delegation crawl windows, caps and important accounts.
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Result cache TTL.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Optional remote precomputed-results service.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Report sources for the proposal, timelock and current-stats categories.
    #[serde(default)]
    pub report: ReportConfig,
}

fn must_be_positive(field: &'static str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must be greater than 0".to_string(),
        }
        .into());
    }
    Ok(())
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] or [`ConfigError::MissingField`]
    /// for the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !LoggingConfig::FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("must be one of {}", LoggingConfig::FORMATS.join(", ")),
            }
            .into());
        }

        let crawler = &self.crawler;
        must_be_positive(
            "delegate_changed_lookback_blocks",
            crawler.delegate_changed_lookback_blocks,
        )?;
        must_be_positive("transfer_lookback_blocks", crawler.transfer_lookback_blocks)?;
        if crawler.transfer_lookback_blocks < crawler.delegate_changed_lookback_blocks {
            return Err(ConfigError::InvalidValue {
                field: "transfer_lookback_blocks",
                reason: "must be >= delegate_changed_lookback_blocks".to_string(),
            }
            .into());
        }
        must_be_positive("max_transfer_accounts", crawler.max_transfer_accounts as u64)?;
        must_be_positive("top_delegates", crawler.top_delegates as u64)?;
        must_be_positive("helper_top_delegates", crawler.helper_top_delegates as u64)?;
        for account in &crawler.important_accounts {
            Account::parse(account.as_str()).map_err(|e| ConfigError::InvalidValue {
                field: "important_accounts",
                reason: e.to_string(),
            })?;
        }

        must_be_positive("ttl_secs", self.cache.ttl_secs)?;
        must_be_positive("timeout_ms", self.remote.timeout_ms)?;
        if let Some(base_url) = &self.remote.base_url {
            if base_url.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "base_url" }.into());
            }
        }

        for source in &self.report.sources {
            match source {
                ReportSourceConfig::File { path } if path.as_os_str().is_empty() => {
                    return Err(ConfigError::MissingField { field: "path" }.into());
                }
                ReportSourceConfig::Http { url } if url.trim().is_empty() => {
                    return Err(ConfigError::MissingField { field: "url" }.into());
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
