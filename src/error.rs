//! Error types for configuration, ledger access and request serving.

use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures of individual ledger queries.
///
/// Inside a crawl these are recovered per account; they only become fatal when
/// the context queries (current block, total supply) fail.
#[derive(Error, Debug, Clone)]
pub enum LedgerError {
    #[error("rpc request failed: {0}")]
    Rpc(String),

    #[error("capability not available: {0}")]
    Unsupported(&'static str),

    #[error("failed to decode ledger response: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The block height or total supply could not be read, so no query of the
    /// crawl could be pinned to a consistent ledger state.
    #[error("ledger source unavailable: {reason}")]
    SourceUnavailable { reason: String },

    /// Superseded by a newer request or torn down by the consumer.
    #[error("request cancelled")]
    Cancelled,

    #[error("all {} report sources failed: {}", attempts.len(), attempts.join("; "))]
    AllSourcesFailed { attempts: Vec<String> },

    #[error("no collector registered for category {0}")]
    NoCollector(crate::domain::Category),

    #[error("source returned a result of another category for {0}")]
    UnexpectedPayload(crate::domain::Category),

    #[error("remote source error: {0}")]
    Remote(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// True for cancellation, which callers should not report as a failure.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
