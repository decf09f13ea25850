//! HTTP client for a remote precomputed-results service.
//!
//! Results are read from `{base_url}/{category}` (e.g. `.../delegation`).
//! A 404 means the service has nothing for the category.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use super::wire;
use crate::domain::{Category, Payload};
use crate::error::{Error, Result};
use crate::port::PrecomputedSource;

/// [`PrecomputedSource`] backed by a JSON-over-HTTP indexer.
#[derive(Debug, Clone)]
pub struct HttpPrecomputedSource {
    client: Client,
    base_url: Url,
    /// Delegates kept when rebuilding a ranking from remote edges.
    top_delegates: usize,
}

impl HttpPrecomputedSource {
    /// Create a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if `base_url` does not parse.
    pub fn new(base_url: &str, top_delegates: usize) -> Result<Self> {
        // Without a trailing slash `join` would replace the last path segment.
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            base_url,
            top_delegates,
        })
    }

    /// Endpoint serving `category`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if the joined URL is invalid.
    pub fn endpoint(&self, category: Category) -> Result<Url> {
        Ok(self.base_url.join(category.as_str())?)
    }
}

#[async_trait]
impl PrecomputedSource for HttpPrecomputedSource {
    fn name(&self) -> &str {
        self.base_url.as_str()
    }

    async fn fetch(&self, category: Category) -> Result<Option<Payload>> {
        let url = self.endpoint(category)?;
        let response = self.client.get(url.clone()).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(url = %url, "No remote result");
            return Ok(None);
        }

        let body = response
            .error_for_status()
            .map_err(|e| Error::Remote(e.to_string()))?
            .json::<serde_json::Value>()
            .await?;

        wire::normalize(category, body, self.top_delegates)
    }
}
