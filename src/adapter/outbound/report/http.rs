//! Report fetched over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{Error, Result};
use crate::port::ReportSource;

/// [`ReportSource`] issuing a GET for a JSON document.
#[derive(Debug, Clone)]
pub struct HttpReportSource {
    client: Client,
    url: Url,
}

impl HttpReportSource {
    /// # Errors
    ///
    /// Returns [`Error::Url`] if `url` does not parse.
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            url: Url::parse(url)?,
        })
    }
}

#[async_trait]
impl ReportSource for HttpReportSource {
    fn name(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch(&self) -> Result<serde_json::Value> {
        let report = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Remote(e.to_string()))?
            .json()
            .await?;
        Ok(report)
    }
}
