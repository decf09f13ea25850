//! Report loaded from a local JSON file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::Result;
use crate::port::ReportSource;

/// [`ReportSource`] reading a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct FileReportSource {
    path: PathBuf,
    name: String,
}

impl FileReportSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self { path, name }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ReportSource for FileReportSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<serde_json::Value> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}
