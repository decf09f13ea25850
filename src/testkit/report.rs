//! Static [`ReportSource`] for report chain tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::port::ReportSource;

/// Report source returning a fixed document or a fixed failure.
pub struct StaticReport {
    name: String,
    report: Option<serde_json::Value>,
    calls: AtomicUsize,
}

impl StaticReport {
    pub fn new(name: &str, report: serde_json::Value) -> Self {
        Self {
            name: name.to_string(),
            report: Some(report),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            report: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportSource for StaticReport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<serde_json::Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.report
            .clone()
            .ok_or_else(|| Error::Remote(format!("{} is unavailable", self.name)))
    }
}
