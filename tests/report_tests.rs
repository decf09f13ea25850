//! Report fallback chain over real files, wired through the orchestrator.

use std::io::Write;
use std::sync::Arc;

use govgraph::application::orchestration::RequestContext;
use govgraph::application::report::ReportChain;
use govgraph::application::cancel::CancelToken;
use govgraph::domain::{Category, Payload};
use govgraph::error::Error;
use govgraph::infrastructure::bootstrap::{build_orchestrator, build_report_chain};
use govgraph::infrastructure::config::settings::Config;
use govgraph::port::LedgerClient;
use govgraph::testkit::ledger::MockLedger;
use govgraph::testkit::report::StaticReport;
use serde_json::json;
use tempfile::NamedTempFile;

fn report_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp report");
    file.write_all(contents.as_bytes()).expect("write temp report");
    file
}

fn config_with_sources(paths: &[&std::path::Path]) -> Config {
    let sources: Vec<String> = paths
        .iter()
        .map(|p| format!("{{ type = \"file\", path = {:?} }}", p.display().to_string()))
        .collect();
    Config::parse_toml(&format!("[report]\nsources = [{}]\n", sources.join(", "))).unwrap()
}

#[tokio::test]
async fn falls_back_past_missing_and_malformed_files() {
    let malformed = report_file("{ not json");
    let good = report_file(r#"{"holders": 1200, "proposals": [{"id": 7}], "timelock": {"delay": 2}}"#);
    let missing = std::path::Path::new("/nonexistent/current-stats.json");

    let config = config_with_sources(&[missing, malformed.path(), good.path()]);
    let chain = build_report_chain(&config.report).unwrap();
    assert_eq!(chain.len(), 3);

    let report = chain.fetch(&CancelToken::never()).await.unwrap();
    assert_eq!(report["holders"], 1200);
}

#[tokio::test]
async fn all_failed_sources_are_reported() {
    let malformed = report_file("[");
    let config = config_with_sources(&[malformed.path()]);
    let chain = build_report_chain(&config.report).unwrap();

    match chain.fetch(&CancelToken::never()).await {
        Err(Error::AllSourcesFailed { attempts }) => {
            assert_eq!(attempts.len(), 1);
            assert!(attempts[0].starts_with("file:"));
        }
        other => panic!("expected AllSourcesFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn report_categories_are_served_by_section() {
    let good = report_file(r#"{"holders": 1200, "proposals": [{"id": 7}], "timelock": {"delay": 2}}"#);
    let config = config_with_sources(&[good.path()]);
    let ledger: Arc<dyn LedgerClient> = Arc::new(MockLedger::new(1, 1));
    let orch = build_orchestrator(&config, ledger, None).unwrap();
    let ctx = RequestContext::detached();

    let proposals = orch.request(Category::Proposal, &ctx).await.unwrap();
    assert_eq!(proposals, Payload::Report(json!([{"id": 7}])));

    let timelock = orch.request(Category::Timelock, &ctx).await.unwrap();
    assert_eq!(timelock, Payload::Report(json!({"delay": 2})));

    let stats = orch.request(Category::CurrentStats, &ctx).await.unwrap();
    assert!(matches!(stats, Payload::Report(ref v) if v["holders"] == 1200));
}

#[tokio::test]
async fn sources_after_success_are_not_touched() {
    let primary = Arc::new(StaticReport::new("primary", json!({"ok": true})));
    let secondary = Arc::new(StaticReport::new("secondary", json!({"ok": false})));
    let chain = ReportChain::default()
        .with_source(primary.clone())
        .with_source(secondary.clone());

    chain.fetch(&CancelToken::never()).await.unwrap();
    assert_eq!(primary.calls(), 1);
    assert_eq!(secondary.calls(), 0);
}
