use std::io::Write;

use govgraph::domain::Account;
use govgraph::error::{ConfigError, Error};
use govgraph::infrastructure::config::report::ReportSourceConfig;
use govgraph::infrastructure::config::settings::Config;
use tempfile::NamedTempFile;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

fn invalid_field(result: Result<Config, Error>) -> &'static str {
    match result {
        Err(Error::Config(ConfigError::InvalidValue { field, .. })) => field,
        Err(Error::Config(ConfigError::MissingField { field })) => field,
        Err(err) => panic!("expected a validation error, got {err}"),
        Ok(config) => panic!("expected rejection, got {config:?}"),
    }
}

#[test]
fn full_config_loads() {
    let file = write_temp_config(
        r#"
[logging]
level = "debug"
format = "json"

[crawler]
delegate_changed_lookback_blocks = 1000
transfer_lookback_blocks = 5000
min_edges_before_transfer_scan = 3
max_transfer_accounts = 50
top_delegates = 10
important_accounts = ["0xAbCdEf0000000000000000000000000000000001"]

[cache]
ttl_secs = 60

[remote]
base_url = "https://indexer.example/api"
timeout_ms = 1500

[report]
proposal_section = "proposalHistory"
sources = [
    { type = "file", path = "data/current-stats.json" },
    { type = "http", url = "https://stats.example/current-stats.json" },
]
"#,
    );

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.crawler.transfer_lookback_blocks, 5000);
    assert_eq!(config.crawler.helper_top_delegates, 10);
    assert_eq!(
        config.crawler.important_accounts,
        vec![Account::new("0xabcdef0000000000000000000000000000000001")]
    );
    assert_eq!(config.cache.ttl().as_secs(), 60);
    assert_eq!(config.remote.timeout().as_millis(), 1500);
    assert_eq!(config.report.sources.len(), 2);
    assert!(matches!(config.report.sources[0], ReportSourceConfig::File { .. }));
    assert_eq!(config.report.proposal_section, "proposalHistory");
    assert_eq!(config.report.timelock_section, "timelock");
}

#[test]
fn missing_file_is_read_error() {
    let result = Config::load("/nonexistent/govgraph.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn malformed_toml_is_parse_error() {
    let result = Config::parse_toml("[cache\nttl_secs = 1");
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn rejects_zero_windows_and_caps() {
    for (toml, field) in [
        ("[crawler]\ndelegate_changed_lookback_blocks = 0\n", "delegate_changed_lookback_blocks"),
        ("[crawler]\nmax_transfer_accounts = 0\n", "max_transfer_accounts"),
        ("[crawler]\ntop_delegates = 0\n", "top_delegates"),
        ("[remote]\ntimeout_ms = 0\n", "timeout_ms"),
    ] {
        assert_eq!(invalid_field(Config::parse_toml(toml)), field, "for {toml:?}");
    }
}

#[test]
fn rejects_transfer_window_shorter_than_delegate_window() {
    let toml = "[crawler]\ndelegate_changed_lookback_blocks = 1000\ntransfer_lookback_blocks = 999\n";
    assert_eq!(invalid_field(Config::parse_toml(toml)), "transfer_lookback_blocks");
}

#[test]
fn rejects_malformed_important_account() {
    let toml = "[crawler]\nimportant_accounts = [\"0x1234\"]\n";
    assert_eq!(invalid_field(Config::parse_toml(toml)), "important_accounts");
}

#[test]
fn rejects_empty_locations() {
    assert_eq!(
        invalid_field(Config::parse_toml("[remote]\nbase_url = \" \"\n")),
        "base_url"
    );
    assert_eq!(
        invalid_field(Config::parse_toml(
            "[report]\nsources = [{ type = \"http\", url = \"\" }]\n"
        )),
        "url"
    );
    assert_eq!(
        invalid_field(Config::parse_toml(
            "[report]\nsources = [{ type = \"file\", path = \"\" }]\n"
        )),
        "path"
    );
}
