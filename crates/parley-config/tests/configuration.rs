//! Behavioural coverage for configuration resolution.

use camino::Utf8PathBuf;

use parley_config::{Config, ListenEndpoint, LogFormat};

#[test]
fn defaults_apply_without_flags() {
    let config = Config::load_from_iter(["parleyd"]).expect("load defaults");
    assert_eq!(config, Config::default());
    assert_eq!(config.listen(), &ListenEndpoint::new("127.0.0.1", 12345));
    assert_eq!(config.log_filter(), "info");
    assert_eq!(config.log_format(), LogFormat::Json);
    assert!(config.watch.is_none());
}

#[test]
fn flags_override_defaults() {
    let config = Config::load_from_iter([
        "parleyd",
        "--listen",
        "0.0.0.0:9000",
        "--log-filter",
        "parleyd=debug",
        "--log-format",
        "compact",
        "--watch",
        "/tmp/sentinel",
        "--watch-interval-ms",
        "250",
    ])
    .expect("load flags");

    assert_eq!(config.listen(), &ListenEndpoint::new("0.0.0.0", 9000));
    assert_eq!(config.log_filter(), "parleyd=debug");
    assert_eq!(config.log_format(), LogFormat::Compact);
    assert_eq!(config.watch, Some(Utf8PathBuf::from("/tmp/sentinel")));
    assert_eq!(config.watch_interval().as_millis(), 250);
}

#[test]
fn rejects_malformed_listen_endpoint() {
    let result = Config::load_from_iter(["parleyd", "--listen", "no-port"]);
    assert!(result.is_err());
}

#[test]
fn rejects_unknown_log_format() {
    let result = Config::load_from_iter(["parleyd", "--log-format", "pretty"]);
    assert!(result.is_err());
}

#[test]
fn log_format_is_case_insensitive() {
    let config =
        Config::load_from_iter(["parleyd", "--log-format", "COMPACT"]).expect("load format");
    assert_eq!(config.log_format(), LogFormat::Compact);
}
