use std::{collections::HashMap, path::PathBuf, time::Duration};

use quietlog::runtime::config::{
    LoggerConfig, ENV_DUMP_DIR, ENV_EVENT_CAPACITY, ENV_RETRY_MS, ENV_WAIT_MS,
};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_documented_values() {
    let cfg = LoggerConfig::default();
    assert_eq!(cfg.wait_window, Duration::from_secs(5));
    assert_eq!(cfg.retry_interval, Duration::from_millis(100));
    assert_eq!(cfg.event_capacity, 1024);
    assert_eq!(cfg.resolved_dump_dir(), std::env::temp_dir());
}

#[test]
fn overrides_are_applied() {
    let cfg = LoggerConfig::from_lookup(lookup(&[
        (ENV_WAIT_MS, "250"),
        (ENV_RETRY_MS, " 20 "),
        (ENV_EVENT_CAPACITY, "16"),
        (ENV_DUMP_DIR, "/var/tmp/dumps"),
    ]));
    assert_eq!(cfg.wait_window, Duration::from_millis(250));
    assert_eq!(cfg.retry_interval, Duration::from_millis(20));
    assert_eq!(cfg.event_capacity, 16);
    assert_eq!(cfg.dump_dir, Some(PathBuf::from("/var/tmp/dumps")));
}

#[test]
fn bad_values_fall_back_to_defaults() {
    let cfg = LoggerConfig::from_lookup(lookup(&[
        (ENV_WAIT_MS, "soon"),
        (ENV_RETRY_MS, "0"),
        (ENV_EVENT_CAPACITY, "0"),
        (ENV_DUMP_DIR, "  "),
    ]));
    assert_eq!(cfg.wait_window, Duration::from_secs(5));
    assert_eq!(cfg.retry_interval, Duration::from_millis(1));
    assert_eq!(cfg.event_capacity, 1024);
    assert_eq!(cfg.dump_dir, None);
}
