use std::{
    collections::HashMap,
    fs,
    sync::{Arc, Mutex},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use quietlog::{
    persist::{dump::DUMP_PREFIX, PersistError, WriteOutcome},
    runtime::{
        config::LoggerConfig,
        events::{EventKind, LogEvent},
        handle::spawn_logger,
    },
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Station {
    call: String,
    grid: String,
    power_w: u32,
    tags: Vec<String>,
}

fn station() -> Station {
    Station {
        call: "K1ABC".to_string(),
        grid: "FN42".to_string(),
        power_w: 100,
        tags: vec!["portable".to_string(), "cw".to_string()],
    }
}

fn config(dump_dir: &std::path::Path) -> LoggerConfig {
    LoggerConfig {
        wait_window: Duration::from_secs(60),
        dump_dir: Some(dump_dir.to_path_buf()),
        ..LoggerConfig::default()
    }
}

#[tokio::test]
async fn dump_round_trips_and_reports_path_once() {
    let tmp = TempDir::new().expect("tmp");
    let dumps = tmp.path().join("dumps");
    fs::create_dir(&dumps).expect("mkdir");
    let log_path = tmp.path().join("app.log");
    let logger = spawn_logger(&log_path, config(&dumps)).expect("spawn");

    let reported = Arc::new(Mutex::new(Vec::new()));
    {
        let reported = Arc::clone(&reported);
        logger.on(EventKind::ObjectDumped, move |evt| {
            if let LogEvent::ObjectDumped { path } = evt {
                reported.lock().expect("lock").push(path.clone());
            }
        });
    }

    let path = logger.dump_object("main", &station()).expect("dump");

    assert_eq!(*reported.lock().expect("lock"), vec![path.clone()]);
    assert_eq!(path.parent(), Some(dumps.as_path()));
    let name = path.file_name().and_then(|n| n.to_str()).expect("name");
    assert!(name.starts_with(DUMP_PREFIX));
    assert!(name.ends_with(".json"));

    let text = fs::read_to_string(&path).expect("read dump");
    assert!(text.contains("\n  \"call\""), "expected indented JSON: {text}");
    let back: Station = serde_json::from_str(&text).expect("parse dump");
    assert_eq!(back, station());

    let pending = logger.pending().await.expect("pending");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].message, format!("Dumped object to: {}", path.display()));

    logger.flush().await.expect("flush");
    let log = fs::read_to_string(&log_path).expect("read log");
    assert!(log.contains(&format!("-- [main]: Dumped object to: {}", path.display())));

    logger.close().await.expect("close");
}

#[tokio::test]
async fn each_dump_gets_a_fresh_file() {
    let tmp = TempDir::new().expect("tmp");
    let logger = spawn_logger(tmp.path().join("app.log"), config(tmp.path())).expect("spawn");

    let first = logger.dump_object("main", &station()).expect("dump");
    let second = logger.dump_object("main", &station()).expect("dump");
    assert_ne!(first, second);
    assert!(first.exists() && second.exists());

    logger.close().await.expect("close");
}

#[tokio::test]
async fn missing_dump_dir_is_reported_not_raised() {
    let tmp = TempDir::new().expect("tmp");
    let missing = tmp.path().join("gone");
    let logger = spawn_logger(tmp.path().join("app.log"), config(&missing)).expect("spawn");
    let mut rx = logger.subscribe();

    let err = logger.dump_object("main", &station()).expect_err("missing dir");
    assert_eq!(err.outcome(), WriteOutcome::FileNotFound);

    let mut dump_failed = 0;
    let mut dumped = 0;
    while let Ok(evt) = rx.try_recv() {
        match evt {
            LogEvent::DumpFailed { outcome, .. } => {
                assert_eq!(outcome, WriteOutcome::FileNotFound);
                dump_failed += 1;
            }
            LogEvent::ObjectDumped { .. } => dumped += 1,
            _ => {}
        }
    }
    assert_eq!((dump_failed, dumped), (1, 0));
    assert!(logger.pending().await.expect("pending").is_empty());

    logger.close().await.expect("close");
}

#[tokio::test]
async fn unserializable_value_is_reported() {
    let tmp = TempDir::new().expect("tmp");
    let logger = spawn_logger(tmp.path().join("app.log"), config(tmp.path())).expect("spawn");

    let mut value = HashMap::new();
    value.insert((1u8, 2u8), "tuple keys are not JSON object keys");

    let err = logger.dump_object("main", &value).expect_err("serialize");
    assert!(matches!(err, PersistError::Serde(_)));
    assert_eq!(err.outcome(), WriteOutcome::Failed);

    logger.close().await.expect("close");
}

#[tokio::test]
async fn closed_logger_writes_no_dump() {
    let tmp = TempDir::new().expect("tmp");
    let dumps = tmp.path().join("dumps");
    fs::create_dir(&dumps).expect("mkdir");
    let logger = spawn_logger(tmp.path().join("app.log"), config(&dumps)).expect("spawn");

    let failures = Arc::new(Mutex::new(Vec::new()));
    {
        let failures = Arc::clone(&failures);
        logger.on(EventKind::DumpFailed, move |evt| {
            if let LogEvent::DumpFailed { outcome, .. } = evt {
                failures.lock().expect("lock").push(*outcome);
            }
        });
    }
    logger.close().await.expect("close");

    let err = logger.dump_object("main", &station()).expect_err("closed");
    assert!(matches!(err, PersistError::Closed));
    assert_eq!(*failures.lock().expect("lock"), vec![WriteOutcome::Failed]);
    assert_eq!(fs::read_dir(&dumps).expect("read dir").count(), 0);
}
