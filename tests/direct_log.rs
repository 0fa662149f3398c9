use std::{fs, path::PathBuf};

use tempfile::TempDir;

use quietlog::{
    direct::{DirectLog, DirectLogError},
    persist::{ConstructionError, PersistError, WriteOutcome},
    types::{Criticality, CriticalityError},
};

fn existing_log(tmp: &TempDir) -> PathBuf {
    let path = tmp.path().join("direct.log");
    fs::write(&path, "").expect("seed");
    path
}

#[test]
fn criticality_codes_resolve_to_labels() {
    let labels: Vec<&str> = (0u8..=3)
        .map(|c| Criticality::from_code(c).expect("in range").label())
        .collect();
    assert_eq!(labels, vec!["Info", "Minor", "Major", "Critical"]);
    assert_eq!(Criticality::try_from(4u8), Err(CriticalityError::OutOfRange(4)));
    assert_eq!(Criticality::Major.to_string(), "Major");
}

#[test]
fn writes_entry_with_details() {
    let tmp = TempDir::new().expect("tmp");
    let path = existing_log(&tmp);
    let log = DirectLog::open(&path).expect("open");

    log.try_write("scheduler", "queue stalled", 2, Some("retrying in 5s"))
        .expect("write");
    log.try_write("scheduler", "recovered", 0, None).expect("write");

    let content = fs::read_to_string(&path).expect("read");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("] [Major] scheduler -> queue stalled;"));
    assert_eq!(lines[1], "\tDetails: retrying in 5s");
    assert!(lines[2].ends_with("] [Info] scheduler -> recovered;"));
}

#[test]
fn out_of_range_code_writes_nothing() {
    let tmp = TempDir::new().expect("tmp");
    let log = DirectLog::open(existing_log(&tmp)).expect("open");

    let err = log.try_write("main", "bad", 9, None).expect_err("out of range");
    assert!(matches!(
        err,
        DirectLogError::Criticality(CriticalityError::OutOfRange(9))
    ));
    assert_eq!(fs::read_to_string(log.path()).expect("read"), "");
}

#[test]
fn removed_target_is_not_recreated() {
    let tmp = TempDir::new().expect("tmp");
    let log = DirectLog::open(existing_log(&tmp)).expect("open");
    fs::remove_file(log.path()).expect("remove");

    let err = log
        .write("main", "gone", Criticality::Minor, None)
        .expect_err("missing target");
    assert!(matches!(err, PersistError::FileNotFound { .. }));
    assert_eq!(err.outcome(), WriteOutcome::FileNotFound);
    assert!(!log.path().exists());
}

#[test]
fn open_rejects_missing_file_without_creating_it() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("absent.log");

    let err = DirectLog::open(&path).expect_err("missing target");
    assert!(matches!(err, ConstructionError::NotFound { .. }), "unexpected error: {err:?}");
    assert!(!path.exists());
}
