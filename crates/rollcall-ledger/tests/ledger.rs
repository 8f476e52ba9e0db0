use rollcall_core::{Embedding, Identity, Matcher, NearestMatcher, ReferenceSet};
use rollcall_ledger::{AttendanceLedger, HEADER};
use std::fs;
use std::path::Path;

fn data_rows(path: &Path) -> Vec<(String, String)> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    assert_eq!(reader.headers().unwrap(), &csv::StringRecord::from(HEADER.to_vec()));
    reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            (r[0].to_string(), r[1].to_string())
        })
        .collect()
}

#[test]
fn test_mark_twice_appends_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut ledger = AttendanceLedger::new(dir.path().join("attendance.csv"));
    ledger.ensure_ready().unwrap();

    let alice = Identity::Known("alice".into());
    assert!(ledger.mark(&alice).unwrap().is_some());
    assert!(ledger.mark(&alice).unwrap().is_none());

    let rows = data_rows(ledger.path());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "alice");
    assert!(ledger.is_marked("alice"));
}

#[test]
fn test_ensure_ready_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance.csv");
    let ledger = AttendanceLedger::new(&path);

    ledger.ensure_ready().unwrap();
    let once = fs::read(&path).unwrap();
    for _ in 0..5 {
        ledger.ensure_ready().unwrap();
    }
    assert_eq!(fs::read(&path).unwrap(), once);
    assert!(data_rows(&path).is_empty());
}

#[test]
fn test_ensure_ready_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance.csv");
    let mut first_run = AttendanceLedger::new(&path);
    first_run.ensure_ready().unwrap();
    first_run.mark(&Identity::Known("bob".into())).unwrap();
    let before = fs::read(&path).unwrap();

    AttendanceLedger::new(&path).ensure_ready().unwrap();
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_new_run_can_log_same_person_again() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance.csv");
    let carol = Identity::Known("carol".into());

    for _ in 0..2 {
        let mut ledger = AttendanceLedger::new(&path);
        ledger.ensure_ready().unwrap();
        ledger.mark(&carol).unwrap();
    }

    let names: Vec<_> = data_rows(&path).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["carol".to_string(), "carol".to_string()]);
}

#[test]
fn test_detection_stream_logs_alice_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut ledger = AttendanceLedger::new(dir.path().join("attendance.csv"));
    ledger.ensure_ready().unwrap();

    let vector_a = Embedding::from_values(vec![1.0, 0.0, 0.0]);
    let vector_b = Embedding::from_values(vec![-1.0, 0.0, 0.0]);
    let mut references = ReferenceSet::default();
    references.insert("alice".into(), vector_a.clone());

    for probe in [&vector_a, &vector_a, &vector_b] {
        let identity = NearestMatcher.identify(probe, &references);
        ledger.mark(&identity).unwrap();
    }

    let rows = data_rows(ledger.path());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "alice");
    assert_eq!(rows[0].1.len(), "YYYY-MM-DD HH:MM:SS".len());
    assert!(rows.iter().all(|(n, _)| n != "Unknown"));
}
