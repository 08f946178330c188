// Integration tests for the append log and snapshot stores

use crate::common::article_schema;
use sift::core::indexes::Index;
use sift::core::storage::{AppendLog, KeyValueStore, ReplayOutcome, SnapshotStore};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::tempdir;

type IndexLog = AppendLog<String, Index>;

fn open_replayed(path: &Path) -> IndexLog {
    let log = IndexLog::open(path).unwrap().with_sync_writes(false);
    let outcome = log.replay(&AtomicBool::new(false)).unwrap();
    assert!(outcome.is_completed());
    log
}

fn by_name(log: &IndexLog) -> HashMap<String, Index> {
    log.all()
        .into_iter()
        .map(|index| (index.name.clone(), index))
        .collect()
}

#[test]
fn test_fresh_instance_reconstructs_identical_map() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("indexes.dat");

    let before = {
        let log = open_replayed(&path);
        for name in ["articles", "products", "users"] {
            log.create(name.to_string(), Index::new(name, article_schema()))
                .unwrap();
        }
        by_name(&log)
    };

    let after = by_name(&open_replayed(&path));
    assert_eq!(before, after);
}

#[test]
fn test_trailing_tombstone_removes_key() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("indexes.dat");

    {
        let log = open_replayed(&path);
        log.create("k".to_string(), Index::new("k", article_schema()))
            .unwrap();
        log.delete(&"k".to_string()).unwrap();
    }

    let log = open_replayed(&path);
    assert!(log.get(&"k".to_string()).unwrap_err().is_not_found());
    assert!(log.is_empty());

    // The tombstone stays in the log; nothing is physically erased
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
}

#[test]
fn test_recreate_after_delete_survives_replay() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("indexes.dat");

    let recreated = {
        let log = open_replayed(&path);
        log.create("k".to_string(), Index::new("k", article_schema()))
            .unwrap();
        log.delete(&"k".to_string()).unwrap();
        let second = Index::new("k", article_schema());
        log.create("k".to_string(), second.clone()).unwrap();
        second
    };

    let log = open_replayed(&path);
    assert_eq!(log.get(&"k".to_string()).unwrap(), recreated);
}

#[test]
fn test_replaying_twice_yields_same_map() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("indexes.dat");

    let log = open_replayed(&path);
    log.create("a".to_string(), Index::new("a", article_schema()))
        .unwrap();
    log.create("b".to_string(), Index::new("b", article_schema()))
        .unwrap();
    log.delete(&"a".to_string()).unwrap();

    let first = by_name(&log);
    log.replay(&AtomicBool::new(false)).unwrap();
    let second = by_name(&log);
    log.replay(&AtomicBool::new(false)).unwrap();

    assert_eq!(first, second);
    assert_eq!(second, by_name(&log));
}

#[test]
fn test_redundant_tombstones_are_tolerated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("indexes.dat");
    fs::write(
        &path,
        "{\"key\":\"gone\",\"isDeleted\":true}\n{\"key\":\"gone\",\"isDeleted\":true}\n",
    )
    .unwrap();

    let log = IndexLog::open(&path).unwrap();
    assert_eq!(
        log.replay(&AtomicBool::new(false)).unwrap(),
        ReplayOutcome::Completed { records: 2 }
    );
    assert!(log.is_empty());
}

#[test]
fn test_duplicate_create_has_no_side_effect() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("indexes.dat");
    let log = open_replayed(&path);

    let original = Index::new("k", article_schema());
    log.create("k".to_string(), original.clone()).unwrap();
    let size = fs::metadata(&path).unwrap().len();

    let err = log
        .create("k".to_string(), Index::new("k", article_schema()))
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(fs::metadata(&path).unwrap().len(), size);
    assert_eq!(log.get(&"k".to_string()).unwrap(), original);
}

#[test]
fn test_absent_keys_are_not_found() {
    let dir = tempdir().unwrap();
    let log = open_replayed(&dir.path().join("indexes.dat"));

    assert!(log.get(&"missing".to_string()).unwrap_err().is_not_found());
    assert!(log.delete(&"missing".to_string()).unwrap_err().is_not_found());
}

#[test]
fn test_crash_mid_append_recovers_committed_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("indexes.dat");

    {
        let log = open_replayed(&path);
        log.create("kept".to_string(), Index::new("kept", article_schema()))
            .unwrap();
    }

    // Simulate a process dying halfway through writing the next record
    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(b"{\"key\":\"lost\",\"value\":{\"name\":\"lo")
        .unwrap();
    drop(file);

    let log = open_replayed(&path);
    assert_eq!(log.len(), 1);
    assert!(log.get(&"kept".to_string()).is_ok());

    // Appends after recovery start on a clean line
    log.create("next".to_string(), Index::new("next", article_schema()))
        .unwrap();
    drop(log);
    let log = open_replayed(&path);
    assert_eq!(log.len(), 2);
}

#[test]
fn test_corrupt_record_stops_startup() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("indexes.dat");
    fs::write(&path, "{\"key\":\"k\"}\n").unwrap();

    let log = IndexLog::open(&path).unwrap();
    let err = log.replay(&AtomicBool::new(false)).unwrap_err();
    assert!(err.to_string().contains("has no value"));
    assert!(!log.is_ready());
}

#[test]
fn test_cancelled_replay_reports_no_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("indexes.dat");
    {
        let log = open_replayed(&path);
        log.create("k".to_string(), Index::new("k", article_schema()))
            .unwrap();
    }

    let log = IndexLog::open(&path).unwrap();
    let outcome = log.replay(&AtomicBool::new(true)).unwrap();
    assert!(!outcome.is_completed());
    assert!(!log.is_ready());
}

#[test]
fn test_concurrent_creates_on_shared_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("indexes.dat");
    let log = Arc::new(open_replayed(&path));
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let log = Arc::clone(&log);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let name = format!("index_{i}");
                let distinct = log.create(name.clone(), Index::new(name, article_schema()));
                let shared = log.create("shared".to_string(), Index::new("shared", article_schema()));
                (distinct.is_ok(), shared)
            })
        })
        .collect();

    let mut shared_ok = 0;
    for handle in handles {
        let (distinct_ok, shared) = handle.join().unwrap();
        assert!(distinct_ok);
        match shared {
            Ok(()) => shared_ok += 1,
            Err(err) => assert!(err.is_conflict()),
        }
    }

    assert_eq!(shared_ok, 1);
    assert_eq!(log.all().len(), threads + 1);
    drop(log);

    // Every committed create is in the log exactly once
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), threads + 1);
    assert_eq!(open_replayed(&path).len(), threads + 1);
}

#[test]
fn test_concurrent_delete_and_get() {
    let dir = tempdir().unwrap();
    let log = Arc::new(open_replayed(&dir.path().join("indexes.dat")));
    for i in 0..32 {
        let name = format!("index_{i}");
        log.create(name.clone(), Index::new(name, article_schema()))
            .unwrap();
    }

    let deleter = {
        let log = Arc::clone(&log);
        thread::spawn(move || {
            for i in 0..32 {
                log.delete(&format!("index_{i}")).unwrap();
            }
        })
    };
    let reader = {
        let log = Arc::clone(&log);
        thread::spawn(move || {
            for i in 0..32 {
                match log.get(&format!("index_{i}")) {
                    Ok(index) => assert_eq!(index.name, format!("index_{i}")),
                    Err(err) => assert!(err.is_not_found()),
                }
            }
        })
    };

    deleter.join().unwrap();
    reader.join().unwrap();
    assert!(log.is_empty());
}

// =============================================================================
// Snapshot mode
// =============================================================================

#[test]
fn test_snapshot_round_trips_indexes_exactly() {
    let store: SnapshotStore<String, Index> = ["articles", "products"]
        .into_iter()
        .map(|name| (name.to_string(), Index::new(name, article_schema())))
        .collect();

    let mut buf = Vec::new();
    store.save(&mut buf).unwrap();

    let restored: SnapshotStore<String, Index> = SnapshotStore::new();
    assert_eq!(restored.load(buf.as_slice()).unwrap(), 2);

    for name in ["articles", "products"] {
        let key = name.to_string();
        assert_eq!(restored.get(&key).unwrap(), store.get(&key).unwrap());
    }
}

#[test]
fn test_snapshot_load_failure_keeps_contents() {
    let store: SnapshotStore<String, Index> = SnapshotStore::new();
    store
        .create("kept".to_string(), Index::new("kept", article_schema()))
        .unwrap();

    assert!(store.load(&b"not a snapshot"[..]).is_err());
    assert_eq!(store.len(), 1);
}
