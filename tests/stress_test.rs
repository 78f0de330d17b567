//! Stress tests for concurrent access and debounce coalescing

mod common;

use common::{read_rows, v, wait_until, TestFixture};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_concurrent_writers_on_distinct_keys_all_persist() {
    let fixture = TestFixture::empty();
    let manager = Arc::new(fixture.manager);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for i in 0..50 {
                    manager.set(&format!("thread{t}.key{i}"), i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(manager.len(), 400);
    manager.flush().unwrap();

    let rows = read_rows(&fixture.temp_dir.path().join("settings.db"));
    assert_eq!(rows.len(), 400);
    assert!(rows.contains(&("thread7.key49".to_string(), v(&["49"]))));
}

#[test]
fn test_concurrent_writers_and_flushes() {
    let fixture = TestFixture::empty();
    let manager = Arc::new(fixture.manager);

    let flusher = {
        let manager = Arc::clone(&manager);
        thread::spawn(move || {
            for _ in 0..20 {
                manager.flush().unwrap();
                thread::sleep(Duration::from_millis(2));
            }
        })
    };
    let writers: Vec<_> = (0..4)
        .map(|t| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for i in 0..100 {
                    let key = format!("w{t}.{}", i % 10);
                    manager.set(&key, i);
                    if i % 7 == 0 {
                        manager.remove_setting(&key);
                    }
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    flusher.join().unwrap();
    manager.flush().unwrap();

    // The database mirrors memory exactly, one row per key
    let rows = read_rows(&fixture.temp_dir.path().join("settings.db"));
    let keys: Vec<String> = rows.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(keys, manager.keys());
    for (key, lines) in rows {
        assert_eq!(manager.get_setting(&key), lines);
    }
}

#[test]
fn test_burst_is_coalesced_into_one_flush() {
    let fixture = TestFixture::with_config(|mut config| {
        config.debounce = Duration::from_millis(200);
        config.defaults.clear();
        config
    });

    for i in 0..50 {
        fixture.manager.set("Counter", i);
        thread::sleep(Duration::from_millis(1));
    }

    let path = fixture.database_path();
    assert!(wait_until(Duration::from_secs(5), || {
        fixture.manager.scheduled_flush_count() == 1
    }));
    thread::sleep(Duration::from_millis(400));

    assert_eq!(fixture.manager.scheduled_flush_count(), 1);
    assert_eq!(read_rows(&path), vec![("Counter".to_string(), v(&["49"]))]);
}

#[test]
fn test_set_then_remove_before_flush_writes_nothing() {
    let fixture = TestFixture::empty();
    fixture.manager.set("Transient", "x");
    fixture.manager.remove_setting("Transient");

    assert!(!fixture.manager.has_pending_changes());
    assert!(fixture.manager.flush().unwrap().is_empty());
    assert!(read_rows(&fixture.database_path()).is_empty());
}

#[test]
fn test_concurrent_readers_see_consistent_values() {
    let fixture = TestFixture::empty();
    fixture.manager.set("Shared", ["a", "b"]);
    let manager = Arc::new(fixture.manager);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for _ in 0..500 {
                    let lines = manager.get_setting("Shared");
                    assert!(lines == v(&["a", "b"]) || lines == v(&["c", "d"]));
                }
            })
        })
        .collect();

    for i in 0..200 {
        if i % 2 == 0 {
            manager.set("Shared", ["c", "d"]);
        } else {
            manager.set("Shared", ["a", "b"]);
        }
    }
    for reader in readers {
        reader.join().unwrap();
    }
}
