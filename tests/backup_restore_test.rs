//! Backup and Restore Integration Tests
//!
//! Tests for snapshot backups, restore correctness, and the safety paths
//! that keep the live database intact when a restore cannot proceed.

mod common;

use common::{read_row, read_rows, v, TestFixture};
use settingsdb::backup::calculate_file_hash;
use settingsdb::defaults::AUTOMATIC_BACKUP_KEY;
use settingsdb::Error;
use std::fs;

// =============================================================================
// Snapshot
// =============================================================================

#[test]
fn test_backup_matches_live_database() {
    let fixture = TestFixture::new();
    fixture.manager.flush().unwrap();

    let info = fixture.manager.create_backup().unwrap();
    assert_eq!(info.path, fixture.backup_path());
    assert_eq!(info.size, fs::metadata(fixture.backup_path()).unwrap().len());

    let (live_hash, _) = calculate_file_hash(&fixture.database_path()).unwrap();
    assert_eq!(info.sha256, live_hash);
    assert!(!fixture.temp_path().exists());
}

#[test]
fn test_two_backups_in_a_row_are_identical() {
    let fixture = TestFixture::new();
    fixture.manager.flush().unwrap();

    let first = fixture.manager.create_backup().unwrap();
    let second = fixture.manager.create_backup().unwrap();

    assert_eq!(first.sha256, second.sha256);
    assert_eq!(
        fs::read(fixture.backup_path()).unwrap(),
        fs::read(fixture.database_path()).unwrap()
    );
}

#[test]
fn test_stale_temp_file_is_replaced() {
    let fixture = TestFixture::new();
    fixture.manager.flush().unwrap();
    fs::write(fixture.temp_path(), b"leftover").unwrap();

    fixture.manager.create_backup().unwrap();
    assert!(!fixture.temp_path().exists());
}

#[test]
fn test_auto_backup_after_flush() {
    let fixture = TestFixture::with_auto_backup();
    fixture.manager.set("A", "1");

    let report = fixture.manager.flush().unwrap();
    let info = report.backup.expect("auto backup should run");
    assert_eq!(read_row(&info.path, "A"), Some(v(&["1"])));

    // Nothing to flush, nothing to back up
    assert!(fixture.manager.flush().unwrap().backup.is_none());
}

#[test]
fn test_auto_backup_follows_setting() {
    let fixture = TestFixture::empty();
    fixture.manager.set("A", "1");
    assert!(fixture.manager.flush().unwrap().backup.is_none());
    assert!(!fixture.manager.has_backup());

    fixture.manager.set(AUTOMATIC_BACKUP_KEY, true);
    let info = fixture.manager.flush().unwrap().backup.expect("setting enables backup");
    assert_eq!(read_row(&info.path, AUTOMATIC_BACKUP_KEY), Some(v(&["True"])));
    assert!(fixture.manager.has_backup());

    fixture.manager.set(AUTOMATIC_BACKUP_KEY, false);
    assert!(fixture.manager.flush().unwrap().backup.is_none());
}

#[test]
fn test_backup_without_database_file_reports_warning() {
    let fixture = TestFixture::new();
    fixture.manager.shutdown().unwrap();
    fs::remove_file(fixture.database_path()).unwrap();

    let err = fixture.manager.create_backup().unwrap_err();
    assert!(err.is_not_found());
    assert!(fixture.warnings()[0].starts_with("Failed to create backup: "));
}

// =============================================================================
// Restore
// =============================================================================

#[test]
fn test_restore_brings_back_backed_up_value() {
    let fixture = TestFixture::empty();
    fixture.manager.set("A", "1");
    fixture.manager.flush().unwrap();
    fixture.manager.create_backup().unwrap();

    fixture.manager.set("A", "2");
    fixture.manager.flush().unwrap();
    assert_eq!(read_row(&fixture.database_path(), "A"), Some(v(&["2"])));

    let result = fixture.manager.restore_backup().unwrap();
    assert_eq!(result.keys_restored, 1);
    assert!(result.restart_requested);

    assert_eq!(fixture.manager.get_setting("A"), v(&["1"]));
    assert_eq!(read_row(&fixture.database_path(), "A"), Some(v(&["1"])));
    assert!(!fixture.temp_path().exists());
    assert!(fixture.warnings().is_empty());
}

#[test]
fn test_restore_discards_unflushed_changes() {
    let fixture = TestFixture::empty();
    fixture.manager.set("A", "1");
    fixture.manager.flush().unwrap();
    fixture.manager.create_backup().unwrap();

    fixture.manager.set("Pending", "x");
    fixture.manager.restore_backup().unwrap();

    assert!(fixture.manager.get_setting("Pending").is_empty());
    assert!(!fixture.manager.has_pending_changes());

    fixture.manager.flush().unwrap();
    assert_eq!(read_rows(&fixture.database_path()), vec![("A".to_string(), v(&["1"]))]);
}

#[test]
fn test_writes_after_restore_persist() {
    let fixture = TestFixture::empty();
    fixture.manager.set("A", "1");
    fixture.manager.flush().unwrap();
    fixture.manager.create_backup().unwrap();
    fixture.manager.restore_backup().unwrap();

    fixture.manager.set("B", "2");
    fixture.manager.flush().unwrap();

    assert_eq!(
        read_rows(&fixture.database_path()),
        vec![("A".to_string(), v(&["1"])), ("B".to_string(), v(&["2"]))]
    );
}

#[test]
fn test_restore_without_backup_leaves_database_untouched() {
    let fixture = TestFixture::new();
    fixture.manager.flush().unwrap();
    let before = fs::read(fixture.database_path()).unwrap();

    let err = fixture.manager.restore_backup().unwrap_err();
    assert!(matches!(err, Error::BackupNotFound(_)));
    assert_eq!(fs::read(fixture.database_path()).unwrap(), before);
    assert_eq!(
        fixture.warnings(),
        vec!["Failed to restore backup: no backup file found".to_string()]
    );

    // The connection is still usable
    fixture.manager.set("After", 1);
    fixture.manager.flush().unwrap();
}

#[test]
fn test_corrupt_backup_is_rejected() {
    let fixture = TestFixture::empty();
    fixture.manager.set("A", "live");
    fixture.manager.flush().unwrap();
    fs::write(
        fixture.backup_path(),
        vec![0x42u8; 4096],
    )
    .unwrap();
    let before = fs::read(fixture.database_path()).unwrap();

    let err = fixture.manager.restore_backup().unwrap_err();
    assert!(matches!(err, Error::InvalidBackup { .. }));
    assert!(err.is_backup_error());
    assert_eq!(fs::read(fixture.database_path()).unwrap(), before);
    assert_eq!(fixture.manager.get_setting("A"), v(&["live"]));
    assert!(fixture.warnings()[0].starts_with("Failed to restore backup: "));
}

#[test]
fn test_restore_after_shutdown_is_refused() {
    let fixture = TestFixture::new();
    fixture.manager.flush().unwrap();
    fixture.manager.create_backup().unwrap();
    fixture.manager.shutdown().unwrap();

    assert!(matches!(fixture.manager.restore_backup(), Err(Error::Closed)));
}

// =============================================================================
// Crash recovery
// =============================================================================

#[test]
fn test_interrupted_restore_is_recovered_on_startup() {
    let fixture = TestFixture::empty();
    fixture.manager.set("A", "before");
    let fixture = fixture.reopen();
    fixture.manager.shutdown().unwrap();

    // Simulate a crash after the safety copy was made and the live file removed
    fs::copy(fixture.database_path(), fixture.temp_path()).unwrap();
    fs::remove_file(fixture.database_path()).unwrap();

    let fixture = fixture.reopen();
    assert_eq!(fixture.manager.get_setting("A"), v(&["before"]));
    assert!(!fixture.temp_path().exists());
}

#[test]
fn test_stale_temp_is_removed_on_startup() {
    let fixture = TestFixture::empty();
    fixture.manager.set("A", "live");
    fixture.manager.flush().unwrap();
    fs::write(fixture.temp_path(), b"stale").unwrap();

    let fixture = fixture.reopen();
    assert_eq!(fixture.manager.get_setting("A"), v(&["live"]));
    assert!(!fixture.temp_path().exists());
}
