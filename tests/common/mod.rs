//! Common test utilities for settingsdb integration tests
//!
//! Provides shared test fixtures, a fault-injecting storage backend, and
//! helpers that read the database file directly.

#![allow(dead_code)]

use settingsdb::defaults::DefaultSet;
use settingsdb::{
    FlushBatch, Rows, SettingsConfig, SettingsManager, SqliteStorage, StorageBackend,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Debounce window used by fixtures; long enough that tests control flushes
pub const TEST_DEBOUNCE: Duration = Duration::from_secs(60);

/// Debounce window for tests that exercise the timer itself
pub const SHORT_DEBOUNCE: Duration = Duration::from_millis(50);

// =============================================================================
// Test Fixtures
// =============================================================================

/// A small default set used by fixtures
pub fn test_defaults() -> Vec<(String, Vec<String>)> {
    DefaultSet::new()
        .with("LookMode", true)
        .with("ScanSpeed", 50)
        .with("Names", "Mytherin")
        .with("NotificationItems", "")
        .build()
}

/// Test fixture that provides a temporary directory and configured SettingsManager
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub manager: SettingsManager,
    pub warnings: Arc<Mutex<Vec<String>>>,
}

impl TestFixture {
    /// Create a new test fixture with the test default set
    pub fn new() -> Self {
        Self::with_config(|config| config)
    }

    /// Create a fixture without any defaults
    pub fn empty() -> Self {
        Self::with_config(|mut config| {
            config.defaults.clear();
            config
        })
    }

    /// Create a fixture whose timer flushes quickly
    pub fn with_short_debounce() -> Self {
        Self::with_config(|mut config| {
            config.debounce = SHORT_DEBOUNCE;
            config
        })
    }

    /// Create a fixture taking a backup after every flush
    pub fn with_auto_backup() -> Self {
        Self::with_config(|mut config| {
            config.auto_backup = true;
            config
        })
    }

    /// Create a fixture after adjusting the config
    pub fn with_config(adjust: impl FnOnce(SettingsConfig) -> SettingsConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let manager: SettingsManager = SettingsManager::new(adjust(config_for(temp_dir.path())))
            .expect("Failed to create manager");
        let warnings = capture_warnings(&manager);

        Self {
            temp_dir,
            manager,
            warnings,
        }
    }

    /// Open a second manager on the same directory (after dropping the first)
    pub fn reopen(self) -> Self {
        let TestFixture {
            temp_dir, manager, ..
        } = self;
        manager.shutdown().expect("Failed to shut down manager");
        drop(manager);

        let manager: SettingsManager =
            SettingsManager::new(config_for(temp_dir.path())).expect("Failed to reopen manager");
        let warnings = capture_warnings(&manager);
        Self {
            temp_dir,
            manager,
            warnings,
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.temp_dir.path().join("settings.db")
    }

    pub fn backup_path(&self) -> PathBuf {
        self.temp_dir.path().join("settings.db.bak")
    }

    pub fn temp_path(&self) -> PathBuf {
        self.temp_dir.path().join("settings.db.tmp")
    }

    /// Warnings reported so far
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture config rooted at `dir`
pub fn config_for(dir: &Path) -> SettingsConfig {
    SettingsConfig::builder("test-app")
        .config_dir(dir)
        .debounce(TEST_DEBOUNCE)
        .with_defaults(test_defaults())
        .build()
}

/// Collect every warning reported by `manager`
pub fn capture_warnings<S: StorageBackend>(manager: &SettingsManager<S>) -> Arc<Mutex<Vec<String>>> {
    let warnings = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&warnings);
    manager
        .events()
        .on_warning(move |message| sink.lock().unwrap().push(message.to_string()));
    warnings
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Lines helper
pub fn v(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Read every row of a database file, sorted by key
pub fn read_rows(path: &Path) -> Rows {
    let storage = SqliteStorage::open(path).expect("Failed to open database");
    let mut rows = storage.load_all().expect("Failed to read database");
    storage.close().expect("Failed to close database");
    rows.sort();
    rows
}

/// Value stored for `key` in the database file
pub fn read_row(path: &Path, key: &str) -> Option<Vec<String>> {
    read_rows(path)
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, lines)| lines)
}

/// Poll until `condition` holds or `limit` elapses
pub fn wait_until(limit: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < limit {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    condition()
}

// =============================================================================
// Fault-injecting backend
// =============================================================================

/// Makes every `FailingStorage::commit` fail while set
pub static FAIL_COMMITS: AtomicBool = AtomicBool::new(false);

/// Number of upcoming `FailingStorage::open` calls that fail
pub static FAIL_NEXT_OPENS: AtomicUsize = AtomicUsize::new(0);

static FAULT_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that flip the fault switches and reset them
pub fn fault_guard() -> MutexGuard<'static, ()> {
    let guard = FAULT_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    FAIL_COMMITS.store(false, Ordering::SeqCst);
    FAIL_NEXT_OPENS.store(0, Ordering::SeqCst);
    guard
}

/// SQLite backend whose commits and opens can be made to fail
pub struct FailingStorage {
    inner: SqliteStorage,
}

impl StorageBackend for FailingStorage {
    fn open(path: &Path) -> settingsdb::Result<Self> {
        let failing = FAIL_NEXT_OPENS
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(settingsdb::Error::Config("simulated open failure".into()));
        }
        Ok(Self {
            inner: SqliteStorage::open(path)?,
        })
    }

    fn verify(path: &Path) -> settingsdb::Result<()> {
        SqliteStorage::verify(path)
    }

    fn load_all(&self) -> settingsdb::Result<Rows> {
        self.inner.load_all()
    }

    fn commit(&mut self, batch: &FlushBatch) -> settingsdb::Result<()> {
        if FAIL_COMMITS.load(Ordering::SeqCst) {
            return Err(settingsdb::Error::Config("simulated disk failure".into()));
        }
        self.inner.commit(batch)
    }

    fn close(self) -> settingsdb::Result<()> {
        self.inner.close()
    }
}

/// Install `env_logger` once for tests that want log output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
