use crate::config::SettingsConfig;
use crate::error::Result;
use crate::events::EventManager;
use crate::scheduler::FlushScheduler;
use crate::storage::{SqliteStorage, StorageBackend};
use crate::store::MemoryStore;
use crate::sync::MutexExt;

use log::{debug, info, warn};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// State shared between the manager and the flush worker
///
/// Lock order is `storage` before `store`. The store lock is only ever held
/// for in-memory work.
pub(crate) struct Inner<S: StorageBackend> {
    /// Configuration
    pub(crate) config: SettingsConfig,

    /// Settings map and pending change sets
    pub(crate) store: Mutex<MemoryStore>,

    /// Open connection; also the I/O lock serializing flush, backup and restore
    pub(crate) storage: Mutex<Option<S>>,

    /// Change listeners and warning reporters
    pub(crate) events: Arc<EventManager>,
}

/// Settings store with debounced durable persistence and backup/restore.
///
/// Reads and writes touch only memory and never block on I/O. Every
/// mutation restarts a quiescence timer; once it elapses all pending changes
/// are committed to the database in one transaction.
///
/// # Example
///
/// ```rust,no_run
/// use settingsdb::SettingsManager;
///
/// let manager = SettingsManager::builder("my-app")
///     .config_dir("~/.config/my-app")
///     .auto_backup(true)
///     .build()?;
///
/// manager.set("LookMode", false);
/// assert!(!manager.get_setting_bool("LookMode"));
///
/// manager.shutdown()?;
/// # Ok::<(), settingsdb::Error>(())
/// ```
///
/// # Type Parameters
///
/// * `S`: The storage backend (defaults to [`SqliteStorage`]).
pub struct SettingsManager<S: StorageBackend = SqliteStorage> {
    pub(crate) inner: Arc<Inner<S>>,
    pub(crate) scheduler: FlushScheduler,
    closed: AtomicBool,
}

impl<S: StorageBackend> SettingsManager<S> {
    /// Open the database described by `config` and load it into memory.
    ///
    /// Missing defaults are filled in and scheduled for persistence, so the
    /// first run writes the complete default set.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the database, backup and temporary paths
    /// are not distinct, or an error if the database cannot be opened or
    /// read or the flush worker cannot be started.
    pub fn new(config: SettingsConfig) -> Result<Self> {
        config.validate()?;
        let database_path = config.database_path();
        crate::backup::recover_interrupted_restore::<S>(&config)?;

        let storage = S::open(&database_path)?;
        let rows = storage.load_all()?;

        let mut store = MemoryStore::new();
        store.load(rows);
        let loaded = store.len();
        let mut added = 0usize;
        for (key, lines) in &config.defaults {
            if !store.contains(key) {
                store.set(key, lines.clone());
                added += 1;
            }
        }

        let debounce = config.debounce;
        let inner = Arc::new(Inner {
            config,
            store: Mutex::new(store),
            storage: Mutex::new(Some(storage)),
            events: Arc::new(EventManager::new()),
        });

        let worker_inner = Arc::clone(&inner);
        let scheduler = FlushScheduler::spawn(debounce, move || {
            if let Err(e) = worker_inner.flush() {
                debug!("Scheduled flush did not complete: {e}");
            }
        })?;

        if added > 0 {
            scheduler.touch();
        }

        info!(
            "Loaded {loaded} settings from {} ({added} defaults added)",
            database_path.display()
        );

        Ok(Self {
            inner,
            scheduler,
            closed: AtomicBool::new(false),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &SettingsConfig {
        &self.inner.config
    }

    /// Get the event manager for registering change listeners and warning
    /// reporters
    ///
    /// Warning reporters may run while the I/O lock is held; they must not
    /// call [`flush`](Self::flush), backup or restore themselves.
    ///
    /// # Example
    ///
    /// ```
    /// # let temp = tempfile::tempdir().unwrap();
    /// # let manager = settingsdb::SettingsManager::builder("test")
    /// #     .config_dir(temp.path())
    /// #     .build()
    /// #     .unwrap();
    /// manager.events().watch("Names", |key, _old, new| {
    ///     println!("{key} changed to {new:?}");
    /// });
    ///
    /// manager.events().on_warning(|message| eprintln!("{message}"));
    /// ```
    pub fn events(&self) -> &Arc<EventManager> {
        &self.inner.events
    }

    /// Number of flushes started by the debounce timer
    pub fn scheduled_flush_count(&self) -> u64 {
        self.scheduler.fire_count()
    }

    /// Whether [`shutdown`](Self::shutdown) has run
    pub fn is_shut_down(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Stop the flush worker, write pending changes and close the database.
    ///
    /// Reads keep working afterwards; further writes stay in memory only.
    /// Calling this more than once is harmless.
    ///
    /// # Errors
    ///
    /// Returns the final flush error, or the error closing the connection.
    pub fn shutdown(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        self.scheduler.shutdown();
        let flushed = self.inner.flush();

        let closed = match self.inner.storage.lock_recovered().take() {
            Some(storage) => storage.close(),
            None => Ok(()),
        };

        info!("Settings manager shut down");
        flushed?;
        closed
    }
}

impl SettingsManager {
    /// Create a builder for `SettingsManager` with a fluent API.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use settingsdb::SettingsManager;
    /// use std::time::Duration;
    ///
    /// let manager = SettingsManager::builder("my-app")
    ///     .config_dir("~/.config/my-app")
    ///     .debounce(Duration::from_millis(500))
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder(app_name: impl Into<String>) -> crate::manager::SettingsManagerBuilder {
        crate::manager::SettingsManagerBuilder::new(app_name)
    }

    /// Open the database at `database_path` with default settings.
    ///
    /// The backup and temporary files sit next to it as `<name>.bak` and
    /// `<name>.tmp`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or read.
    pub fn init(database_path: impl AsRef<Path>) -> Result<Self> {
        Self::new(SettingsConfig::for_database(database_path))
    }
}

impl<S: StorageBackend> Drop for SettingsManager<S> {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("Failed to shut down settings manager cleanly: {e}");
        }
    }
}
