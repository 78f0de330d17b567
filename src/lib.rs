//! # settingsdb - debounced settings store on SQLite
//!
//! An in-memory key-value store of string lists, persisted to a single SQLite
//! file with crash-tolerant backup and restore.
//!
//! ## Features
//!
//! - **Non-blocking access**: reads and writes only touch memory
//! - **Debounced persistence**: bursts of writes become one transaction
//! - **Atomic commits**: every flush is a single SQLite transaction
//! - **Backup & Restore**: snapshot backups with SHA-256 verification, and a
//!   restore that rolls back to the previous file on failure
//! - **Typed accessors**: bool, integer, double and string views over the raw lines
//! - **Change events**: per-key and global listeners, plus warning reporters
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use settingsdb::SettingsManager;
//!
//! let manager = SettingsManager::init("/path/to/Database.db")?;
//!
//! manager.set("ScanSpeed", 75);
//! manager.set("AutoHotkeySettings", ["W::Up", "S::Down"]);
//!
//! assert_eq!(manager.get_setting_int("ScanSpeed"), 75);
//! assert_eq!(manager.get_setting("AutoHotkeySettings").len(), 2);
//! # Ok::<(), settingsdb::Error>(())
//! ```
//!
//! ## Values
//!
//! Every setting is an ordered list of lines. Scalars occupy one line;
//! booleans are stored as `"True"` / `"False"`. Typed getters never fail and
//! return sentinels for missing or malformed values:
//!
//! | Getter                 | Missing / malformed |
//! |------------------------|---------------------|
//! | `get_setting`          | empty list          |
//! | `get_setting_string`   | `None`              |
//! | `get_setting_bool`     | `false`             |
//! | `get_setting_int`      | `-1`                |
//! | `get_setting_double`   | `-1.0`              |
//!
//! ## Persistence
//!
//! Each mutation restarts a quiescence window (one second by default). When
//! it elapses the pending changes are committed in one transaction. A failed
//! commit is reported through [`EventManager::on_warning`] and not retried.
//! [`SettingsManager::flush`] commits immediately and
//! [`SettingsManager::shutdown`] (also run on drop) flushes one last time.
//!
//! ## Backup & Restore
//!
//! ```rust,no_run
//! use settingsdb::SettingsManager;
//!
//! # fn example() -> settingsdb::Result<()> {
//! let manager = SettingsManager::builder("my-app")
//!     .auto_backup(true) // snapshot after every successful flush
//!     .build()?;
//!
//! manager.flush()?;
//! let info = manager.create_backup()?;
//! println!("Backup {} ({} bytes, sha256 {})", info.path.display(), info.size, info.sha256);
//!
//! let restored = manager.restore_backup()?;
//! if restored.restart_requested {
//!     // Reload the application so every component rereads its settings
//! }
//! # Ok(())
//! # }
//! ```

// Core modules
mod error;
mod events;
mod manager;
mod scheduler;
mod store;
mod sync;

pub mod backup;
pub mod config;
pub mod defaults;
pub mod security;
pub mod storage;
pub mod value;

pub use backup::{BackupInfo, RestoreResult};
pub use config::{SettingsConfig, SettingsConfigBuilder};
pub use error::{Error, Result};
pub use events::EventManager;
pub use manager::{FlushReport, SettingsManager, SettingsManagerBuilder};
pub use scheduler::{FlushScheduler, DEFAULT_DEBOUNCE};
pub use storage::{Rows, SqliteStorage, StorageBackend};
pub use store::{FlushBatch, MemoryStore};
pub use value::{FromSetting, IntoSetting};
