//! Builder for SettingsManager
//!
//! This module contains [`SettingsManagerBuilder`] which provides a fluent API
//! for creating a [`SettingsManager`](super::SettingsManager).

use crate::config::SettingsConfigBuilder;
use crate::defaults::Defaults;
use crate::error::Result;
use crate::storage::{SqliteStorage, StorageBackend};
use std::path::PathBuf;
use std::time::Duration;

use super::SettingsManager;

/// Builder for creating a [`SettingsManager`] with a fluent API.
///
/// # Example
///
/// ```rust,no_run
/// use settingsdb::SettingsManager;
///
/// let manager = SettingsManager::builder("my-app")
///     .config_dir("~/.config/my-app")
///     .database_file("Database.db")
///     .auto_backup(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SettingsManagerBuilder {
    config_builder: SettingsConfigBuilder,
}

impl SettingsManagerBuilder {
    /// Create a new builder with the required app name.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            config_builder: SettingsConfigBuilder::new(app_name),
        }
    }

    /// Set the configuration directory.
    ///
    /// Supports `~` expansion for home directory.
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_builder = self.config_builder.config_dir(path);
        self
    }

    /// Set the database filename (default: "settings.db").
    pub fn database_file(mut self, filename: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.database_file(filename);
        self
    }

    /// Set the backup filename (default: "settings.db.bak").
    pub fn backup_file(mut self, filename: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.backup_file(filename);
        self
    }

    /// Set the temporary filename (default: "settings.db.tmp").
    pub fn temp_file(mut self, filename: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.temp_file(filename);
        self
    }

    /// Set the quiescence window before a flush (default: 1 second).
    pub fn debounce(mut self, window: Duration) -> Self {
        self.config_builder = self.config_builder.debounce(window);
        self
    }

    /// Take a backup after every successful flush.
    pub fn auto_backup(mut self, enabled: bool) -> Self {
        self.config_builder = self.config_builder.auto_backup(enabled);
        self
    }

    /// Replace the built-in defaults.
    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.config_builder = self.config_builder.with_defaults(defaults);
        self
    }

    /// Start without any defaults.
    pub fn without_defaults(mut self) -> Self {
        self.config_builder = self.config_builder.without_defaults();
        self
    }

    /// Build a [`SettingsManager`] backed by SQLite.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or read.
    pub fn build(self) -> Result<SettingsManager<SqliteStorage>> {
        self.build_with()
    }

    /// Build a [`SettingsManager`] over a custom storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be opened or read.
    pub fn build_with<S: StorageBackend>(self) -> Result<SettingsManager<S>> {
        SettingsManager::new(self.config_builder.build())
    }
}
