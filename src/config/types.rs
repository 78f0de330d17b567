//! Core configuration types for settingsdb

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::defaults::{self, Defaults};
use crate::error::{Error, Result};
use crate::scheduler::DEFAULT_DEBOUNCE;

/// Default database filename
pub const DEFAULT_DATABASE_FILE: &str = "settings.db";

/// Default backup filename
pub const DEFAULT_BACKUP_FILE: &str = "settings.db.bak";

/// Default temporary filename used during backup and restore
pub const DEFAULT_TEMP_FILE: &str = "settings.db.tmp";

/// Configuration for initializing the SettingsManager
#[derive(Debug, Clone)]
pub struct SettingsConfig {
    /// Directory holding the database, backup and temporary files
    pub config_dir: PathBuf,

    /// Filename of the live database
    pub database_file: String,

    /// Filename of the backup copy
    pub backup_file: String,

    /// Filename of the temporary copy used while swapping files
    pub temp_file: String,

    /// Application name (used for the default config directory)
    pub app_name: String,

    /// Quiescence window before pending changes are flushed
    pub debounce: Duration,

    /// Take a backup after every successful flush
    pub auto_backup: bool,

    /// Defaults applied to missing keys at startup and by `reset_to_default`
    pub defaults: Defaults,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("."),
            database_file: DEFAULT_DATABASE_FILE.into(),
            backup_file: DEFAULT_BACKUP_FILE.into(),
            temp_file: DEFAULT_TEMP_FILE.into(),
            app_name: "app".into(),
            debounce: DEFAULT_DEBOUNCE,
            auto_backup: false,
            defaults: defaults::builtin(),
        }
    }
}

impl SettingsConfig {
    /// Create a new builder for SettingsConfig
    ///
    /// # Example
    /// ```rust
    /// use settingsdb::SettingsConfig;
    ///
    /// let config = SettingsConfig::builder("my-app")
    ///     .config_dir("~/.config/my-app")
    ///     .build();
    /// ```
    pub fn builder(app_name: impl Into<String>) -> SettingsConfigBuilder {
        SettingsConfigBuilder::new(app_name)
    }

    /// Configuration keeping every file next to `database_path`
    ///
    /// The backup and temporary files use the database filename with `.bak`
    /// and `.tmp` appended.
    pub fn for_database(database_path: impl AsRef<Path>) -> Self {
        let path = expand_home(database_path.as_ref().to_path_buf());
        let config_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let database_file = path
            .file_name()
            .map_or_else(|| DEFAULT_DATABASE_FILE.to_string(), |n| n.to_string_lossy().into_owned());

        Self {
            config_dir,
            backup_file: format!("{database_file}.bak"),
            temp_file: format!("{database_file}.tmp"),
            database_file,
            ..Self::default()
        }
    }

    /// Full path to the live database
    pub fn database_path(&self) -> PathBuf {
        self.config_dir.join(&self.database_file)
    }

    /// Full path to the backup file
    pub fn backup_path(&self) -> PathBuf {
        self.config_dir.join(&self.backup_file)
    }

    /// Full path to the temporary file
    pub fn temp_path(&self) -> PathBuf {
        self.config_dir.join(&self.temp_file)
    }

    /// Check that the database, backup and temporary files are distinct.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the clashing files.
    pub fn validate(&self) -> Result<()> {
        let database = self.database_path();
        let backup = self.backup_path();
        let temp = self.temp_path();
        let clash = if database == backup {
            Some(("database", "backup", &database))
        } else if database == temp {
            Some(("database", "temporary", &database))
        } else if backup == temp {
            Some(("backup", "temporary", &backup))
        } else {
            None
        };
        match clash {
            Some((a, b, shared)) => Err(Error::Config(format!(
                "{a} and {b} files must differ, both are '{}'",
                shared.display()
            ))),
            None => Ok(()),
        }
    }
}

/// Builder for creating SettingsConfig with a fluent API
#[derive(Debug, Clone)]
pub struct SettingsConfigBuilder {
    config_dir: Option<PathBuf>,
    database_file: String,
    backup_file: String,
    temp_file: String,
    app_name: String,
    debounce: Duration,
    auto_backup: bool,
    defaults: Defaults,
}

impl SettingsConfigBuilder {
    /// Create a new builder with the required app name
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            config_dir: None,
            database_file: DEFAULT_DATABASE_FILE.into(),
            backup_file: DEFAULT_BACKUP_FILE.into(),
            temp_file: DEFAULT_TEMP_FILE.into(),
            app_name: app_name.into(),
            debounce: DEFAULT_DEBOUNCE,
            auto_backup: false,
            defaults: defaults::builtin(),
        }
    }

    /// Set the configuration directory
    ///
    /// Supports `~` expansion for home directory.
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(expand_home(path.into()));
        self
    }

    /// Set the database filename (default: "settings.db")
    pub fn database_file(mut self, filename: impl Into<String>) -> Self {
        self.database_file = filename.into();
        self
    }

    /// Set the backup filename (default: "settings.db.bak")
    pub fn backup_file(mut self, filename: impl Into<String>) -> Self {
        self.backup_file = filename.into();
        self
    }

    /// Set the temporary filename (default: "settings.db.tmp")
    pub fn temp_file(mut self, filename: impl Into<String>) -> Self {
        self.temp_file = filename.into();
        self
    }

    /// Set the quiescence window before a flush (default: 1 second)
    pub fn debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    /// Take a backup after every successful flush
    pub fn auto_backup(mut self, enabled: bool) -> Self {
        self.auto_backup = enabled;
        self
    }

    /// Replace the built-in defaults
    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Start with an empty store instead of the built-in defaults
    pub fn without_defaults(mut self) -> Self {
        self.defaults = Vec::new();
        self
    }

    /// Build the SettingsConfig
    ///
    /// If `config_dir` is not set, uses the system config directory for the app.
    pub fn build(self) -> SettingsConfig {
        let config_dir = self.config_dir.unwrap_or_else(|| {
            // Use system config dir if available, otherwise current dir
            dirs::config_dir()
                .map(|d| d.join(&self.app_name))
                .unwrap_or_else(|| PathBuf::from("."))
        });

        SettingsConfig {
            config_dir,
            database_file: self.database_file,
            backup_file: self.backup_file,
            temp_file: self.temp_file,
            app_name: self.app_name,
            debounce: self.debounce,
            auto_backup: self.auto_backup,
            defaults: self.defaults,
        }
    }
}

fn expand_home(path: PathBuf) -> PathBuf {
    if !path.starts_with("~") {
        return path;
    }
    match dirs::home_dir() {
        Some(home) => home.join(path.strip_prefix("~").unwrap_or(&path)),
        None => path,
    }
}
