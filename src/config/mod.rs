//! Configuration types
//!
//! - `SettingsConfig` - paths, debounce window, backup policy and defaults
//! - `SettingsConfigBuilder` - fluent construction with `~` expansion

mod types;

pub use types::{
    DEFAULT_BACKUP_FILE, DEFAULT_DATABASE_FILE, DEFAULT_TEMP_FILE, SettingsConfig,
    SettingsConfigBuilder,
};
