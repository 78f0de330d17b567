//! Error types for settingsdb

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for settingsdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for settingsdb
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Database Errors
    // -------------------------------------------------------------------------
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Settings store is closed")]
    Closed,

    #[error("Failed to start flush scheduler: {0}")]
    SchedulerSpawn(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy '{from}' to '{to}': {source}")]
    FileCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move '{from}' to '{to}': {source}")]
    FileRename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete file '{path}': {source}")]
    FileDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to set permissions on '{path}': {source}")]
    Permissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Backup Errors
    // -------------------------------------------------------------------------
    #[error("no backup file found")]
    BackupNotFound(PathBuf),

    #[error("Invalid backup '{path}': {reason}")]
    InvalidBackup { path: PathBuf, reason: String },

    #[error("Backup checksum mismatch: expected {expected}, found {found}")]
    BackupMismatch { expected: String, found: String },

    #[error("{source}")]
    RestoreFailed {
        #[source]
        source: Box<Error>,
        /// Set when moving the safety copy back over the live database failed too
        rollback: Option<Box<Error>>,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    /// Invalid configuration; also available to custom storage backends
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::BackupNotFound(_) => true,
            Error::FileRead { source, .. }
            | Error::FileCopy { source, .. }
            | Error::FileRename { source, .. }
            | Error::FileDelete { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Check if this is a backup-related error
    #[must_use]
    pub fn is_backup_error(&self) -> bool {
        matches!(
            self,
            Error::BackupNotFound(_)
                | Error::InvalidBackup { .. }
                | Error::BackupMismatch { .. }
                | Error::RestoreFailed { .. }
        )
    }

    /// Whether a failed restore also failed to put the previous database back.
    ///
    /// When this returns `true` the live database path may be missing and the
    /// user has to intervene manually.
    #[must_use]
    pub fn needs_manual_recovery(&self) -> bool {
        matches!(self, Error::RestoreFailed { rollback: Some(_), .. })
    }
}

// =============================================================================
// Filesystem Helper Functions
// =============================================================================
// These reduce repetitive map_err patterns in the backup module.

/// Copy a file with proper error handling
pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    std::fs::copy(from, to).map_err(|e| Error::FileCopy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })
}

/// Rename a file with proper error handling
pub fn rename_file(from: &Path, to: &Path) -> Result<()> {
    std::fs::rename(from, to).map_err(|e| Error::FileRename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })
}

/// Delete a file, treating an already-missing file as success
pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::FileDelete {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
