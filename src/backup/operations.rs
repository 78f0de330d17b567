//! Backup creation

use super::types::BackupInfo;
use crate::error::{copy_file, remove_file_if_exists, rename_file, Error, Result};
use crate::manager::core::Inner;
use crate::manager::SettingsManager;
use crate::security;
use crate::storage::StorageBackend;
use crate::sync::MutexExt;

use log::info;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use time::OffsetDateTime;

impl<S: StorageBackend> Inner<S> {
    /// Copy the live database over the backup file.
    ///
    /// The copy goes to the temporary path first and is renamed into place,
    /// so an interrupted backup never leaves a truncated backup file. The
    /// caller must hold the I/O lock.
    pub(crate) fn snapshot(&self) -> Result<BackupInfo> {
        let database = self.config.database_path();
        let backup = self.config.backup_path();
        let temp = self.config.temp_path();

        remove_file_if_exists(&temp)?;
        copy_file(&database, &temp)?;
        remove_file_if_exists(&backup)?;
        rename_file(&temp, &backup)?;
        security::set_secure_file_permissions(&backup)?;

        let (sha256, size) = calculate_file_hash(&backup)?;
        let (live, _) = calculate_file_hash(&database)?;
        if live != sha256 {
            return Err(Error::BackupMismatch {
                expected: live,
                found: sha256,
            });
        }

        info!("Backed up settings to {} ({size} bytes)", backup.display());
        Ok(BackupInfo {
            path: backup,
            size,
            sha256,
            created_at: OffsetDateTime::now_utc(),
        })
    }

    /// [`snapshot`](Self::snapshot), reporting failures as warnings
    pub(crate) fn snapshot_reported(&self) -> Result<BackupInfo> {
        self.snapshot()
            .inspect_err(|e| self.events.warn(&format!("Failed to create backup: {e}")))
    }
}

impl<S: StorageBackend> SettingsManager<S> {
    /// Copy the database file to the backup location.
    ///
    /// Only committed state is copied; call [`flush`](Self::flush) first to
    /// include pending changes.
    ///
    /// # Errors
    ///
    /// * `Error::FileCopy` / `Error::FileRename` / `Error::FileDelete` - if a file step fails
    /// * `Error::BackupMismatch` - if the backup does not match the live file
    pub fn create_backup(&self) -> Result<BackupInfo> {
        let _io = self.inner.storage.lock_recovered();
        self.inner.snapshot_reported()
    }

    /// Whether a backup file exists
    pub fn has_backup(&self) -> bool {
        self.inner.config.backup_path().exists()
    }
}

/// Calculate SHA-256 hash of a file
///
/// Returns the lowercase hex digest and the number of bytes read.
pub fn calculate_file_hash(path: &Path) -> Result<(String, u64)> {
    let mut file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    let mut total_size = 0u64;

    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        if bytes_read == 0 {
            break;
        }

        total_size += bytes_read as u64;
        hasher.update(&buffer[..bytes_read]);
    }

    let hash = format!("{:x}", hasher.finalize());
    Ok((hash, total_size))
}
