//! Restore logic
//!
//! The live database is only replaced after the backup has been verified and
//! a safety copy of the live file exists at the temporary path. Any failure
//! while swapping moves the safety copy back. The in-memory store is only
//! replaced once the backup has been loaded, so a failed restore keeps
//! pending changes for the next flush.

use super::types::RestoreResult;
use crate::config::SettingsConfig;
use crate::error::{copy_file, remove_file_if_exists, rename_file, Error, Result};
use crate::manager::core::Inner;
use crate::manager::SettingsManager;
use crate::storage::StorageBackend;
use crate::sync::MutexExt;

use log::{error, info, warn};
use std::path::Path;

impl<S: StorageBackend> Inner<S> {
    pub(crate) fn restore(&self) -> Result<RestoreResult> {
        let mut io = self.storage.lock_recovered();
        if io.is_none() {
            return Err(Error::Closed);
        }

        let database = self.config.database_path();
        let backup = self.config.backup_path();
        let temp = self.config.temp_path();

        if !backup.exists() {
            let e = Error::BackupNotFound(backup);
            self.events.warn(&format!("Failed to restore backup: {e}"));
            return Err(e);
        }

        if let Err(e) = S::verify(&backup) {
            self.events.warn(&format!("Failed to restore backup: {e}"));
            return Err(e);
        }

        if let Some(storage) = io.take() {
            if let Err(e) = storage.close() {
                warn!("Closing settings database before restore failed: {e}");
            }
        }

        if let Err(e) = remove_file_if_exists(&temp).and_then(|()| copy_file(&database, &temp)) {
            self.events.warn(&format!(
                "Failed to create a copy of the current settings file: {e}"
            ));
            if let Err(reopen) = reconnect(&mut io, &database) {
                error!("Reopening settings database after failed safety copy: {reopen}");
            }
            return Err(e);
        }

        match self.swap_in(&mut io, &database, &backup) {
            Ok(keys_restored) => {
                if let Err(e) = remove_file_if_exists(&temp) {
                    warn!("Could not remove safety copy {}: {e}", temp.display());
                }
                info!(
                    "Restored {keys_restored} settings from {}",
                    backup.display()
                );
                Ok(RestoreResult {
                    keys_restored,
                    restart_requested: true,
                })
            }
            Err(source) => {
                self.events.warn(&format!("Failed to restore backup: {source}"));
                let rollback = self.roll_back(&mut io, &database, &temp).err();
                if let Some(rollback) = &rollback {
                    error!(
                        "Restoring the previous settings file failed as well: {rollback}; \
                         manual recovery from {} is required",
                        temp.display()
                    );
                }
                Err(Error::RestoreFailed {
                    source: Box::new(source),
                    rollback: rollback.map(Box::new),
                })
            }
        }
    }

    /// Replace the live file with the backup and load it
    fn swap_in(&self, io: &mut Option<S>, database: &Path, backup: &Path) -> Result<usize> {
        remove_file_if_exists(database)?;
        copy_file(backup, database)?;
        self.reopen(io, database)
    }

    /// Move the safety copy back over the live path and reconnect.
    ///
    /// The store was never replaced, so it still matches the safety copy
    /// plus its pending changes.
    fn roll_back(&self, io: &mut Option<S>, database: &Path, temp: &Path) -> Result<()> {
        if let Some(storage) = io.take() {
            let _ = storage.close();
        }
        remove_file_if_exists(database)?;
        rename_file(temp, database)?;
        reconnect(io, database)
    }

    /// Open `database`, replace the in-memory store with its rows and
    /// discard pending changes
    fn reopen(&self, io: &mut Option<S>, database: &Path) -> Result<usize> {
        let storage = S::open(database)?;
        let rows = storage.load_all()?;
        let count = {
            let mut store = self.store.lock_recovered();
            store.load(rows);
            store.len()
        };
        *io = Some(storage);
        Ok(count)
    }
}

/// Open `database` without touching the in-memory store
fn reconnect<S: StorageBackend>(io: &mut Option<S>, database: &Path) -> Result<()> {
    *io = Some(S::open(database)?);
    Ok(())
}

impl<S: StorageBackend> SettingsManager<S> {
    /// Replace the live database with the backup.
    ///
    /// On success changes not yet flushed are discarded, the in-memory store
    /// mirrors the backup and the result asks the host to restart. On failure
    /// the store and its pending changes are left as they were.
    ///
    /// # Errors
    ///
    /// * `Error::BackupNotFound` - no backup file; nothing was changed
    /// * `Error::InvalidBackup` - the backup is not a readable database; nothing was changed
    /// * `Error::FileCopy` - the safety copy could not be made; nothing was changed
    /// * `Error::RestoreFailed` - swapping failed; see [`Error::needs_manual_recovery`]
    /// * `Error::Closed` - after [`shutdown`](Self::shutdown)
    pub fn restore_backup(&self) -> Result<RestoreResult> {
        self.inner.restore()
    }
}

/// Finish a restore that was interrupted by a crash.
///
/// A leftover temporary file next to an unreadable or missing live database
/// is the safety copy of a restore that never completed; it is moved back.
/// Otherwise the leftover is stale and removed.
pub(crate) fn recover_interrupted_restore<S: StorageBackend>(config: &SettingsConfig) -> Result<()> {
    let database = config.database_path();
    let temp = config.temp_path();
    if !temp.exists() {
        return Ok(());
    }

    let live_ok = database.exists() && S::verify(&database).is_ok();
    if live_ok {
        return remove_file_if_exists(&temp);
    }

    warn!(
        "Settings database {} is missing or unreadable; recovering it from {}",
        database.display(),
        temp.display()
    );
    remove_file_if_exists(&database)?;
    rename_file(&temp, &database)
}
