//! Transactional writer: commits the pending change sets to storage

use crate::backup::BackupInfo;
use crate::defaults::AUTOMATIC_BACKUP_KEY;
use crate::error::{Error, Result};
use crate::manager::core::{Inner, SettingsManager};
use crate::storage::StorageBackend;
use crate::sync::MutexExt;
use crate::value::FromSetting;

use log::debug;

/// Outcome of one flush
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Rows updated in place (or inserted when no row matched)
    pub upserted: usize,
    /// Rows deleted
    pub deleted: usize,
    /// Rows inserted
    pub inserted: usize,
    /// Backup taken after the commit, when automatic backup is enabled
    pub backup: Option<BackupInfo>,
}

impl FlushReport {
    /// Whether the flush wrote nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upserted == 0 && self.deleted == 0 && self.inserted == 0
    }
}

impl<S: StorageBackend> Inner<S> {
    /// Snapshot the change sets and commit them in one transaction.
    ///
    /// A failed commit is rolled back and reported; its changes are not
    /// queued again.
    pub(crate) fn flush(&self) -> Result<FlushReport> {
        let mut io = self.storage.lock_recovered();
        let Some(storage) = io.as_mut() else {
            return Err(Error::Closed);
        };

        let batch = self.store.lock_recovered().take_changes();
        if batch.is_empty() {
            return Ok(FlushReport::default());
        }

        if let Err(e) = storage.commit(&batch) {
            self.events.warn(&format!("Failed to save settings: {e}"));
            return Err(e);
        }

        let mut report = FlushReport {
            upserted: batch.upserts.len(),
            deleted: batch.deletes.len(),
            inserted: batch.inserts.len(),
            backup: None,
        };
        debug!(
            "Flushed settings: {} upserted, {} deleted, {} inserted",
            report.upserted, report.deleted, report.inserted
        );

        if self.auto_backup_enabled() {
            // Still under the I/O lock, so no flush can land mid-copy
            report.backup = self.snapshot_reported().ok();
        }

        Ok(report)
    }

    /// Backups follow a flush when configured or when the host turned on the
    /// `AutomaticSettingsBackup` setting
    fn auto_backup_enabled(&self) -> bool {
        self.config.auto_backup
            || self
                .store
                .lock_recovered()
                .get(AUTOMATIC_BACKUP_KEY)
                .and_then(bool::from_lines)
                .unwrap_or(false)
    }
}

impl<S: StorageBackend> SettingsManager<S> {
    /// Commit pending changes now instead of waiting for the debounce timer.
    ///
    /// # Errors
    ///
    /// * `Error::Closed` - after [`shutdown`](Self::shutdown)
    /// * `Error::Database` - if the transaction failed; the changes are dropped
    pub fn flush(&self) -> Result<FlushReport> {
        self.inner.flush()
    }

    /// Whether any mutation is waiting for a flush
    pub fn has_pending_changes(&self) -> bool {
        self.inner.store.lock_recovered().has_pending_changes()
    }
}
