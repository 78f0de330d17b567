//! Backup/restore types

use std::path::PathBuf;
use time::OffsetDateTime;

/// Metadata of a snapshot backup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    /// Where the backup was written
    pub path: PathBuf,

    /// Size of the backup file in bytes
    pub size: u64,

    /// SHA-256 of the backup file (lowercase hex)
    pub sha256: String,

    /// When the backup was created
    pub created_at: OffsetDateTime,
}

impl BackupInfo {
    /// Creation time in RFC 3339 format
    #[must_use]
    pub fn created_at_rfc3339(&self) -> String {
        self.created_at
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| self.created_at.to_string())
    }
}

/// Result of a restore operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreResult {
    /// Number of settings loaded from the backup
    pub keys_restored: usize,

    /// The host should restart so every component rereads its settings
    pub restart_requested: bool,
}

impl RestoreResult {
    /// Check if anything was restored
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.keys_restored > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_rfc3339_timestamp() {
        let info = BackupInfo {
            path: PathBuf::from("settings.db.bak"),
            size: 4096,
            sha256: "00".repeat(32),
            created_at: datetime!(2024-05-01 12:30:00 UTC),
        };
        assert_eq!(info.created_at_rfc3339(), "2024-05-01T12:30:00Z");
    }

    #[test]
    fn test_restore_result_default() {
        let result = RestoreResult::default();
        assert!(!result.has_changes());
        assert!(!result.restart_requested);
    }
}
