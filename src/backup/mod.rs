//! Snapshot backup and crash-tolerant restore of the settings database

mod operations;
mod restore;
mod types;

pub use operations::calculate_file_hash;
pub(crate) use restore::recover_interrupted_restore;
pub use types::{BackupInfo, RestoreResult};
