//! Security utilities for file permissions and access control
//!
//! The settings database, its backup and the temporary copies all live in a
//! directory only the owner can enter.

use crate::error::{Error, Result};
use std::path::Path;

/// Set restrictive permissions on a file (Unix: 0o600 - owner read/write only)
///
/// On Windows, this is a no-op as Windows uses ACLs differently.
///
/// # Errors
///
/// * `Error::FileRead` - If the file metadata cannot be read
/// * `Error::Permissions` - If the permissions cannot be changed
#[cfg(unix)]
pub fn set_secure_file_permissions(path: &Path) -> Result<()> {
    set_mode(path, 0o600)
}

/// Set restrictive permissions on a directory (Unix: 0o700 - owner rwx only)
///
/// On Windows, this is a no-op as Windows uses ACLs differently.
///
/// # Errors
///
/// * `Error::FileRead` - If the directory metadata cannot be read
/// * `Error::Permissions` - If the permissions cannot be changed
#[cfg(unix)]
pub fn set_secure_dir_permissions(path: &Path) -> Result<()> {
    set_mode(path, 0o700)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut perms = metadata.permissions();
    perms.set_mode(mode);

    fs::set_permissions(path, perms).map_err(|e| Error::Permissions {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Ensure the parent directory of `file` exists with secure permissions
///
/// Directories that already exist are left untouched, so pointing the
/// database at a shared location (e.g. a temp dir) does not change its mode.
///
/// # Errors
///
/// * `Error::DirectoryCreate` - If directory creation fails
/// * `Error::Permissions` - If permission setting fails
pub fn ensure_parent_dir(file: &Path) -> Result<()> {
    let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.exists() {
        return Ok(());
    }

    std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
        path: parent.to_path_buf(),
        source: e,
    })?;

    #[cfg(unix)]
    set_secure_dir_permissions(parent)?;

    Ok(())
}

/// No-op on Windows (permissions managed via ACLs)
#[cfg(not(unix))]
pub fn set_secure_file_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// No-op on Windows (permissions managed via ACLs)
#[cfg(not(unix))]
pub fn set_secure_dir_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
