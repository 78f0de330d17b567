//! Storage backend trait and the SQLite implementation
//!
//! Durable layout is a single table:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS Settings(key TEXT, value TEXT)
//! ```
//!
//! One row per key, the lines joined by `\n`. An empty list is stored as
//! `NULL`. The table has no primary key; key uniqueness is maintained by the
//! writer.

use crate::error::{Error, Result};
use crate::security;
use crate::store::FlushBatch;
use crate::value::{join_lines, split_lines};

use log::debug;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};

/// Rows as read from durable storage, in table order
pub type Rows = Vec<(String, Vec<String>)>;

/// Trait for durable storage implementations
///
/// The manager owns one open backend at a time and serializes every call
/// through its I/O lock, so implementations need no internal locking.
pub trait StorageBackend: Send + Sized + 'static {
    /// Open (creating if needed) the database at `path`
    fn open(path: &Path) -> Result<Self>;

    /// Check that `path` holds a readable database without modifying it
    fn verify(path: &Path) -> Result<()>;

    /// Read every row
    fn load_all(&self) -> Result<Rows>;

    /// Apply a batch atomically: either every row is written or none is
    fn commit(&mut self, batch: &FlushBatch) -> Result<()>;

    /// Release the underlying connection so the file can be replaced
    fn close(self) -> Result<()>;
}

// =============================================================================
// SQLite Storage Implementation
// =============================================================================

/// SQLite storage backend (default)
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStorage {
    /// Path of the open database file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for SqliteStorage {
    fn open(path: &Path) -> Result<Self> {
        security::ensure_parent_dir(path)?;

        let conn = Connection::open(path)?;

        // Rollback journal keeps the committed state inside the one file we
        // copy for backups
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "DELETE", |row| row.get(0))?;
        debug!("Settings database journal mode: {mode}");
        conn.pragma_update(None, "synchronous", "FULL")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS Settings(key TEXT, value TEXT)",
            [],
        )?;

        security::set_secure_file_permissions(path)?;

        debug!("Opened settings database at {}", path.display());
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    fn verify(path: &Path) -> Result<()> {
        let invalid = |reason: String| Error::InvalidBackup {
            path: path.to_path_buf(),
            reason,
        };

        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| invalid(e.to_string()))?;

        // SQLite opens lazily; reading the schema forces the header check
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(|e| invalid(e.to_string()))?;

        Ok(())
    }

    fn load_all(&self) -> Result<Rows> {
        let mut stmt = self.conn.prepare("SELECT key, value FROM Settings")?;
        let rows = stmt.query_map([], |row| {
            let key = value_to_text(row.get_ref(0)?);
            let value = value_to_text(row.get_ref(1)?);
            Ok((key, value))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (key, value) = row?;
            // Rows without a key cannot be addressed
            let Some(key) = key else { continue };
            out.push((key, split_lines(value.as_deref())));
        }
        Ok(out)
    }

    fn commit(&mut self, batch: &FlushBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        // Dropping the transaction without commit rolls it back
        let tx = self.conn.transaction()?;
        {
            let mut update = tx.prepare("UPDATE Settings SET value = ?2 WHERE key = ?1")?;
            let mut insert = tx.prepare("INSERT INTO Settings(key, value) VALUES (?1, ?2)")?;
            let mut delete = tx.prepare("DELETE FROM Settings WHERE key = ?1")?;

            for (key, lines) in &batch.upserts {
                let value = join_lines(lines);
                if update.execute(params![key, value])? == 0 {
                    insert.execute(params![key, value])?;
                }
            }
            for key in &batch.deletes {
                delete.execute(params![key])?;
            }
            for (key, lines) in &batch.inserts {
                insert.execute(params![key, join_lines(lines)])?;
            }
        }
        tx.commit()?;

        debug!(
            "Committed {} settings rows to {}",
            batch.len(),
            self.path.display()
        );
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::Database(e))
    }
}

fn value_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
