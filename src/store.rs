//! In-memory settings map with the change sets consumed by each flush
//!
//! The store never performs I/O. The manager wraps it in a mutex and hands
//! the [`FlushBatch`] produced by [`MemoryStore::take_changes`] to the
//! storage backend.

use std::collections::{HashMap, HashSet};

/// Rows to write in one flush transaction
///
/// Built from the `updated` and `inserted` change sets with the values
/// captured at snapshot time, so the store lock is not held during I/O.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushBatch {
    /// Keys that may already have a row: update it, insert when missing
    pub upserts: Vec<(String, Vec<String>)>,
    /// Keys whose row must be removed
    pub deletes: Vec<String>,
    /// Keys new to this flush cycle
    pub inserts: Vec<(String, Vec<String>)>,
}

impl FlushBatch {
    /// Whether the batch writes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty() && self.inserts.is_empty()
    }

    /// Number of rows touched by the batch
    #[must_use]
    pub fn len(&self) -> usize {
        self.upserts.len() + self.deletes.len() + self.inserts.len()
    }
}

/// Key to lines mapping plus pending change tracking
///
/// Invariants:
/// - a key is in at most one of `updated` and `inserted`;
/// - every key in `inserted` is present in `values`;
/// - a key in `updated` but absent from `values` is a pending delete.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, Vec<String>>,
    updated: HashSet<String>,
    inserted: HashSet<String>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole mapping with rows read from durable storage.
    ///
    /// Both change sets are cleared. When several rows share a key the first
    /// one wins.
    pub fn load<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        self.values.clear();
        self.updated.clear();
        self.inserted.clear();
        for (key, lines) in rows {
            self.values.entry(key).or_insert(lines);
        }
    }

    /// Set a value, returning the previous one
    pub fn set(&mut self, key: &str, lines: Vec<String>) -> Option<Vec<String>> {
        let previous = self.values.insert(key.to_string(), lines);
        if previous.is_none() {
            // A pending delete turns into an upsert of the new value
            if !self.updated.contains(key) {
                self.inserted.insert(key.to_string());
            }
        } else if !self.inserted.contains(key) {
            self.updated.insert(key.to_string());
        }
        previous
    }

    /// Remove a key, returning its value when it was present
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        let previous = self.values.remove(key)?;
        if !self.inserted.remove(key) {
            self.updated.insert(key.to_string());
        }
        Some(previous)
    }

    /// Remove every key; keys with durable rows become pending deletes
    pub fn clear(&mut self) -> Vec<(String, Vec<String>)> {
        let removed: Vec<(String, Vec<String>)> = self.values.drain().collect();
        for (key, _) in &removed {
            if !self.inserted.remove(key) {
                self.updated.insert(key.clone());
            }
        }
        removed
    }

    /// Current value of a key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Whether the key is present
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// All keys, sorted
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether any change is waiting for a flush
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        !self.updated.is_empty() || !self.inserted.is_empty()
    }

    /// Snapshot and clear both change sets.
    ///
    /// Values are captured now; later mutations land in fresh change sets and
    /// are committed by the next flush.
    pub fn take_changes(&mut self) -> FlushBatch {
        let mut batch = FlushBatch::default();

        for key in std::mem::take(&mut self.updated) {
            match self.values.get(&key) {
                Some(lines) => batch.upserts.push((key, lines.clone())),
                None => batch.deletes.push(key),
            }
        }
        for key in std::mem::take(&mut self.inserted) {
            if let Some(lines) = self.values.get(&key) {
                batch.inserts.push((key, lines.clone()));
            }
        }

        batch.upserts.sort();
        batch.deletes.sort();
        batch.inserts.sort();
        batch
    }
}
