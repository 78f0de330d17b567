//! Event system for settings changes and operator warnings
//!
//! Change listeners see every effective mutation of the in-memory store.
//! They run on the mutating thread after the store lock is released, so they
//! may read and write settings. Each notification carries the `(old, new)`
//! pair its own mutation applied; when several threads write the same key
//! at once, notifications for that key can arrive in a different order than
//! the store applied them. Listeners that need the current value should read
//! it back instead of relying on the last `new` seen.
//! Warning reporters receive the messages an operator should see: failed
//! flushes, failed backups and failed restores. Every warning is also logged.

use crate::sync::RwLockExt;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

/// Type alias for a change callback
///
/// Receives (`key`, `old_value`, `new_value`); `None` means absent.
pub type ChangeCallback = Arc<dyn Fn(&str, Option<&[String]>, Option<&[String]>) + Send + Sync>;

/// Type alias for a warning reporter
pub type WarningReporter = Arc<dyn Fn(&str) + Send + Sync>;

/// Manages change listeners and warning reporters
pub struct EventManager {
    /// Global listeners (called for all changes)
    global_listeners: RwLock<Vec<ChangeCallback>>,

    /// Per-key listeners (called only for specific setting changes)
    key_listeners: RwLock<HashMap<String, Vec<ChangeCallback>>>,

    /// Operator-facing warning sinks
    reporters: RwLock<Vec<WarningReporter>>,
}

impl EventManager {
    /// Create a new event manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_listeners: RwLock::new(Vec::new()),
            key_listeners: RwLock::new(HashMap::new()),
            reporters: RwLock::new(Vec::new()),
        }
    }

    /// Register a global change listener (called for all settings changes)
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&str, Option<&[String]>, Option<&[String]>) + Send + Sync + 'static,
    {
        self.global_listeners
            .write_recovered()
            .push(Arc::new(callback));
    }

    /// Register a listener for a specific setting key
    pub fn watch<F>(&self, key: &str, callback: F)
    where
        F: Fn(&str, Option<&[String]>, Option<&[String]>) + Send + Sync + 'static,
    {
        self.key_listeners
            .write_recovered()
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(callback));
    }

    /// Register a warning reporter
    ///
    /// Hosts typically forward these to a dialog or status bar.
    pub fn on_warning<F>(&self, reporter: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.reporters.write_recovered().push(Arc::new(reporter));
    }

    /// Notify all listeners about a change
    ///
    /// Listener lists are cloned before calling out, so a callback may
    /// register further listeners or read settings without deadlocking.
    pub fn notify(&self, key: &str, old_value: Option<&[String]>, new_value: Option<&[String]>) {
        if old_value == new_value {
            return;
        }

        let global: Vec<ChangeCallback> = self.global_listeners.read_recovered().clone();
        for callback in &global {
            callback(key, old_value, new_value);
        }

        let keyed: Vec<ChangeCallback> = self
            .key_listeners
            .read_recovered()
            .get(key)
            .cloned()
            .unwrap_or_default();
        for callback in &keyed {
            callback(key, old_value, new_value);
        }
    }

    /// Log a warning and pass it to every reporter
    pub fn warn(&self, message: &str) {
        log::warn!("{message}");
        let reporters: Vec<WarningReporter> = self.reporters.read_recovered().clone();
        for reporter in &reporters {
            reporter(message);
        }
    }

    /// Remove all listeners for a specific key
    pub fn unwatch(&self, key: &str) {
        self.key_listeners.write_recovered().remove(key);
    }

    /// Clear all listeners and reporters
    pub fn clear(&self) {
        self.global_listeners.write_recovered().clear();
        self.key_listeners.write_recovered().clear();
        self.reporters.write_recovered().clear();
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
