use crate::manager::core::SettingsManager;
use crate::storage::StorageBackend;
use crate::sync::MutexExt;
use crate::value::{FromSetting, IntoSetting};

use log::info;

impl<S: StorageBackend> SettingsManager<S> {
    // =========================================================================
    // Writes
    // =========================================================================

    /// Store `lines` under `key`, replacing any previous value.
    ///
    /// Listeners are notified after the store lock is released; see
    /// [`EventManager`](crate::EventManager) for ordering across threads.
    pub fn set_setting(&self, key: &str, lines: Vec<String>) {
        let previous = {
            let mut store = self.inner.store.lock_recovered();
            store.set(key, lines.clone())
        };
        self.scheduler.touch();
        self.inner
            .events
            .notify(key, previous.as_deref(), Some(lines.as_slice()));
    }

    /// Store any supported value under `key`
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # let manager = settingsdb::SettingsManager::init("/tmp/settings.db").unwrap();
    /// manager.set("PopupDuration", 8);
    /// manager.set("LookMode", true);
    /// manager.set("Names", ["Mytherin", "Other"]);
    /// ```
    pub fn set<V: IntoSetting>(&self, key: &str, value: V) {
        self.set_setting(key, value.into_lines());
    }

    /// Store `value` only when `key` has no value yet.
    ///
    /// Returns `true` when the value was written.
    pub fn set_if_absent<V: IntoSetting>(&self, key: &str, value: V) -> bool {
        let lines = value.into_lines();
        {
            let mut store = self.inner.store.lock_recovered();
            if store.contains(key) {
                return false;
            }
            store.set(key, lines.clone());
        }
        self.scheduler.touch();
        self.inner.events.notify(key, None, Some(lines.as_slice()));
        true
    }

    /// Remove `key`, returning its previous value
    pub fn remove_setting(&self, key: &str) -> Option<Vec<String>> {
        let previous = self.inner.store.lock_recovered().remove(key)?;
        self.scheduler.touch();
        self.inner.events.notify(key, Some(previous.as_slice()), None);
        Some(previous)
    }

    /// Fill in every configured default whose key is missing.
    ///
    /// Returns the number of keys added.
    pub fn apply_defaults(&self) -> usize {
        let mut added = Vec::new();
        {
            let mut store = self.inner.store.lock_recovered();
            for (key, lines) in &self.inner.config.defaults {
                if !store.contains(key) {
                    store.set(key, lines.clone());
                    added.push((key, lines));
                }
            }
        }

        if !added.is_empty() {
            self.scheduler.touch();
        }
        for (key, lines) in &added {
            self.inner
                .events
                .notify(key.as_str(), None, Some(lines.as_slice()));
        }
        added.len()
    }

    /// Drop every setting and reapply the configured defaults.
    ///
    /// Keys outside the default set are deleted from the database by the
    /// next flush.
    pub fn reset_to_default(&self) {
        let (removed, applied) = {
            let mut store = self.inner.store.lock_recovered();
            let removed = store.clear();
            for (key, lines) in &self.inner.config.defaults {
                if !store.contains(key) {
                    store.set(key, lines.clone());
                }
            }
            (removed, store.len())
        };
        self.scheduler.touch();
        info!(
            "Reset settings to defaults ({} removed, {applied} defaults applied)",
            removed.len()
        );

        for (key, old) in &removed {
            let new = self
                .inner
                .config
                .defaults
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_slice());
            self.inner.events.notify(key, Some(old.as_slice()), new);
        }
        for (key, lines) in &self.inner.config.defaults {
            if !removed.iter().any(|(k, _)| k == key) {
                self.inner.events.notify(key, None, Some(lines.as_slice()));
            }
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lines stored under `key`; empty when absent
    pub fn get_setting(&self, key: &str) -> Vec<String> {
        self.inner
            .store
            .lock_recovered()
            .get(key)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    /// Parse the value stored under `key`; `None` when absent or malformed
    pub fn get<T: FromSetting>(&self, key: &str) -> Option<T> {
        let store = self.inner.store.lock_recovered();
        T::from_lines(store.get(key)?)
    }

    /// First line of `key`; `None` when absent or empty
    pub fn get_setting_string(&self, key: &str) -> Option<String> {
        self.get(key)
    }

    /// `key` as a boolean; `false` when absent or not `"True"`
    pub fn get_setting_bool(&self, key: &str) -> bool {
        self.get(key).unwrap_or(false)
    }

    /// `key` as an integer; `-1` when absent or malformed
    pub fn get_setting_int(&self, key: &str) -> i32 {
        self.get(key).unwrap_or(-1)
    }

    /// `key` as a double; `-1.0` when absent or malformed
    pub fn get_setting_double(&self, key: &str) -> f64 {
        self.get(key).unwrap_or(-1.0)
    }

    /// Whether `key` exists with at least one line
    pub fn exists_and_non_empty(&self, key: &str) -> bool {
        self.inner
            .store
            .lock_recovered()
            .get(key)
            .is_some_and(|lines| !lines.is_empty())
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<String> {
        self.inner.store.lock_recovered().keys()
    }

    /// Number of settings held in memory
    pub fn len(&self) -> usize {
        self.inner.store.lock_recovered().len()
    }

    /// Whether no settings are held
    pub fn is_empty(&self) -> bool {
        self.inner.store.lock_recovered().is_empty()
    }
}
