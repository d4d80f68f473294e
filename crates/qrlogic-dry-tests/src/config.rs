// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory settings store fake for testing without filesystem I/O.

use qrlogic_app_core::{Settings, SettingsError, SettingsStore, SETTINGS_KEY};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory implementation of [`SettingsStore`] for testing.
///
/// Clones share one backing map, so a test can hand a clone to a
/// [`SettingsService`](qrlogic_app_core::SettingsService) and inspect what
/// was written through the original. Loads and saves are counted, and
/// either can be made to fail on demand.
///
/// # Example
///
/// ```
/// use qrlogic_app_core::{Settings, SettingsService};
/// use qrlogic_dry_tests::InMemorySettingsStore;
///
/// let store = InMemorySettingsStore::new();
/// let service = SettingsService::new(store.clone());
///
/// service.save_settings(&Settings::default()).unwrap();
/// assert_eq!(store.save_count(), 1);
/// assert_eq!(service.load_settings().unwrap(), Settings::default());
/// ```
#[derive(Clone, Default)]
pub struct InMemorySettingsStore {
    inner: Arc<Mutex<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    data: HashMap<String, Vec<u8>>,
    load_count: usize,
    save_count: usize,
    fail_on_load: bool,
    fail_on_save: bool,
}

impl InMemorySettingsStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `settings` under [`SETTINGS_KEY`].
    /// Counters start at zero.
    pub fn with_settings(settings: &Settings) -> Self {
        let store = Self::new();
        let json = serde_json::to_vec_pretty(settings).unwrap_or_default();
        store.state().data.insert(SETTINGS_KEY.to_owned(), json);
        store
    }

    /// Store pre-populated with a raw blob, e.g. deliberately broken JSON.
    pub fn with_raw(key: &str, data: &[u8]) -> Self {
        let store = Self::new();
        store.state().data.insert(key.to_owned(), data.to_vec());
        store
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every subsequent load fail (or stop failing).
    pub fn set_fail_on_load(&self, fail: bool) {
        self.state().fail_on_load = fail;
    }

    /// Make every subsequent save fail (or stop failing).
    pub fn set_fail_on_save(&self, fail: bool) {
        self.state().fail_on_save = fail;
    }

    /// `load_raw` attempts so far, failed ones included.
    pub fn load_count(&self) -> usize {
        self.state().load_count
    }

    /// `save_raw` attempts so far, failed ones included.
    pub fn save_count(&self) -> usize {
        self.state().save_count
    }

    /// Raw blob stored under `key`.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.state().data.get(key).cloned()
    }

    /// Check if a key exists in the store.
    pub fn contains_key(&self, key: &str) -> bool {
        self.state().data.contains_key(key)
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, SettingsError> {
        let mut state = self.state();
        state.load_count += 1;
        if state.fail_on_load {
            return Err(SettingsError::Other("simulated load failure".into()));
        }
        state.data.get(key).cloned().ok_or(SettingsError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), SettingsError> {
        let mut state = self.state();
        state.save_count += 1;
        if state.fail_on_save {
            return Err(SettingsError::Other("simulated save failure".into()));
        }
        state.data.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}
