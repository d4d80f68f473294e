// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Settings service and storage port.

use crate::settings::Settings;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Key under which [`Settings`] are stored.
pub const SETTINGS_KEY: &str = "settings";

/// Storage port for raw settings blobs (keyed by logical name).
pub trait SettingsStore {
    /// Load a raw blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, SettingsError>;
    /// Persist a raw blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), SettingsError>;
}

/// Error type for settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A value is out of its allowed range.
    #[error("invalid setting {field}: {reason}")]
    Invalid {
        /// Dotted setting name, e.g. `transport.chunk_budget`.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Serializes values as JSON and delegates storage to a [`SettingsStore`].
pub struct SettingsService<S> {
    store: S,
}

impl<S> SettingsService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the inner store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> SettingsService<S>
where
    S: SettingsStore,
{
    /// Load and deserialize the value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, SettingsError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let value = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Err(SettingsError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize and persist the value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), SettingsError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }

    /// Stored settings, or the defaults when none were saved. Values that
    /// fail validation are an error rather than silently replaced.
    pub fn load_settings(&self) -> Result<Settings, SettingsError> {
        let settings = self.load::<Settings>(SETTINGS_KEY)?.unwrap_or_default();
        settings.validate()?;
        Ok(settings)
    }

    /// Validate and persist settings.
    pub fn save_settings(&self, settings: &Settings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.save(SETTINGS_KEY, settings)
    }
}
