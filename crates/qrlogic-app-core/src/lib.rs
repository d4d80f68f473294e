// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for qrlogic tools: the settings storage
//! port and the typed settings that configure the transport and engine.
//! Keeps binaries and storage adapters thin.

pub mod config;
pub mod settings;

pub use config::{SettingsError, SettingsService, SettingsStore, SETTINGS_KEY};
pub use settings::{EngineSettings, Settings, TransportSettings};
