// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use qrlogic_app_core::{Settings, SettingsError, SettingsService, SETTINGS_KEY};
use qrlogic_dry_tests::{hot_log_document, InMemorySettingsStore, ManualClock, RecordingSink};
use qrlogic_engine::{SensorSnapshot, TickOutcome};

#[test]
fn missing_settings_load_as_defaults() {
    let store = InMemorySettingsStore::new();
    let service = SettingsService::new(store.clone());
    assert_eq!(service.load_settings().unwrap(), Settings::default());
    assert_eq!(store.load_count(), 1);
    assert!(!store.contains_key(SETTINGS_KEY));
}

#[test]
fn saved_settings_come_back() {
    let store = InMemorySettingsStore::new();
    let service = SettingsService::new(store.clone());
    let mut settings = Settings::default();
    settings.transport.chunk_budget = 400;
    settings.engine.log_capacity = 10;
    service.save_settings(&settings).unwrap();

    let raw = String::from_utf8(store.raw(SETTINGS_KEY).unwrap()).unwrap();
    assert!(raw.contains("\"chunk_budget\": 400"));
    assert_eq!(service.load_settings().unwrap(), settings);
}

#[test]
fn invalid_settings_are_refused_both_ways() {
    let mut settings = Settings::default();
    settings.transport.min_chunk_size = 0;

    let store = InMemorySettingsStore::new();
    let service = SettingsService::new(store.clone());
    assert!(matches!(
        service.save_settings(&settings),
        Err(SettingsError::Invalid { field: "transport.min_chunk_size", .. })
    ));
    assert_eq!(store.save_count(), 0);

    let service = SettingsService::new(InMemorySettingsStore::with_settings(&settings));
    assert!(matches!(
        service.load_settings(),
        Err(SettingsError::Invalid { .. })
    ));
}

#[test]
fn broken_json_is_a_serde_error() {
    let service = SettingsService::new(InMemorySettingsStore::with_raw(SETTINGS_KEY, b"{nope"));
    assert!(matches!(service.load_settings(), Err(SettingsError::Serde(_))));
}

#[test]
fn empty_blob_counts_as_missing() {
    let service = SettingsService::new(InMemorySettingsStore::with_raw(SETTINGS_KEY, b""));
    assert_eq!(service.load_settings().unwrap(), Settings::default());
}

#[test]
fn store_failures_propagate() {
    let store = InMemorySettingsStore::new();
    store.set_fail_on_load(true);
    let service = SettingsService::new(store);
    assert!(matches!(service.load_settings(), Err(SettingsError::Other(_))));
}

#[test]
fn settings_configure_the_components() {
    let mut settings = Settings::default();
    settings.transport.chunk_budget = 50;
    settings.engine.debounce_ms = 0;

    let encoded = settings.encoder().encode(&hot_log_document()).unwrap();
    assert_eq!(encoded.len(), 3);

    let clock = ManualClock::default();
    let mut engine = settings.engine(clock);
    engine.load(hot_log_document());
    let hot = SensorSnapshot {
        temperature: 31.0,
        ..SensorSnapshot::default()
    };
    let mut sink = RecordingSink::new();
    for _ in 0..3 {
        assert!(matches!(engine.tick(&hot, &mut sink), TickOutcome::Fired { .. }));
    }
    assert_eq!(sink.len(), 3);
    assert_eq!(settings.decoder().state(), qrlogic_transport::DecoderState::Idle);
}
