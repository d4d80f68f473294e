// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for qrlogic crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`clock`] - Manually driven clock for debounce and `timeOfDay` tests
//! - [`config`] - In-memory settings store fake for testing without filesystem
//! - [`documents`] - Document builder and canonical fixtures
//! - [`frames`] - Encoding, shuffling and corrupting chunk frames
//! - [`sink`] - Action sink that records every event

pub mod clock;
pub mod config;
pub mod documents;
pub mod frames;
pub mod sink;

pub use clock::ManualClock;
pub use config::InMemorySettingsStore;
pub use documents::{greenhouse_document, hot_log_document, DocumentBuilder, HOT_LOG_JSON};
pub use frames::{corrupt_frame, encode_frames, permuted};
pub use sink::RecordingSink;
