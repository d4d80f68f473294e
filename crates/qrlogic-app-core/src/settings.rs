// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed settings for the transport and the rule engine.
//!
//! Every field has a default, and missing fields in a stored blob fall
//! back to it, so older settings files keep loading.

use crate::config::SettingsError;
use qrlogic_engine::{Clock, RuleEngine, DEFAULT_DEBOUNCE, DEFAULT_LOG_CAPACITY};
use qrlogic_transport::{
    ChunkDecoder, ChunkEncoder, DEFAULT_CHUNK_BUDGET, DEFAULT_MIN_CHUNK_SIZE,
    DEFAULT_SESSION_TIMEOUT,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// All persisted settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Encoder and decoder parameters.
    pub transport: TransportSettings,
    /// Rule engine parameters.
    pub engine: EngineSettings,
}

/// Transport parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSettings {
    /// Per-frame budget in bytes.
    pub chunk_budget: usize,
    /// Data floor per chunk when the budget cannot cover the framing.
    pub min_chunk_size: usize,
    /// Seconds a collecting session may go without a new chunk.
    pub session_timeout_secs: u64,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            chunk_budget: DEFAULT_CHUNK_BUDGET,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
            session_timeout_secs: DEFAULT_SESSION_TIMEOUT.as_secs(),
        }
    }
}

/// Rule engine parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Debounce window in milliseconds.
    pub debounce_ms: u64,
    /// Event log entries retained.
    pub log_capacity: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            debounce_ms: u64::try_from(DEFAULT_DEBOUNCE.as_millis()).unwrap_or(u64::MAX),
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl Settings {
    /// Reject values the transport or engine cannot work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |field, reason| Err(SettingsError::Invalid { field, reason });
        if self.transport.chunk_budget == 0 {
            return invalid("transport.chunk_budget", "must be greater than zero");
        }
        if self.transport.min_chunk_size == 0 {
            return invalid("transport.min_chunk_size", "must be greater than zero");
        }
        if self.transport.session_timeout_secs == 0 {
            return invalid("transport.session_timeout_secs", "must be greater than zero");
        }
        if self.engine.log_capacity == 0 {
            return invalid("engine.log_capacity", "must be greater than zero");
        }
        Ok(())
    }

    /// Encoder configured from these settings.
    pub fn encoder(&self) -> ChunkEncoder {
        ChunkEncoder::new(self.transport.chunk_budget)
            .with_min_chunk_size(self.transport.min_chunk_size)
    }

    /// Decoder configured from these settings.
    pub fn decoder(&self) -> ChunkDecoder {
        ChunkDecoder::new()
            .with_session_timeout(Duration::from_secs(self.transport.session_timeout_secs))
    }

    /// Rule engine configured from these settings.
    pub fn engine<C: Clock>(&self, clock: C) -> RuleEngine<C> {
        RuleEngine::new(clock)
            .with_debounce(Duration::from_millis(self.engine.debounce_ms))
            .with_log_capacity(self.engine.log_capacity)
    }
}
