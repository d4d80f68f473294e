// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Capacity-bounded, append-only log of human-readable engine events.

use std::collections::VecDeque;
use std::time::Instant;

/// Default number of entries retained.
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Entry severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Something happened (document loaded, action fired).
    Info,
    /// An action could not be dispatched.
    Warn,
}

/// One log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Severity.
    pub level: LogLevel,
    /// Human-readable text.
    pub message: String,
    /// When it was appended.
    pub at: Instant,
}

/// Keeps the most recent `capacity` entries; the oldest drop first.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl EventLog {
    /// Empty log holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when full.
    pub fn push(&mut self, level: LogLevel, message: impl Into<String>, at: Instant) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            level,
            message: message.into(),
            at,
        });
    }

    /// Append an `Info` entry.
    pub fn info(&mut self, message: impl Into<String>, at: Instant) {
        self.push(LogLevel::Info, message, at);
    }

    /// Append a `Warn` entry.
    pub fn warn(&mut self, message: impl Into<String>, at: Instant) {
        self.push(LogLevel::Warn, message, at);
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been logged (or everything was cleared).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn oldest_entries_drop_first() {
        let now = Instant::now();
        let mut log = EventLog::new(3);
        for i in 0..5 {
            log.info(format!("entry {i}"), now);
        }
        let messages: Vec<&str> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["entry 2", "entry 3", "entry 4"]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn zero_capacity_still_keeps_the_latest() {
        let now = Instant::now();
        let mut log = EventLog::new(0);
        log.info("a", now);
        log.warn("b", now);
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.len(), 1);
        let latest = log.latest().map(|e| (e.level, e.message.as_str()));
        assert_eq!(latest, Some((LogLevel::Warn, "b")));
    }

    #[test]
    fn default_capacity_and_clear() {
        let now = Instant::now();
        let mut log = EventLog::default();
        for _ in 0..(DEFAULT_LOG_CAPACITY + 10) {
            log.info("tick", now);
        }
        assert_eq!(log.len(), DEFAULT_LOG_CAPACITY);
        log.clear();
        assert!(log.is_empty());
        assert!(log.latest().is_none());
    }
}
