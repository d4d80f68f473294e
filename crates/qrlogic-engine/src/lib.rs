// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rule engine for logic documents.
//!
//! On every tick the engine evaluates each trigger of the loaded document
//! against a [`SensorSnapshot`], pairs true triggers with their actions,
//! and hands [`ActionEvent`]s to an [`ActionSink`]. Side effects belong to
//! the sink; the engine only decides what fires and when.

mod clock;
mod engine;
mod evaluate;
mod event_log;
mod sink;

pub use clock::{Clock, SystemClock, TimeOfDay};
pub use engine::{ActionEvent, RuleEngine, TickOutcome, DEFAULT_DEBOUNCE};
pub use evaluate::{compare, condition_holds, evaluate, SensorSnapshot};
pub use event_log::{EventLog, LogEntry, LogLevel, DEFAULT_LOG_CAPACITY};
pub use sink::{ActionSink, NullSink};
