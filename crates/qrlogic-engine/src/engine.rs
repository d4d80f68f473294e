// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Document-level firing: evaluate every trigger on a tick, pair true
//! triggers with their actions, debounce, dispatch.

use crate::clock::{Clock, SystemClock, TimeOfDay};
use crate::evaluate::{evaluate, SensorSnapshot};
use crate::event_log::{EventLog, DEFAULT_LOG_CAPACITY};
use crate::sink::ActionSink;
use qrlogic_doc::{Action, ActionKind, LogicDocument};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Default minimum interval between two firings of one document.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(2000);

/// An action the engine asks the outside world to perform.
///
/// Serializes as the action's own `{"type", "payload"}` shape plus the
/// document name and trigger index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEvent {
    /// The action, payload included.
    #[serde(flatten)]
    pub action: Action,
    /// Name of the document whose trigger fired.
    pub source_document_name: String,
    /// Index of the trigger that fired.
    pub trigger_index: usize,
}

impl ActionEvent {
    /// Action discriminant.
    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }
}

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No document is loaded.
    NoDocument,
    /// No trigger held.
    Quiet,
    /// Triggers held but the debounce window is still closed.
    Debounced,
    /// The window was open and at least one trigger held.
    Fired {
        /// Events handed to the sink, in trigger order.
        events: Vec<ActionEvent>,
        /// Actions skipped because their payload was unusable.
        warnings: Vec<String>,
    },
}

/// Evaluates one loaded document per tick and dispatches its actions.
///
/// Debounce is document-global: once anything fires, nothing in the same
/// document fires again until the window has elapsed, whichever trigger
/// holds in between.
#[derive(Debug)]
pub struct RuleEngine<C = SystemClock> {
    clock: C,
    document: Option<LogicDocument>,
    debounce: Duration,
    last_fired: Option<Instant>,
    log: EventLog,
}

impl Default for RuleEngine<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> RuleEngine<C> {
    /// Engine with no document, the default window and log capacity.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            document: None,
            debounce: DEFAULT_DEBOUNCE,
            last_fired: None,
            log: EventLog::new(DEFAULT_LOG_CAPACITY),
        }
    }

    /// Override the debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Override how many log entries are kept.
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log = EventLog::new(capacity);
        self
    }

    /// Debounce window.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// The loaded document, if any.
    pub fn document(&self) -> Option<&LogicDocument> {
        self.document.as_ref()
    }

    /// Human-readable event log.
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Install a document, replacing any previous one. The debounce window
    /// starts open.
    pub fn load(&mut self, document: LogicDocument) {
        info!(
            name = %document.name,
            triggers = document.triggers.len(),
            actions = document.actions.len(),
            "rule document loaded"
        );
        self.log
            .info(format!("loaded \"{}\"", document.name), self.clock.now());
        self.document = Some(document);
        self.last_fired = None;
    }

    /// Remove the loaded document.
    pub fn unload(&mut self) -> Option<LogicDocument> {
        let document = self.document.take()?;
        info!(name = %document.name, "rule document unloaded");
        self.log
            .info(format!("unloaded \"{}\"", document.name), self.clock.now());
        self.last_fired = None;
        Some(document)
    }

    /// Evaluate the loaded document against `snapshot` and dispatch whatever
    /// fires to `sink`.
    pub fn tick<S>(&mut self, snapshot: &SensorSnapshot, sink: &mut S) -> TickOutcome
    where
        S: ActionSink + ?Sized,
    {
        let Some(document) = self.document.as_ref() else {
            return TickOutcome::NoDocument;
        };
        let now = self.clock.now();
        let time_of_day = TimeOfDay::from_hour(self.clock.local_hour());

        let holding: Vec<usize> = document
            .triggers
            .iter()
            .enumerate()
            .filter(|(_, trigger)| evaluate(trigger, snapshot, time_of_day))
            .map(|(index, _)| index)
            .collect();
        if holding.is_empty() {
            return TickOutcome::Quiet;
        }
        if let Some(last) = self.last_fired {
            if now.saturating_duration_since(last) < self.debounce {
                trace!(name = %document.name, "debounced");
                return TickOutcome::Debounced;
            }
        }
        self.last_fired = Some(now);

        let mut events = Vec::with_capacity(holding.len());
        let mut warnings = Vec::new();
        for index in holding {
            let Some(action) = document.action_for(index) else {
                continue;
            };
            match describe(action) {
                Ok(summary) => {
                    let event = ActionEvent {
                        action: action.clone(),
                        source_document_name: document.name.clone(),
                        trigger_index: index,
                    };
                    debug!(
                        name = %document.name,
                        trigger = index,
                        kind = %event.kind(),
                        "action fired"
                    );
                    self.log
                        .info(format!("{}: {summary}", document.name), now);
                    sink.dispatch(&event);
                    events.push(event);
                }
                Err(problem) => {
                    let message = format!(
                        "{}: trigger {index} skipped {} action: {problem}",
                        document.name,
                        action.kind()
                    );
                    warn!(name = %document.name, trigger = index, %problem, "action skipped");
                    self.log.warn(message.clone(), now);
                    warnings.push(message);
                }
            }
        }
        TickOutcome::Fired { events, warnings }
    }
}

/// One-line summary of an action, or why it cannot be dispatched.
fn describe(action: &Action) -> Result<String, &'static str> {
    match action {
        Action::Log { message } => message
            .as_ref()
            .map(|m| format!("log \"{m}\""))
            .ok_or("missing message"),
        Action::Toggle { device, state } => match (device, state) {
            (Some(device), Some(state)) => {
                Ok(format!("turn {} {}", device.as_str(), state.as_str()))
            }
            (None, _) => Err("missing or unknown device"),
            (_, None) => Err("missing or unknown state"),
        },
        Action::FlashBackground {
            color,
            message,
            duration_ms,
        } => {
            let mut summary = format!("flash {}", color.as_deref().unwrap_or("default color"));
            if let Some(message) = message {
                summary.push_str(&format!(" \"{message}\""));
            }
            if let Some(ms) = duration_ms {
                summary.push_str(&format!(" for {ms} ms"));
            }
            Ok(summary)
        }
        Action::Vibrate { duration_ms } => Ok(match duration_ms {
            Some(ms) => format!("vibrate for {ms} ms"),
            None => "vibrate".to_owned(),
        }),
    }
}
