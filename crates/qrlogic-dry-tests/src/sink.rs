// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Action sink that records every event it receives.

use qrlogic_doc::ActionKind;
use qrlogic_engine::{ActionEvent, ActionSink};

/// Collects dispatched events in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Vec<ActionEvent>,
}

impl RecordingSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything dispatched so far.
    pub fn events(&self) -> &[ActionEvent] {
        &self.events
    }

    /// Kinds of the dispatched events, in order.
    pub fn kinds(&self) -> Vec<ActionKind> {
        self.events.iter().map(ActionEvent::kind).collect()
    }

    /// Number of events received.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing was dispatched.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Hand back the recorded events and start over.
    pub fn take(&mut self) -> Vec<ActionEvent> {
        std::mem::take(&mut self.events)
    }
}

impl ActionSink for RecordingSink {
    fn dispatch(&mut self, event: &ActionEvent) {
        self.events.push(event.clone());
    }
}
