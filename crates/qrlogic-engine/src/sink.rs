// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Outbound port for fired actions. The engine never performs side effects
//! itself; whatever renders feedback implements [`ActionSink`].

use crate::engine::ActionEvent;

/// Receives every action event the engine fires.
pub trait ActionSink {
    /// Handle one event. Nothing returned here feeds back into the engine.
    fn dispatch(&mut self, event: &ActionEvent);
}

impl<F> ActionSink for F
where
    F: FnMut(&ActionEvent),
{
    fn dispatch(&mut self, event: &ActionEvent) {
        self(event);
    }
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ActionSink for NullSink {
    fn dispatch(&mut self, _event: &ActionEvent) {}
}
