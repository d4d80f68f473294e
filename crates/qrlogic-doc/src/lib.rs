// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Automation logic documents: the unit carried over the QR transport and
//! evaluated by the rule engine.
//!
//! Pure data plus the single validation boundary. Nothing here touches the
//! transport framing or the clock.

mod model;
mod parse;
mod scalar;

pub use model::{
    Action, ActionKind, Condition, Device, Group, GroupKind, LogicDocument, Operator, SensorKind,
    SwitchState, Trigger,
};
pub use parse::DocumentError;
pub use scalar::{loose_eq, Scalar};
