// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Logic document types: named triggers paired with actions.
//!
//! Values of these types are always in normalized form: `triggers` and
//! `actions` are non-empty sequences. The only way in from text is
//! [`LogicDocument::from_json_str`](crate::LogicDocument::from_json_str),
//! which validates and normalizes in one pass.

use crate::scalar::Scalar;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// The transferable unit: a named rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct LogicDocument {
    /// Display label (non-empty).
    pub name: String,
    /// Ordered, non-empty trigger sequence.
    pub triggers: Vec<Trigger>,
    /// Ordered, non-empty action sequence; `actions[i]` answers `triggers[i]`.
    pub actions: Vec<Action>,
}

impl LogicDocument {
    /// Action paired with trigger `index`, falling back to the first action
    /// when the action list is shorter than the trigger list.
    pub fn action_for(&self, index: usize) -> Option<&Action> {
        self.actions.get(index).or_else(|| self.actions.first())
    }
}

/// Boolean-producing node: a leaf condition or a nested group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Trigger {
    /// Leaf comparison against one sensor.
    Condition(Condition),
    /// `all`/`any` combination of child triggers.
    Group(Group),
}

impl Trigger {
    /// Shorthand for a leaf trigger.
    pub fn condition(sensor: SensorKind, operator: Operator, value: impl Into<Scalar>) -> Self {
        Trigger::Condition(Condition {
            sensor,
            operator,
            value: value.into(),
        })
    }

    /// Shorthand for an `all` group.
    pub fn all(conditions: Vec<Trigger>) -> Self {
        Trigger::Group(Group {
            kind: GroupKind::All,
            conditions,
        })
    }

    /// Shorthand for an `any` group.
    pub fn any(conditions: Vec<Trigger>) -> Self {
        Trigger::Group(Group {
            kind: GroupKind::Any,
            conditions,
        })
    }
}

/// Leaf comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    /// Sensor to read.
    pub sensor: SensorKind,
    /// Comparison operator.
    pub operator: Operator,
    /// Operand compared against the sensor reading.
    pub value: Scalar,
}

/// Recursive combination of triggers.
///
/// Groups nest without limit. Operations that must recurse (clone,
/// comparison, serialization) grow the stack on demand, and dropping a
/// group tears its subtree down iteratively.
#[derive(Debug)]
pub struct Group {
    /// Combination rule.
    pub kind: GroupKind,
    /// Children, evaluated in order.
    pub conditions: Vec<Trigger>,
}

/// Minimum stack left before a recursive step switches to a fresh segment.
pub(crate) const RED_ZONE: usize = 64 * 1024;
/// Size of each freshly allocated stack segment.
pub(crate) const STACK_PER_RECURSION: usize = 1024 * 1024;

impl Clone for Group {
    fn clone(&self) -> Self {
        stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || Self {
            kind: self.kind,
            conditions: self.conditions.clone(),
        })
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
            self.kind == other.kind && self.conditions == other.conditions
        })
    }
}

impl Serialize for Group {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
            let mut group = serializer.serialize_struct("Group", 2)?;
            group.serialize_field("kind", &self.kind)?;
            group.serialize_field("conditions", &self.conditions)?;
            group.end()
        })
    }
}

impl Drop for Group {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.conditions);
        while let Some(trigger) = pending.pop() {
            if let Trigger::Group(mut group) = trigger {
                pending.append(&mut group.conditions);
            }
        }
    }
}

/// How a [`Group`] combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Every child must hold (empty group holds).
    All,
    /// At least one child must hold (empty group fails).
    Any,
}

impl GroupKind {
    /// Value of the group when it has no children.
    pub fn identity(self) -> bool {
        match self {
            GroupKind::All => true,
            GroupKind::Any => false,
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(GroupKind::All),
            "any" => Some(GroupKind::Any),
            _ => None,
        }
    }
}

/// Sensors a condition may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SensorKind {
    /// Ambient temperature (numeric).
    Temperature,
    /// Light level (numeric).
    Light,
    /// Motion detected (boolean).
    Motion,
    /// Wall-clock `day`/`night`; never read from a snapshot.
    TimeOfDay,
}

impl SensorKind {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Light => "light",
            SensorKind::Motion => "motion",
            SensorKind::TimeOfDay => "timeOfDay",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s {
            "temperature" => Some(SensorKind::Temperature),
            "light" => Some(SensorKind::Light),
            "motion" => Some(SensorKind::Motion),
            "timeOfDay" => Some(SensorKind::TimeOfDay),
            _ => None,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    /// Numeric greater-than.
    #[serde(rename = ">")]
    Greater,
    /// Numeric less-than.
    #[serde(rename = "<")]
    Less,
    /// Loose equality.
    #[serde(rename = "=")]
    Equal,
    /// Loose inequality.
    #[serde(rename = "!=")]
    NotEqual,
}

impl Operator {
    /// Wire symbol.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s {
            ">" => Some(Operator::Greater),
            "<" => Some(Operator::Less),
            "=" => Some(Operator::Equal),
            "!=" => Some(Operator::NotEqual),
            _ => None,
        }
    }
}

/// Side effect requested by a firing trigger.
///
/// Payload fields that were missing or malformed on the wire are `None`;
/// whether that makes the action unusable is decided at dispatch time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Action {
    /// Append a message to the event log.
    Log {
        /// Message text.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Switch a simulated device.
    Toggle {
        /// Target device.
        #[serde(skip_serializing_if = "Option::is_none")]
        device: Option<Device>,
        /// Desired state.
        #[serde(skip_serializing_if = "Option::is_none")]
        state: Option<SwitchState>,
    },
    /// Flash the screen background.
    FlashBackground {
        /// CSS-style color string.
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        /// Overlay text.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        /// Flash duration in milliseconds.
        #[serde(rename = "duration", skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    /// Vibrate the device.
    Vibrate {
        /// Vibration duration in milliseconds.
        #[serde(rename = "duration", skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
}

impl Action {
    /// Payload-free discriminant.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Log { .. } => ActionKind::Log,
            Action::Toggle { .. } => ActionKind::Toggle,
            Action::FlashBackground { .. } => ActionKind::FlashBackground,
            Action::Vibrate { .. } => ActionKind::Vibrate,
        }
    }
}

/// Action discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    /// `log`
    Log,
    /// `toggle`
    Toggle,
    /// `flashBackground`
    FlashBackground,
    /// `vibrate`
    Vibrate,
}

impl ActionKind {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Log => "log",
            ActionKind::Toggle => "toggle",
            ActionKind::FlashBackground => "flashBackground",
            ActionKind::Vibrate => "vibrate",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s {
            "log" => Some(ActionKind::Log),
            "toggle" => Some(ActionKind::Toggle),
            "flashBackground" => Some(ActionKind::FlashBackground),
            "vibrate" => Some(ActionKind::Vibrate),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Devices a `toggle` action may address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Light.
    Light,
    /// Fan.
    Fan,
    /// Pump.
    Pump,
    /// Siren.
    Siren,
}

impl Device {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Device::Light => "light",
            Device::Fan => "fan",
            Device::Pump => "pump",
            Device::Siren => "siren",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Device::Light),
            "fan" => Some(Device::Fan),
            "pump" => Some(Device::Pump),
            "siren" => Some(Device::Siren),
            _ => None,
        }
    }
}

/// Target state of a `toggle` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchState {
    /// On.
    On,
    /// Off.
    Off,
}

impl SwitchState {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            SwitchState::On => "on",
            SwitchState::Off => "off",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s {
            "on" => Some(SwitchState::On),
            "off" => Some(SwitchState::Off),
            _ => None,
        }
    }
}
