// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Trust-boundary parsing: JSON text in, normalized [`LogicDocument`] out.
//!
//! Scanned transfers, pasted text and generator output all pass through
//! here. Vocabulary (sensor, operator, group kind, action type) is strict;
//! action payload fields are lenient and degrade to `None`.

use crate::model::{
    Action, ActionKind, Condition, Device, Group, GroupKind, LogicDocument, Operator, SensorKind,
    SwitchState, Trigger,
};
use crate::scalar::Scalar;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt::Write as _;
use std::slice;
use thiserror::Error;

/// Why a candidate document was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Input is not JSON at all.
    #[error("invalid JSON: {0}")]
    Syntax(String),
    /// A required field is absent.
    #[error("{path}: missing field")]
    Missing {
        /// Location of the missing field.
        path: String,
    },
    /// A field has the wrong JSON type.
    #[error("{path}: expected {expected}")]
    WrongType {
        /// Location of the field.
        path: String,
        /// Human-readable expected type.
        expected: &'static str,
    },
    /// A field that must be non-empty is empty.
    #[error("{path}: must not be empty")]
    Empty {
        /// Location of the field.
        path: String,
    },
    /// A vocabulary value outside the schema.
    #[error("{path}: unknown {what} `{value}`")]
    Unknown {
        /// Location of the field.
        path: String,
        /// Vocabulary name (`sensor`, `operator`, ...).
        what: &'static str,
        /// Offending value.
        value: String,
    },
}

impl DocumentError {
    /// Re-anchor a path reported relative to a nested node.
    fn nested_in(self, parent: &str) -> Self {
        match self {
            Self::Syntax(message) => Self::Syntax(message),
            Self::Missing { path } => Self::Missing {
                path: join(parent, &path),
            },
            Self::WrongType { path, expected } => Self::WrongType {
                path: join(parent, &path),
                expected,
            },
            Self::Empty { path } => Self::Empty {
                path: join(parent, &path),
            },
            Self::Unknown { path, what, value } => Self::Unknown {
                path: join(parent, &path),
                what,
                value,
            },
        }
    }
}

fn join(parent: &str, child: &str) -> String {
    match (parent.is_empty(), child.is_empty()) {
        (true, _) => child.to_owned(),
        (false, true) => parent.to_owned(),
        (false, false) => format!("{parent}.{child}"),
    }
}

impl LogicDocument {
    /// Parse, validate and normalize a JSON document.
    ///
    /// Trigger groups may nest to any depth.
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        let syntax = |e: serde_json::Error| DocumentError::Syntax(e.to_string());
        let mut de = serde_json::Deserializer::from_str(text);
        de.disable_recursion_limit();
        let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de)).map_err(syntax)?;
        de.end().map_err(syntax)?;
        Self::try_from(value)
    }

    /// Canonical compact serialization (the string the transport chunks).
    pub fn to_canonical_json(&self) -> String {
        // Every field serializes infallibly: string keys, finite or integral numbers.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl TryFrom<Value> for LogicDocument {
    type Error = DocumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let parsed = Self::from_value(&value);
        release(value);
        parsed
    }
}

impl LogicDocument {
    fn from_value(value: &Value) -> Result<Self, DocumentError> {
        let obj = as_object(value, "$")?;

        let name = match obj.get("name") {
            None => return Err(DocumentError::Missing { path: "name".into() }),
            Some(Value::String(s)) if s.trim().is_empty() => {
                return Err(DocumentError::Empty { path: "name".into() })
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(DocumentError::WrongType {
                    path: "name".into(),
                    expected: "string",
                })
            }
        };

        let triggers = one_or_many(obj, "triggers")?
            .iter()
            .enumerate()
            .map(|(i, t)| parse_trigger(t, &format!("triggers[{i}]")))
            .collect::<Result<Vec<_>, _>>()?;

        let actions = one_or_many(obj, "actions")?
            .iter()
            .enumerate()
            .map(|(i, a)| parse_action(a, &format!("actions[{i}]")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LogicDocument {
            name,
            triggers,
            actions,
        })
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, DocumentError> {
    value.as_object().ok_or_else(|| DocumentError::WrongType {
        path: path.to_owned(),
        expected: "object",
    })
}

/// Normalize a field holding either one object or a non-empty array.
fn one_or_many<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
) -> Result<Vec<&'a Value>, DocumentError> {
    match obj.get(key) {
        None => Err(DocumentError::Missing { path: key.into() }),
        Some(Value::Array(items)) if items.is_empty() => {
            Err(DocumentError::Empty { path: key.into() })
        }
        Some(Value::Array(items)) => Ok(items.iter().collect()),
        Some(single @ Value::Object(_)) => Ok(vec![single]),
        Some(_) => Err(DocumentError::WrongType {
            path: key.into(),
            expected: "object or array",
        }),
    }
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a str, DocumentError> {
    let field = join(path, key);
    match obj.get(key) {
        None => Err(DocumentError::Missing { path: field }),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(DocumentError::WrongType {
            path: field,
            expected: "string",
        }),
    }
}

/// A group whose children are still being parsed. The child in progress
/// sits at index `parsed.len()`.
struct PendingGroup<'a> {
    kind: GroupKind,
    children: slice::Iter<'a, Value>,
    parsed: Vec<Trigger>,
}

impl PendingGroup<'_> {
    fn finish(self) -> Trigger {
        Trigger::Group(Group {
            kind: self.kind,
            conditions: self.parsed,
        })
    }
}

/// One trigger object, with a group's children left unparsed.
enum Node<'a> {
    Condition(Condition),
    Group(GroupKind, &'a [Value]),
}

/// Parse a trigger tree without recursing, so nesting depth is bounded
/// only by memory.
fn parse_trigger(value: &Value, root: &str) -> Result<Trigger, DocumentError> {
    let mut stack: Vec<PendingGroup<'_>> = Vec::new();
    let mut current = value;
    'descend: loop {
        let node = parse_node(current).map_err(|err| err.nested_in(&trigger_path(root, &stack)))?;
        let mut done = match node {
            Node::Condition(condition) => Trigger::Condition(condition),
            Node::Group(kind, children) => {
                let mut group = PendingGroup {
                    kind,
                    children: children.iter(),
                    parsed: Vec::with_capacity(children.len()),
                };
                if let Some(child) = group.children.next() {
                    stack.push(group);
                    current = child;
                    continue 'descend;
                }
                group.finish()
            }
        };
        while let Some(mut group) = stack.pop() {
            group.parsed.push(done);
            if let Some(child) = group.children.next() {
                stack.push(group);
                current = child;
                continue 'descend;
            }
            done = group.finish();
        }
        return Ok(done);
    }
}

/// Location of the node on top of `stack`.
fn trigger_path(root: &str, stack: &[PendingGroup<'_>]) -> String {
    stack.iter().fold(root.to_owned(), |mut path, group| {
        let _ = write!(path, ".conditions[{}]", group.parsed.len());
        path
    })
}

/// Validate one trigger object. Error paths are relative to the object.
fn parse_node(value: &Value) -> Result<Node<'_>, DocumentError> {
    let obj = as_object(value, "")?;

    if obj.contains_key("conditions") {
        let kind = required_str(obj, "kind", "")?;
        let kind = GroupKind::parse(kind).ok_or_else(|| DocumentError::Unknown {
            path: "kind".into(),
            what: "group kind",
            value: kind.to_owned(),
        })?;
        let Some(children) = obj.get("conditions").and_then(Value::as_array) else {
            return Err(DocumentError::WrongType {
                path: "conditions".into(),
                expected: "array",
            });
        };
        return Ok(Node::Group(kind, children));
    }

    let sensor = required_str(obj, "sensor", "")?;
    let sensor = SensorKind::parse(sensor).ok_or_else(|| DocumentError::Unknown {
        path: "sensor".into(),
        what: "sensor",
        value: sensor.to_owned(),
    })?;
    let operator = required_str(obj, "operator", "")?;
    let operator = Operator::parse(operator).ok_or_else(|| DocumentError::Unknown {
        path: "operator".into(),
        what: "operator",
        value: operator.to_owned(),
    })?;
    let raw = obj.get("value").ok_or_else(|| DocumentError::Missing {
        path: "value".into(),
    })?;
    let value = Scalar::from_json(raw).ok_or(DocumentError::WrongType {
        path: "value".into(),
        expected: "number, boolean or string",
    })?;

    Ok(Node::Condition(Condition {
        sensor,
        operator,
        value,
    }))
}

/// Drop a JSON tree without recursing into it.
fn release(value: Value) {
    let mut pending = vec![value];
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(items) => pending.extend(items),
            Value::Object(map) => pending.extend(map.into_iter().map(|(_, v)| v)),
            _ => {}
        }
    }
}

fn parse_action(value: &Value, path: &str) -> Result<Action, DocumentError> {
    let obj = as_object(value, path)?;
    let ty = required_str(obj, "type", path)?;
    let kind = ActionKind::parse(ty).ok_or_else(|| DocumentError::Unknown {
        path: format!("{path}.type"),
        what: "action type",
        value: ty.to_owned(),
    })?;

    let empty = Map::new();
    let payload = obj.get("payload").and_then(Value::as_object).unwrap_or(&empty);
    let text = |key: &str| payload.get(key).and_then(Value::as_str).map(str::to_owned);
    let duration = || payload.get("duration").and_then(Value::as_u64);

    Ok(match kind {
        ActionKind::Log => Action::Log {
            message: text("message"),
        },
        ActionKind::Toggle => Action::Toggle {
            device: payload
                .get("device")
                .and_then(Value::as_str)
                .and_then(Device::parse),
            state: payload
                .get("state")
                .and_then(Value::as_str)
                .and_then(SwitchState::parse),
        },
        ActionKind::FlashBackground => Action::FlashBackground {
            color: text("color"),
            message: text("message"),
            duration_ms: duration(),
        },
        ActionKind::Vibrate => Action::Vibrate {
            duration_ms: duration(),
        },
    })
}
