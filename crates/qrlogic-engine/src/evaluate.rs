// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Trigger evaluation against a sensor snapshot.
//!
//! Groups nest without limit, so the walk keeps its own stack instead of
//! recursing. Evaluation never fails: a comparison that makes no sense for
//! its operands is simply false.

use crate::clock::TimeOfDay;
use qrlogic_doc::{loose_eq, Condition, GroupKind, Operator, Scalar, SensorKind, Trigger};
use serde::{Deserialize, Serialize};
use std::slice;

/// Simulated sensor readings supplied on every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Ambient temperature.
    pub temperature: f64,
    /// Light level.
    pub light: f64,
    /// Motion detected.
    pub motion: bool,
}

impl SensorSnapshot {
    /// Reading for `sensor`. `timeOfDay` is ambient and comes from the clock.
    pub fn reading(&self, sensor: SensorKind, time_of_day: TimeOfDay) -> Scalar {
        match sensor {
            SensorKind::Temperature => Scalar::Number(self.temperature),
            SensorKind::Light => Scalar::Number(self.light),
            SensorKind::Motion => Scalar::Bool(self.motion),
            SensorKind::TimeOfDay => Scalar::from(time_of_day.as_str()),
        }
    }
}

/// Apply `condition`'s operator to a reading.
///
/// `>` and `<` hold only when both sides are numbers; `=` and `!=` go
/// through [`loose_eq`].
pub fn compare(operator: Operator, reading: &Scalar, operand: &Scalar) -> bool {
    match operator {
        Operator::Greater => matches!(
            (reading.as_number(), operand.as_number()),
            (Some(a), Some(b)) if a > b
        ),
        Operator::Less => matches!(
            (reading.as_number(), operand.as_number()),
            (Some(a), Some(b)) if a < b
        ),
        Operator::Equal => loose_eq(reading, operand),
        Operator::NotEqual => !loose_eq(reading, operand),
    }
}

/// Evaluate one leaf condition.
pub fn condition_holds(
    condition: &Condition,
    snapshot: &SensorSnapshot,
    time_of_day: TimeOfDay,
) -> bool {
    let reading = snapshot.reading(condition.sensor, time_of_day);
    compare(condition.operator, &reading, &condition.value)
}

/// A group whose remaining children have not been visited yet.
struct PendingGroup<'a> {
    kind: GroupKind,
    rest: slice::Iter<'a, Trigger>,
}

/// Evaluate a trigger tree. `all` and `any` short-circuit; an empty `all`
/// holds and an empty `any` does not.
pub fn evaluate(trigger: &Trigger, snapshot: &SensorSnapshot, time_of_day: TimeOfDay) -> bool {
    let mut stack: Vec<PendingGroup<'_>> = Vec::new();
    let mut node = trigger;
    loop {
        let value = match node {
            Trigger::Condition(condition) => condition_holds(condition, snapshot, time_of_day),
            Trigger::Group(group) => {
                let mut rest = group.conditions.iter();
                if let Some(first) = rest.next() {
                    stack.push(PendingGroup {
                        kind: group.kind,
                        rest,
                    });
                    node = first;
                    continue;
                }
                group.kind.identity()
            }
        };

        // Fold the value upward until some group still has children to visit.
        loop {
            let Some(top) = stack.last_mut() else {
                return value;
            };
            let decided = match top.kind {
                GroupKind::All => !value,
                GroupKind::Any => value,
            };
            if !decided {
                if let Some(next) = top.rest.next() {
                    node = next;
                    break;
                }
            }
            // A finished or short-circuited group takes the value of its last child.
            stack.pop();
        }
    }
}
