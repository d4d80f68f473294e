// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Document builder and canonical fixtures.

use qrlogic_doc::{Action, Device, LogicDocument, Operator, SensorKind, SwitchState, Trigger};

/// Canonical text of [`hot_log_document`]: one chunk at budget 250, three
/// at budget 50.
pub const HOT_LOG_JSON: &str = r#"{"name":"X","triggers":[{"sensor":"temperature","operator":">","value":30}],"actions":[{"type":"log","payload":{"message":"hot"}}]}"#;

/// Builder for [`LogicDocument`]s in tests.
///
/// # Example
///
/// ```
/// use qrlogic_doc::{Operator, SensorKind, Trigger};
/// use qrlogic_dry_tests::DocumentBuilder;
///
/// let doc = DocumentBuilder::new("Night light")
///     .rule(
///         Trigger::condition(SensorKind::TimeOfDay, Operator::Equal, "night"),
///         DocumentBuilder::log("dark"),
///     )
///     .build();
///
/// assert_eq!(doc.triggers.len(), 1);
/// assert_eq!(doc.actions.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    name: String,
    triggers: Vec<Trigger>,
    actions: Vec<Action>,
}

impl DocumentBuilder {
    /// Empty document called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triggers: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Append a trigger and the action it fires.
    pub fn rule(mut self, trigger: Trigger, action: Action) -> Self {
        self.triggers.push(trigger);
        self.actions.push(action);
        self
    }

    /// Append a trigger without a paired action (it falls back to the first).
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Build the document as given; nothing is validated.
    pub fn build(self) -> LogicDocument {
        LogicDocument {
            name: self.name,
            triggers: self.triggers,
            actions: self.actions,
        }
    }

    /// `log` action with a message.
    pub fn log(message: &str) -> Action {
        Action::Log {
            message: Some(message.to_owned()),
        }
    }

    /// `toggle` action.
    pub fn toggle(device: Device, state: SwitchState) -> Action {
        Action::Toggle {
            device: Some(device),
            state: Some(state),
        }
    }
}

/// `temperature > 30` logs "hot".
pub fn hot_log_document() -> LogicDocument {
    DocumentBuilder::new("X")
        .rule(
            Trigger::condition(SensorKind::Temperature, Operator::Greater, 30),
            DocumentBuilder::log("hot"),
        )
        .build()
}

/// Two rules: a hot and bright greenhouse turns the fan on, motion flashes
/// the screen red.
pub fn greenhouse_document() -> LogicDocument {
    DocumentBuilder::new("Greenhouse")
        .rule(
            Trigger::all(vec![
                Trigger::condition(SensorKind::Temperature, Operator::Greater, 28),
                Trigger::condition(SensorKind::Light, Operator::Greater, 600),
            ]),
            DocumentBuilder::toggle(Device::Fan, SwitchState::On),
        )
        .rule(
            Trigger::condition(SensorKind::Motion, Operator::Equal, true),
            Action::FlashBackground {
                color: Some("#ff0000".to_owned()),
                message: Some("Intruder".to_owned()),
                duration_ms: Some(1500),
            },
        )
        .build()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hot_log_fixture_matches_its_canonical_text() {
        assert_eq!(hot_log_document().to_canonical_json(), HOT_LOG_JSON);
        assert_eq!(
            LogicDocument::from_json_str(HOT_LOG_JSON).unwrap(),
            hot_log_document()
        );
    }

    #[test]
    fn greenhouse_fixture_survives_the_trust_boundary() {
        let doc = greenhouse_document();
        let parsed = LogicDocument::from_json_str(&doc.to_canonical_json()).unwrap();
        assert_eq!(parsed, doc);
    }
}
