// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The iterative trigger walk agrees with the obvious recursive definition.

#![allow(missing_docs)]

use proptest::prelude::*;
use qrlogic_doc::{GroupKind, Operator, Scalar, SensorKind, Trigger};
use qrlogic_engine::{condition_holds, evaluate, SensorSnapshot, TimeOfDay};

fn reference(trigger: &Trigger, snapshot: &SensorSnapshot, tod: TimeOfDay) -> bool {
    match trigger {
        Trigger::Condition(condition) => condition_holds(condition, snapshot, tod),
        Trigger::Group(group) => match group.kind {
            GroupKind::All => group
                .conditions
                .iter()
                .all(|child| reference(child, snapshot, tod)),
            GroupKind::Any => group
                .conditions
                .iter()
                .any(|child| reference(child, snapshot, tod)),
        },
    }
}

fn operand() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        (-20i32..60).prop_map(Scalar::from),
        (0.0f64..1000.0).prop_map(Scalar::from),
        any::<bool>().prop_map(Scalar::from),
        prop::sample::select(vec!["day", "night", "true", "30", "x"]).prop_map(Scalar::from),
    ]
}

fn leaf() -> impl Strategy<Value = Trigger> {
    (
        prop::sample::select(vec![
            SensorKind::Temperature,
            SensorKind::Light,
            SensorKind::Motion,
            SensorKind::TimeOfDay,
        ]),
        prop::sample::select(vec![
            Operator::Greater,
            Operator::Less,
            Operator::Equal,
            Operator::NotEqual,
        ]),
        operand(),
    )
        .prop_map(|(sensor, operator, value)| Trigger::condition(sensor, operator, value))
}

fn trigger() -> impl Strategy<Value = Trigger> {
    leaf().prop_recursive(5, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Trigger::all),
            prop::collection::vec(inner, 0..5).prop_map(Trigger::any),
        ]
    })
}

fn snapshot() -> impl Strategy<Value = SensorSnapshot> {
    (-20.0f64..60.0, 0.0f64..1000.0, any::<bool>()).prop_map(|(temperature, light, motion)| {
        SensorSnapshot {
            temperature,
            light,
            motion,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn iterative_walk_matches_recursive_definition(
        trigger in trigger(),
        snapshot in snapshot(),
        hour in 0u32..24,
    ) {
        let tod = TimeOfDay::from_hour(hour);
        prop_assert_eq!(
            evaluate(&trigger, &snapshot, tod),
            reference(&trigger, &snapshot, tod)
        );
    }
}
