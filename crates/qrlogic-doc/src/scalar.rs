// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tagged scalar values shared by sensor readings and condition operands.
//!
//! Authored and generated documents mix numbers, booleans and strings
//! freely (`"value": "true"` next to `"value": true`). Everything is mapped
//! to [`Scalar`] at the boundary and compared through [`loose_eq`], the one
//! equality used by both `=` and `!=`.

use serde::{Serialize, Serializer};
use std::fmt;

/// Largest integer an `f64` represents exactly (2^53).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// A sensor reading or condition operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Numeric value (temperature, light level, thresholds).
    Number(f64),
    /// Boolean value (motion).
    Bool(bool),
    /// Free text (`"day"`, `"night"`, stringly-typed numbers).
    Text(String),
}

impl Scalar {
    /// Numeric view; only [`Scalar::Number`] qualifies, strings are never coerced.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Bool(_) | Scalar::Text(_) => None,
        }
    }

    /// Map a JSON scalar; `null`, arrays and objects have no scalar form.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(Scalar::Number),
            serde_json::Value::Bool(b) => Some(Scalar::Bool(*b)),
            serde_json::Value::String(s) => Some(Scalar::Text(s.clone())),
            _ => None,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn integral(n: f64) -> Option<i64> {
        if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_EXACT_INT {
            Some(n as i64)
        } else {
            None
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => match Scalar::integral(*n) {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{n}"),
            },
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Number(n) => match Scalar::integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Number(f64::from(n))
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

/// Case-insensitive comparison of display strings, so `true == "TRUE"`
/// and `30 == "30"`.
pub fn loose_eq(a: &Scalar, b: &Scalar) -> bool {
    a.to_string().to_lowercase() == b.to_string().to_lowercase()
}
