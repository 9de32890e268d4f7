//! Core types for qtempo
//!
//! Fundamental type aliases and the parameter value type shared by the
//! recorder, the scheduler and the textual front end.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Time in nanoseconds
pub type TimeNs = f64;

/// Rotation angle in radians
pub type Angle = f64;

/// Named timeline resource (a qubit)
///
/// Classical sinks (classical bits) are never resources; they travel as
/// operation parameters such as `output_bit`.
pub type ResourceId = String;

/// Merged parameter map handed to behavior hooks
///
/// `BTreeMap` keeps iteration deterministic, which the finalize and
/// serialization paths rely on.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// Name under which synthetic idle-padding operations are materialized
pub const WAITING_GATE: &str = "waiting";

/// Parameter name whose value is negated when a circuit is time-reversed
pub const ANGLE_PARAM: &str = "angle";

// ============================================================================
// ParamValue
// ============================================================================

/// A user-supplied gate parameter
///
/// Parameters arrive either as numbers (angles, phases) or as text
/// (classical bit names for measurement output). The textual front end
/// parses each token as a float where possible and keeps it as text
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Numeric parameter (angle, phase, ...)
    Number(f64),
    /// Textual parameter (classical bit name, label, ...)
    Text(String),
}

impl ParamValue {
    /// Parse a token: float if possible, text otherwise
    pub fn parse(token: &str) -> Self {
        match token.parse::<f64>() {
            Ok(v) => ParamValue::Number(v),
            Err(_) => ParamValue::Text(token.to_string()),
        }
    }

    /// Numeric view, if this parameter is a number
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            ParamValue::Text(_) => None,
        }
    }

    /// Textual view, if this parameter is text
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Number(_) => None,
            ParamValue::Text(s) => Some(s),
        }
    }

    /// Whether this parameter is numeric
    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, ParamValue::Number(_))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(v) => write!(f, "{}", v),
            ParamValue::Text(s) => write!(f, "{}", s),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(ParamValue::parse("1.5"), ParamValue::Number(1.5));
        assert_eq!(ParamValue::parse("-3"), ParamValue::Number(-3.0));
        assert_eq!(ParamValue::parse("2e-3"), ParamValue::Number(0.002));
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(ParamValue::parse("c0"), ParamValue::Text("c0".into()));
        assert_eq!(ParamValue::parse(""), ParamValue::Text(String::new()));
    }

    #[test]
    fn test_views() {
        assert_eq!(ParamValue::Number(0.5).as_number(), Some(0.5));
        assert_eq!(ParamValue::Number(0.5).as_text(), None);
        assert_eq!(ParamValue::Text("m0".into()).as_text(), Some("m0"));
        assert!(!ParamValue::Text("m0".into()).is_number());
    }

    #[test]
    fn test_serde_untagged() {
        let n: ParamValue = serde_json::from_str("0.25").unwrap();
        assert_eq!(n, ParamValue::Number(0.25));

        let t: ParamValue = serde_json::from_str("\"c3\"").unwrap();
        assert_eq!(t, ParamValue::Text("c3".into()));

        assert_eq!(serde_json::to_string(&n).unwrap(), "0.25");
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"c3\"");
    }

    #[test]
    fn test_display() {
        assert_eq!(ParamValue::Number(1.5).to_string(), "1.5");
        assert_eq!(ParamValue::Text("c0".into()).to_string(), "c0");
    }
}
