//! Core value types for televis-rs
//!
//! This module contains the scalar value representation used throughout the
//! data model for named telemetry values and structure-tree fields.
//!
//! # Main Types
//!
//! - [`ScalarValue`] - Closed tagged union of the supported value kinds
//!   (signed integer, float, bool, text)
//!
//! # Semantics
//!
//! Scalar slots are last-write-wins: writing a value of a different kind to
//! an existing key simply replaces it, there is no merging or coercion.
//! Narrower numeric types widen on conversion (`i32` → `Int`, `f32` →
//! `Float`), mirroring how instrumented code hands values in without caring
//! about the storage width.

use serde::{Deserialize, Serialize};

/// A single telemetry value
///
/// Closed set of variants by design: the display layer has to know how to
/// format every kind it can ever receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Free-form text
    Text(String),
}

impl ScalarValue {
    /// Short name of the contained kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            ScalarValue::Int(_) => "int",
            ScalarValue::Float(_) => "float",
            ScalarValue::Bool(_) => "bool",
            ScalarValue::Text(_) => "text",
        }
    }

    /// Get the integer value, if this is an `Int`
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ScalarValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the float value, if this is a `Float`
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ScalarValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the boolean value, if this is a `Bool`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScalarValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the text value, if this is a `Text`
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ScalarValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarValue::Int(v) => write!(f, "{}", v),
            ScalarValue::Float(v) => write!(f, "{:.3}", v),
            ScalarValue::Bool(v) => write!(f, "{}", v),
            ScalarValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for ScalarValue {
    fn from(v: i32) -> Self {
        ScalarValue::Int(v as i64)
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::Int(v)
    }
}

impl From<u32> for ScalarValue {
    fn from(v: u32) -> Self {
        ScalarValue::Int(v as i64)
    }
}

impl From<f32> for ScalarValue {
    fn from(v: f32) -> Self {
        ScalarValue::Float(v as f64)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::Float(v)
    }
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        ScalarValue::Bool(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        ScalarValue::Text(v.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        ScalarValue::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_widen() {
        assert_eq!(ScalarValue::from(42i32), ScalarValue::Int(42));
        assert_eq!(ScalarValue::from(42u32), ScalarValue::Int(42));
        assert_eq!(ScalarValue::from(1.5f32), ScalarValue::Float(1.5));
        assert_eq!(ScalarValue::from(true), ScalarValue::Bool(true));
        assert_eq!(
            ScalarValue::from("searching"),
            ScalarValue::Text("searching".to_string())
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(ScalarValue::Int(7).as_int(), Some(7));
        assert_eq!(ScalarValue::Int(7).as_float(), None);
        assert_eq!(ScalarValue::Bool(false).as_bool(), Some(false));
        assert_eq!(ScalarValue::Text("x".into()).as_text(), Some("x"));
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(ScalarValue::Int(42).to_string(), "42");
        assert_eq!(ScalarValue::Float(0.95).to_string(), "0.950");
        assert_eq!(ScalarValue::Bool(true).to_string(), "true");
        assert_eq!(ScalarValue::Text("hello".into()).to_string(), "hello");
    }

    #[test]
    fn test_serde_round_trip() {
        let value = ScalarValue::Float(9.81);
        let json = serde_json::to_string(&value).unwrap();
        let back: ScalarValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
