//! Purpose: Tagged-union value model produced by the parser.
//! Exports: `Value`, `ValueKind`, `Number`.
//! Role: Passive tree consumed by callers through key/index lookups.
//! Invariants: Object and Array are the only containers; everything else is a leaf.
//! Invariants: Integral literals that fit `i64` stay `Number::Int`; all others are `Float`.
use std::fmt;

use crate::core::array::Array;
use crate::core::error::{Error, ErrorKind};
use crate::core::object::Object;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn is_container(self) -> bool {
        matches!(self, ValueKind::Array | ValueKind::Object)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric literal, stored as the narrowest faithful representation.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Int(_))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(n) => Some(*n),
            Number::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(n) => *n as f64,
            Number::Float(n) => *n,
        }
    }
}

// Int and Float never compare equal, even for 42 vs 42.0.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Array),
    Object(Object),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Integer-typed numbers only; `42.0` yields `None`.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Object member lookup; fails on missing keys and non-object values.
    pub fn get(&self, key: &str) -> Result<&Value, Error> {
        match self {
            Value::Object(map) => map.get(key),
            other => Err(type_mismatch(ValueKind::Object, other.kind()).with_key(key)),
        }
    }

    /// Array element lookup; fails when out of range and on non-array values.
    pub fn at(&self, index: usize) -> Result<&Value, Error> {
        match self {
            Value::Array(items) => items.get(index),
            other => Err(type_mismatch(ValueKind::Array, other.kind()).with_index(index)),
        }
    }
}

pub(crate) fn type_mismatch(expected: ValueKind, found: ValueKind) -> Error {
    Error::new(ErrorKind::TypeMismatch).with_message(format!("expected {expected}, found {found}"))
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Int(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Value::Object(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{Number, Value, ValueKind};
    use crate::core::error::ErrorKind;

    #[test]
    fn int_and_float_are_distinct() {
        let int = Value::from(42i64);
        let float = Value::from(42.0);
        assert_ne!(int, float);
        assert_eq!(int.as_i64(), Some(42));
        assert_eq!(float.as_i64(), None);
        assert_eq!(int.as_f64(), float.as_f64());
        assert!(Number::Int(1).is_integer());
        assert!(!Number::Float(1.0).is_integer());
    }

    #[test]
    fn kind_reports_container_variants() {
        let arr: Value = vec![Value::Null].into_iter().collect();
        let obj: Value = [("k", Value::Bool(true))].into_iter().collect();
        assert_eq!(arr.kind(), ValueKind::Array);
        assert_eq!(obj.kind(), ValueKind::Object);
        assert!(arr.is_container() && obj.is_container());
        assert!(!Value::from("s").is_container());
        assert_eq!(Value::Null.kind().to_string(), "null");
    }

    #[test]
    fn get_on_non_object_is_type_mismatch() {
        let err = Value::from(1i64).get("a").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.key(), Some("a"));

        let err = Value::Null.at(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.message(), "expected array, found null");
    }
}
