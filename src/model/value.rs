use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Capability name → parameter name → value (actuation input)
pub type Capabilities = BTreeMap<String, BTreeMap<String, Value>>;

/// Parameter name → value (service invocation input)
pub type Parameters = BTreeMap<String, Value>;

/// Scalar parameter value.
///
/// Variant order matters for untagged decoding: integers must be tried
/// before doubles so that `3` stays an integer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimitiveValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
}

impl PrimitiveValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrimitiveValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PrimitiveValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveValue::Bool(b) => write!(f, "{}", b),
            PrimitiveValue::Int(i) => write!(f, "{}", i),
            PrimitiveValue::Double(d) => write!(f, "{}", d),
            PrimitiveValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// Tagged parameter value carried by actuation and service requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Primitive(PrimitiveValue),
    Array(Vec<Value>),
    Complex(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the primitive if this is one.
    pub fn as_primitive(&self) -> Option<&PrimitiveValue> {
        match self {
            Value::Primitive(p) => Some(p),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Primitive(PrimitiveValue::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Primitive(PrimitiveValue::String(s))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Primitive(PrimitiveValue::Int(i))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Primitive(p) => write!(f, "{}", p),
            other => {
                let json = serde_json::to_string(other).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
        }
    }
}
