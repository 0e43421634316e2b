//! Value model.
//!
//! Instances are plain `serde_json::Value` trees (objects keep insertion order
//! through `preserve_order`). This module only adds the runtime type tag used
//! by inference and matching, plus the boundary type callers hand us.
use std::fmt;
use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};

/// Runtime kind of a JSON value. Numbers are split into `Int` and `Float`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    List,
    Object,
}

impl ValueKind {
    pub fn of(v: &Value) -> Self {
        match v {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            // i64 or u64 → integer; everything else serde_json holds as f64
            Value::Number(n) if n.is_i64() || n.is_u64() => ValueKind::Int,
            Value::Number(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::List,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "str",
            ValueKind::List => "list",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INSTANCE
// ————————————————————————————————————————————————————————————————————————————

/// What a caller may hand to the validator: raw JSON text or an already
/// deserialized tree.
#[derive(Debug, Clone, Copy)]
pub enum Instance<'a> {
    Text(&'a str),
    Value(&'a Value),
}

impl<'a> From<&'a str> for Instance<'a> {
    fn from(s: &'a str) -> Self { Instance::Text(s) }
}

impl<'a> From<&'a String> for Instance<'a> {
    fn from(s: &'a String) -> Self { Instance::Text(s.as_str()) }
}

impl<'a> From<&'a Value> for Instance<'a> {
    fn from(v: &'a Value) -> Self { Instance::Value(v) }
}

impl<'a> Instance<'a> {
    /// Byte length of the instance's UTF-8 text form.
    ///
    /// Pre-parsed values are measured on their compact serialization.
    pub fn byte_len(&self) -> usize {
        match self {
            Instance::Text(s) => s.len(),
            Instance::Value(v) => serde_json::to_vec(v).map(|b| b.len()).unwrap_or(0),
        }
    }

    /// Parse (if needed) and return the root value, borrowing when possible.
    pub fn load(&self) -> Result<std::borrow::Cow<'a, Value>> {
        use std::borrow::Cow;
        match *self {
            Instance::Text(s) => Ok(Cow::Owned(serde_json::from_str::<Value>(s)?)),
            Instance::Value(v) => Ok(Cow::Borrowed(v)),
        }
    }
}

/// Require an object at the root of an instance.
pub fn expect_object(v: &Value) -> Result<&Map<String, Value>> {
    v.as_object().ok_or(ValidationError::NonObjectInstance { actual: ValueKind::of(v) })
}
