//! Plain literal values stored in, and produced by, overrides.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Decimal(f64),
    String(String),
    List(Vec<Value>),
}

impl Value {
    pub fn unit() -> Self {
        Value::Unit
    }

    pub fn bool(value: bool) -> Self {
        Value::Bool(value)
    }

    pub fn int(value: i64) -> Self {
        Value::Int(value)
    }

    pub fn decimal(value: f64) -> Self {
        Value::Decimal(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Value::String(value.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(items)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(json)?)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => {
                a.total_cmp(b) == std::cmp::Ordering::Equal
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Int(value) => write!(f, "{}", value),
            Value::Decimal(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
            Value::List(items) => {
                write!(f, "[{}]", items.iter().map(|item| item.to_string()).join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Value;

    #[test]
    fn list_display_joins_items() {
        let value = Value::list(vec![Value::int(1), Value::string("two"), Value::bool(true)]);
        assert_eq!(value.to_string(), "[1, two, true]");
    }

    #[test]
    fn decimal_equality_uses_total_order() {
        assert_eq!(Value::decimal(f64::NAN), Value::decimal(f64::NAN));
        assert_ne!(Value::decimal(0.1), Value::decimal(0.2));
    }

    #[test]
    fn json_conversion_preserves_structure() {
        let value = Value::list(vec![Value::int(7), Value::unit()]);
        let json = value.to_json().unwrap();
        assert_eq!(Value::from_json(json).unwrap(), value);
    }
}
