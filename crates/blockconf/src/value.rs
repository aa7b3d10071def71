//! Typed field values and their textual encoding

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Presence flag (`capability opaque`)
    Boolean,
    /// Free text (`ospf router-id 10.0.0.1`)
    String,
    /// Keyword out of a small set (`ospf abr-type cisco`)
    Symbol,
    /// Decimal number (`maximum-paths 4`)
    Integer,
    /// Repeated line, one element per occurrence (`network 10.0.0.0/8`)
    List,
}

impl ValueType {
    /// Name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Symbol => "symbol",
            Self::Integer => "integer",
            Self::List => "list",
        }
    }

    /// Whether a value may be stored in a field of this type.
    ///
    /// Scalars also accept the `true`/`false`/absent sentinels, which is how
    /// flags with optional arguments are expressed.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Boolean, Value::Bool(_)) => true,
            (Self::Boolean, _) => false,
            (Self::List, Value::List(_)) => true,
            (Self::List, _) => false,
            (_, Value::Absent | Value::Bool(_)) => true,
            (Self::String, Value::Str(_)) => true,
            (Self::Symbol, Value::Symbol(_)) => true,
            (Self::Integer, Value::Int(_)) => true,
            _ => false,
        }
    }

    /// Decode a captured scalar.
    ///
    /// A missing capture is the presence flag, whatever the declared type.
    /// Returns `None` when the text does not decode.
    pub fn decode(&self, raw: Option<&str>) -> Option<Value> {
        let Some(raw) = raw else {
            return Some(Value::Bool(true));
        };

        match self {
            Self::Boolean => Some(Value::Bool(true)),
            Self::String => Some(Value::Str(raw.to_string())),
            Self::Symbol => Some(Value::symbol(raw)),
            Self::Integer => raw.trim().parse::<i64>().ok().map(Value::Int),
            Self::List => Some(Value::List(vec![raw.to_string()])),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Not configured
    Absent,
    /// Flag, or the `true`/`false` sentinel of a scalar field
    Bool(bool),
    /// Free text
    Str(String),
    /// Keyword, stored with `_` in place of `-`
    Symbol(String),
    /// Number
    Int(i64),
    /// Ordered elements of a repeated line
    List(Vec<String>),
}

impl Value {
    /// Build a symbol from configuration text (`abr-type` style keywords).
    pub fn symbol(raw: &str) -> Self {
        Value::Symbol(raw.replace('-', "_"))
    }

    /// Build a list value.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Whether this is the `false`/absent sentinel, i.e. "remove the field".
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Absent | Value::Bool(false))
    }

    /// Whether this is the `true` sentinel.
    pub fn is_flag(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    /// The argument this value contributes to a rendered command.
    pub fn argument(&self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s.clone()),
            Value::Symbol(s) => Some(s.replace('_', "-")),
            Value::Int(i) => Some(i.to_string()),
            Value::Absent | Value::Bool(_) | Value::List(_) => None,
        }
    }

    /// List elements, empty for scalars.
    pub fn items(&self) -> &[String] {
        match self {
            Value::List(items) => items,
            _ => &[],
        }
    }

    /// Short description of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Int(_) => "integer",
            Value::List(_) => "list",
        }
    }

    /// Equality used while diffing: list order does not matter.
    pub fn equivalent(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => {
                let mut a: Vec<&String> = a.iter().collect();
                let mut b: Vec<&String> = b.iter().collect();
                a.sort();
                b.sort();
                a == b
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "absent"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) | Value::Symbol(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Absent => serializer.serialize_str("absent"),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Str(s) | Value::Symbol(s) => serializer.serialize_str(s),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::List(items) => items.serialize(serializer),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}
