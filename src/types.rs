//! Core data model types for report execution.
//!
//! A report run produces an ordered list of [`Row`]s, each mapping result column names to a
//! dynamically typed [`Value`]. Output columns are described by [`Column`]s.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single scalar value in a [`Row`].
///
/// Serializes untagged: `null`, a JSON number, or a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/SQL `NULL` value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for [`Value::Int64`] and [`Value::Float64`].
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int64(_) | Value::Float64(_))
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    /// Default string form: integers and floats as Rust prints them (whole floats without a
    /// trailing `.0`), strings verbatim, null as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Utf8(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int64(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Utf8(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Numeric view of a [`Value`], used by row-process folds and footer totals.
///
/// Anything that is not an integer or a float coerces to integer zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integral number.
    Int(i64),
    /// Floating point number.
    Float(f64),
}

impl Number {
    /// Integer zero, the fallback for missing and non-numeric values.
    pub const ZERO: Number = Number::Int(0);

    /// Coerce a value, treating missing, null and text values as zero.
    pub fn coerce(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Int64(v)) => Number::Int(*v),
            Some(Value::Float64(v)) => Number::Float(*v),
            _ => Number::ZERO,
        }
    }

    /// This number as an `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    /// Convert into a [`Value`] for storage in a row.
    pub fn into_value(self) -> Value {
        match self {
            Number::Int(v) => Value::Int64(v),
            Number::Float(v) => Value::Float64(v),
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Number::ZERO
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A single report row: result column name -> value.
///
/// Keys are the query's result column names, extended with the output keys written by row
/// processes. Iteration order is by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored at `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Store `value` at `key`, returning the shadowed value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Returns `true` if the row has a value at `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Numeric view of the value at `key` (zero when missing or non-numeric).
    pub fn number(&self, key: &str) -> Number {
        Number::coerce(self.get(key))
    }

    /// Number of keys in the row.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the row has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// An output column: header label, row lookup key and whether a footer total is rendered.
///
/// The RDL only declares `label` and `key`; `show_total` is a rendering concern set when the
/// executor is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Display header.
    pub label: String,
    /// Lookup key into a [`Row`].
    pub key: String,
    /// Whether to aggregate this column into a footer total.
    #[serde(default)]
    pub show_total: bool,
}

impl Column {
    /// Create a column without a footer total.
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
            show_total: false,
        }
    }

    /// Enable the footer total for this column.
    pub fn with_total(mut self) -> Self {
        self.show_total = true;
        self
    }
}
