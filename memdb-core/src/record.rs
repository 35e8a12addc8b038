//! Record and value types for MemDB
//!
//! This module provides the data carried by a table:
//! - Value: a dynamic cell value with a canonical string form
//! - Row: an explicit field-name → value mapping, used both as the
//!   candidate values for insert/update and as the query shape for lookups
//! - Record: a row accepted into a table together with its stable identity

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable handle identifying one record within a table.
///
/// Handles are allocated by the table on insert and never change or get
/// reused for the lifetime of the table. Index buckets reference records
/// through their handle, so an update never invalidates index entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(u64);

impl RecordId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw handle value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dynamic cell value stored in a record field.
///
/// Equality is typed: `Int(1)` and `Str("1")` are different values even
/// though they share a canonical string form. The canonical form (the
/// `Display` output) is what value fingerprinting hashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// 64-bit integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// String value
    Str(String),
}

impl Value {
    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 (integers coerce)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Get as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

/// Field-name → value mapping built explicitly by the caller.
///
/// Field order is irrelevant; a row is just the set of values it carries.
/// The table validates a row against its schema at the operation boundary,
/// so a row itself places no constraints on which fields are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    values: BTreeMap<String, Value>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Add a field value, consuming and returning the row (builder style)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Add a field value in place, returning the previous value if any
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Get a field value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Check if a field is present
    pub fn contains_field(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate over the field names carried by this row
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    /// Iterate over (field name, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields carried by this row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row carries no fields
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check whether this row and `other` agree on every named field
    pub fn eq_on<I, S>(&self, names: I, other: &Row) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .all(|name| self.get(name.as_ref()) == other.get(name.as_ref()))
    }
}

/// A row accepted into a table, together with its stable identity.
///
/// Records are owned exclusively by the table's record store; index buckets
/// hold `RecordId` handles, never copies, so an update rewrites one record
/// and every index observes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    values: Row,
}

impl Record {
    pub(crate) fn new(id: RecordId, values: Row) -> Self {
        Self { id, values }
    }

    /// Get the record's stable handle
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Get the record's current values
    pub fn values(&self) -> &Row {
        &self.values
    }

    /// Get one field value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Check whether this record agrees with `query` on every field the
    /// query carries
    pub fn matches(&self, query: &Row) -> bool {
        query
            .iter()
            .all(|(name, value)| self.values.get(name) == Some(value))
    }

    /// Replace the record's values wholesale, keeping its identity
    pub(crate) fn replace(&mut self, values: Row) {
        self.values = values;
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, RecordError> {
        serde_json::to_string(self).map_err(|e| RecordError::Serialization(e.to_string()))
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> Result<String, RecordError> {
        serde_json::to_string_pretty(self).map_err(|e| RecordError::Serialization(e.to_string()))
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        serde_json::from_str(json).map_err(|e| RecordError::Deserialization(e.to_string()))
    }
}

/// Record-related errors
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}
