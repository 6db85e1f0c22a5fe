//! Record model: an ordered mapping of field names to scalar values
//!
//! The engine scores caller-supplied records generically, so values are a
//! small closed variant rather than arbitrary JSON. Field order is
//! preserved from ingest and round-trips through serialization.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

/// Scalar value a record field may hold
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Number(f64),
    Bool(bool),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Render the value as searchable text.
    ///
    /// Integral numbers render without a trailing `.0` so `id: 1` matches
    /// the query "1". `Null` renders empty and contributes nothing to
    /// scoring or completions.
    pub fn stringify(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
            FieldValue::Null => String::new(),
        }
    }

    /// Interpret the value as a point in time, if it looks like one.
    ///
    /// Accepts native `DateTime` values and RFC 3339 strings; anything else
    /// is not date-like.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            FieldValue::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Truthiness in the loose sense filter rules use: empty strings,
    /// zero, false, and null are falsy
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::String(s) => !s.is_empty(),
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Bool(b) => *b,
            FieldValue::DateTime(_) => true,
            FieldValue::Null => false,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::DateTime(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            FieldValue::Null => serializer.serialize_unit(),
        }
    }
}

/// A single searchable record: ordered field name → scalar value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Insert a field, replacing any existing field of the same name in place
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Builder-style insert for test and demo construction
    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterate fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The record's `id` field rendered as text, if present
    pub fn id(&self) -> Option<String> {
        self.get("id").map(|v| v.stringify())
    }

    /// Build a record from a JSON object.
    ///
    /// Non-object values yield `None`. Nested arrays and objects have no
    /// scalar rendering, so those fields are skipped rather than aborting
    /// the whole record.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let mut record = Record::new();

        for (name, v) in obj {
            match v {
                Value::String(s) => record.insert(name.clone(), FieldValue::String(s.clone())),
                Value::Number(n) => {
                    if let Some(f) = n.as_f64() {
                        record.insert(name.clone(), FieldValue::Number(f));
                    }
                }
                Value::Bool(b) => record.insert(name.clone(), FieldValue::Bool(*b)),
                Value::Null => record.insert(name.clone(), FieldValue::Null),
                Value::Array(_) | Value::Object(_) => {
                    debug!("Skipping non-scalar field '{}' on ingest", name);
                }
            }
        }

        Some(record)
    }

    /// Build records from a JSON array (or a single object)
    pub fn from_json_many(value: &Value) -> Vec<Record> {
        match value {
            Value::Array(items) => items.iter().filter_map(Record::from_json).collect(),
            other => Record::from_json(other).into_iter().collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
