//! Fixture tree: the ordered, classified form of a parsed fixture document.
//!
//! A document is a mapping from top-level names (tables, collections, keys) to
//! values. Every value is classified exactly once, when the tree is built:
//!
//! - an object becomes a [`Record`]
//! - an array made only of objects becomes a record sequence
//! - anything else is a leaf, kept as an opaque [`serde_json::Value`]
//!
//! Field order and top-level order are the order of the source document.
//! Builders rely on it to line columns up with their arguments.

use crate::error::ParseError;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Value as JsonValue};

/// A node of the fixture tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Scalar, or a compound that is not made of records (e.g. `[1, 2]`).
    Leaf(JsonValue),
    /// One row / document.
    Record(Record),
    /// Rows of a table, documents of a collection.
    RecordSequence(Vec<Record>),
}

impl Value {
    /// Human readable name of the node shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Leaf(JsonValue::Null) => "null",
            Value::Leaf(JsonValue::Bool(_)) => "boolean",
            Value::Leaf(JsonValue::Number(_)) => "number",
            Value::Leaf(JsonValue::String(_)) => "string",
            Value::Leaf(JsonValue::Array(_)) => "array",
            Value::Leaf(JsonValue::Object(_)) | Value::Record(_) => "record",
            Value::RecordSequence(_) => "record sequence",
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Value::Leaf(_))
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Object(map) => Value::Record(Record::from(map)),
            JsonValue::Array(items) if items.iter().all(JsonValue::is_object) => {
                Value::RecordSequence(
                    items
                        .into_iter()
                        .filter_map(|item| match item {
                            JsonValue::Object(map) => Some(Record::from(map)),
                            _ => None,
                        })
                        .collect(),
                )
            }
            other => Value::Leaf(other),
        }
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Leaf(json) => json,
            Value::Record(record) => JsonValue::Object(record.into()),
            Value::RecordSequence(records) => JsonValue::Array(
                records
                    .into_iter()
                    .map(|record| JsonValue::Object(record.into()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Leaf(json) => json.serialize(serializer),
            Value::Record(record) => record.serialize(serializer),
            Value::RecordSequence(records) => {
                let mut seq = serializer.serialize_seq(Some(records.len()))?;
                for record in records {
                    seq.serialize_element(record)?;
                }
                seq.end()
            }
        }
    }
}

/// Ordered mapping of field name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. The caller is responsible for name uniqueness.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Visit every field in order, consuming the record.
    ///
    /// The first error returned by `visit` stops the walk and is returned as is.
    pub fn walk<E, F>(self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(String, Value) -> Result<(), E>,
    {
        for (name, value) in self.fields {
            visit(name, value)?;
        }
        Ok(())
    }
}

impl From<Map<String, JsonValue>> for Record {
    fn from(map: Map<String, JsonValue>) -> Self {
        map.into_iter()
            .map(|(name, value)| (name, Value::from(value)))
            .collect()
    }
}

impl From<Record> for Map<String, JsonValue> {
    fn from(record: Record) -> Self {
        record
            .fields
            .into_iter()
            .map(|(name, value)| (name, JsonValue::from(value)))
            .collect()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_entries(&self.fields, serializer)
    }
}

/// Root of a parsed fixture document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    entries: Vec<(String, Value)>,
}

impl Tree {
    /// Classify a parsed document. The root must be a mapping.
    pub fn from_json(json: JsonValue) -> Result<Self, ParseError> {
        match json {
            JsonValue::Object(map) => Ok(map
                .into_iter()
                .map(|(name, value)| (name, Value::from(value)))
                .collect()),
            other => Err(ParseError::NotAMapping {
                found: Value::from(other).kind(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Top-level names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Visit every top-level entry in document order, consuming the tree.
    ///
    /// The first error returned by `visit` stops the walk and is returned as is.
    pub fn walk<E, F>(self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(String, Value) -> Result<(), E>,
    {
        for (name, value) in self.entries {
            visit(name, value)?;
        }
        Ok(())
    }
}

impl FromIterator<(String, Value)> for Tree {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_entries(&self.entries, serializer)
    }
}

fn serialize_entries<S: Serializer>(
    entries: &[(String, Value)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (name, value) in entries {
        map.serialize_entry(name, value)?;
    }
    map.end()
}
