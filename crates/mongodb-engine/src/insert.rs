//! Fixture collections to MongoDB `insertMany` commands.

use bson::{Bson, Document};
use polluter_core::{BuildError, Command, Tree, Value};
use serde_json::Value as JsonValue;
use std::fmt;
use tracing::debug;

/// Insert every document of a fixture collection in one round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentCommand {
    pub collection: String,
    pub documents: Vec<Document>,
}

impl Command for DocumentCommand {
    fn target(&self) -> &str {
        &self.collection
    }
}

impl fmt::Display for DocumentCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "insertMany {} ({} documents)",
            self.collection,
            self.documents.len()
        )
    }
}

/// Build one [`DocumentCommand`] per top-level collection.
///
/// Each collection is encoded to its canonical JSON bytes and decoded back as
/// extended JSON, so `{"$oid": ...}` and `{"$date": ...}` become native BSON
/// values and integers that fit in 32 bits become `Int32`.
pub fn build_documents(tree: Tree) -> Result<Vec<DocumentCommand>, BuildError> {
    let mut commands = Vec::with_capacity(tree.len());

    tree.walk(|collection, value| {
        if !matches!(value, Value::RecordSequence(_)) {
            return Err(BuildError::NotRecordSequence {
                found: value.kind(),
                name: collection,
            });
        }

        let bytes = serde_json::to_vec(&value).map_err(|source| BuildError::Encode {
            name: collection.clone(),
            source,
        })?;
        let documents = decode_documents(&collection, &bytes)?;
        commands.push(DocumentCommand {
            collection,
            documents,
        });
        Ok(())
    })?;

    debug!("Built {} MongoDB insertMany commands", commands.len());
    Ok(commands)
}

fn decode_documents(collection: &str, bytes: &[u8]) -> Result<Vec<Document>, BuildError> {
    let decode_error = |reason: String| BuildError::Decode {
        name: collection.to_string(),
        reason,
    };

    let json: JsonValue = serde_json::from_slice(bytes).map_err(|e| decode_error(e.to_string()))?;
    if let Some(n) = find_unsigned_overflow(&json) {
        return Err(decode_error(format!(
            "integer {n} does not fit in a signed 64-bit BSON integer"
        )));
    }
    let items = match Bson::try_from(json).map_err(|e| decode_error(e.to_string()))? {
        Bson::Array(items) => items,
        other => {
            return Err(decode_error(format!(
                "expected an array, got {:?}",
                other.element_type()
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Bson::Document(document) => Ok(document),
            other => Err(decode_error(format!(
                "item {i} is {:?}, not a document",
                other.element_type()
            ))),
        })
        .collect()
}

/// First integer above `i64::MAX`. BSON has no unsigned 64-bit type and the
/// extended JSON decoder would turn it into a lossy double.
fn find_unsigned_overflow(value: &JsonValue) -> Option<&serde_json::Number> {
    match value {
        JsonValue::Number(n) if n.is_u64() && !n.is_i64() => Some(n),
        JsonValue::Array(items) => items.iter().find_map(find_unsigned_overflow),
        JsonValue::Object(map) => map.values().find_map(find_unsigned_overflow),
        _ => None,
    }
}
