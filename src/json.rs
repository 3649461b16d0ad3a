//! JSON interchange.
//!
//! Arrays become lists, objects become mappings with string keys, `null`
//! becomes [`Value::Null`], and every other JSON value is a leaf. Strings are
//! leaves, never sequences of characters.

use crate::types::{Key, Value};

/// A nested structure whose leaves are JSON scalars.
pub type JsonTree = Value<serde_json::Value>;

/// Lift a JSON document into a nested structure.
pub fn from_json(json: serde_json::Value) -> JsonTree {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Array(items) => Value::List(items.into_iter().map(from_json).collect()),
        serde_json::Value::Object(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (Key::Str(k), from_json(v)))
                .collect(),
        ),
        scalar => Value::Leaf(scalar),
    }
}

/// Lower a nested structure back to JSON.
///
/// Tuples and unordered collections become arrays; records become objects
/// keyed by field name; integer mapping keys are written as strings.
pub fn to_json(tree: &JsonTree) -> serde_json::Value {
    match tree {
        Value::Null => serde_json::Value::Null,
        Value::Leaf(scalar) => scalar.clone(),
        Value::List(items) | Value::Tuple(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect())
        }
        Value::Set(collection) => serde_json::Value::Array(collection.iter().map(to_json).collect()),
        Value::Map(map) => serde_json::Value::Object(
            map.iter().map(|(k, v)| (k.to_string(), to_json(v))).collect(),
        ),
        Value::Record(record) => serde_json::Value::Object(
            record
                .fields()
                .map(|(name, v)| (name.to_string(), to_json(v)))
                .collect(),
        ),
    }
}
