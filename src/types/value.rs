//! The nested value tree.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use super::collection::UnorderedCollection;
use super::key::Key;
use super::record::{Record, RecordLike, RecordSchema};
use super::shape::SequenceStyle;
use crate::error::NestError;

/// An arbitrarily nested structure over leaf payloads of type `T`.
///
/// The set of container kinds is closed. Leaf payloads are opaque to the
/// kernel: a `Leaf(String)` is one leaf, never a sequence of characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<T> {
    /// Absent structure. Contributes no leaves.
    ///
    /// Null is deliberately not a leaf, so `same_structure` of `Leaf(3)` and
    /// `Null` is false.
    Null,
    /// An atomic payload.
    Leaf(T),
    /// Positional sequence.
    List(Vec<Value<T>>),
    /// Positional sequence with tuple style.
    Tuple(Vec<Value<T>>),
    /// Key-value mapping, visited in key order.
    Map(BTreeMap<Key, Value<T>>),
    /// Unordered collection, visited in canonical slot order.
    Set(UnorderedCollection<T>),
    /// Fixed-field record, visited in declared field order.
    Record(Record<T>),
}

impl<T> Value<T> {
    /// Create a leaf.
    pub fn leaf(payload: T) -> Self {
        Self::Leaf(payload)
    }

    /// Create a list from values.
    pub fn list(items: impl IntoIterator<Item = Value<T>>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Create a tuple from values.
    pub fn tuple(items: impl IntoIterator<Item = Value<T>>) -> Self {
        Self::Tuple(items.into_iter().collect())
    }

    /// Create a mapping from key-value pairs. Later duplicates win.
    pub fn map<K: Into<Key>>(entries: impl IntoIterator<Item = (K, Value<T>)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Create a list of leaves.
    pub fn leaf_list(payloads: impl IntoIterator<Item = T>) -> Self {
        Self::List(payloads.into_iter().map(Self::Leaf).collect())
    }

    /// Create a record value from a typed record.
    ///
    /// Fails with `InvalidSchema` when `R::FIELDS` repeats a name and with
    /// `RecordArity` when `into_values` does not yield one value per field.
    pub fn from_record<R: RecordLike<T>>(record: R) -> Result<Self, NestError> {
        let schema = RecordSchema::of::<R, T>()?;
        Ok(Self::Record(Record::new(schema, record.into_values())?))
    }

    /// Lower a record value back into a typed record.
    ///
    /// Fails with `UnsupportedContainerKind` when this node is not a record with
    /// `R`'s name and field order.
    pub fn into_record<R: RecordLike<T>>(self) -> Result<R, NestError> {
        match self {
            Self::Record(record) if record.schema().matches::<R, T>() => {
                R::from_values(record.into_values())
            }
            other => Err(NestError::unsupported(
                format!("record {}", R::NAME),
                other.describe(),
            )),
        }
    }

    /// Take the leaf payload, failing for any other node.
    pub fn try_into_leaf(self) -> Result<T, NestError> {
        match self {
            Self::Leaf(payload) => Ok(payload),
            other => Err(NestError::unsupported("leaf", other.describe())),
        }
    }

    /// Take the leaf payload if this is a leaf.
    pub fn into_leaf(self) -> Option<T> {
        match self {
            Self::Leaf(payload) => Some(payload),
            _ => None,
        }
    }

    /// Borrow the leaf payload if this is a leaf.
    pub fn as_leaf(&self) -> Option<&T> {
        match self {
            Self::Leaf(payload) => Some(payload),
            _ => None,
        }
    }

    /// Mapping capability: entries in key order.
    pub fn as_mapping(&self) -> Option<&BTreeMap<Key, Value<T>>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Unordered-collection capability.
    pub fn as_unordered(&self) -> Option<&UnorderedCollection<T>> {
        match self {
            Self::Set(collection) => Some(collection),
            _ => None,
        }
    }

    /// Fixed-record capability.
    pub fn as_record(&self) -> Option<&Record<T>> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Sequence capability: style and positional elements.
    pub fn as_sequence(&self) -> Option<(SequenceStyle, &[Value<T>])> {
        match self {
            Self::List(items) => Some((SequenceStyle::List, items)),
            Self::Tuple(items) => Some((SequenceStyle::Tuple, items)),
            _ => None,
        }
    }

    /// Look up a mapping entry.
    pub fn get(&self, key: impl Into<Key>) -> Option<&Value<T>> {
        self.as_mapping().and_then(|map| map.get(&key.into()))
    }

    /// Look up a sequence element.
    pub fn at(&self, index: usize) -> Option<&Value<T>> {
        self.as_sequence().and_then(|(_, items)| items.get(index))
    }

    /// Look up a record field.
    pub fn field(&self, name: &str) -> Option<&Value<T>> {
        self.as_record().and_then(|record| record.get(name))
    }

    /// Whether this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Whether this is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Whether this is a tuple.
    pub fn is_tuple(&self) -> bool {
        matches!(self, Self::Tuple(_))
    }

    /// Whether this is a mapping.
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Whether this is an unordered collection.
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// Whether this is a record.
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Short name of the node kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Leaf(_) => "leaf",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "mapping",
            Self::Set(_) => "unordered",
            Self::Record(_) => "record",
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Record(record) => format!("record {}", record.schema().name()),
            other => other.kind_name().to_string(),
        }
    }
}

impl<T: Ord> Value<T> {
    /// Create an unordered collection. Elements are put into canonical order
    /// and duplicates are removed.
    pub fn set(items: impl IntoIterator<Item = Value<T>>) -> Self {
        Self::Set(UnorderedCollection::new(items))
    }

    /// Create an unordered collection of leaves.
    pub fn leaf_set(payloads: impl IntoIterator<Item = T>) -> Self {
        Self::set(payloads.into_iter().map(Self::Leaf))
    }
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Self::Null
    }
}

impl<T> FromIterator<Value<T>> for Value<T> {
    fn from_iter<I: IntoIterator<Item = Value<T>>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

/// Serializes as plain nested data: sequences and collections as arrays,
/// mappings and records as maps, `Null` as unit.
impl<T: Serialize> Serialize for Value<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Leaf(payload) => payload.serialize(serializer),
            Self::List(items) | Self::Tuple(items) => serializer.collect_seq(items),
            Self::Set(collection) => serializer.collect_seq(collection.iter()),
            Self::Map(map) => serializer.collect_map(map.iter().map(|(k, v)| (k.to_string(), v))),
            Self::Record(record) => serializer.collect_map(record.fields()),
        }
    }
}
