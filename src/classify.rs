//! Container classification.
//!
//! The classifier asks each value, in a fixed priority order, whether it exposes
//! a container capability:
//!
//! ```text
//! Mapping > UnorderedCollection > FixedRecord > Sequence > Leaf
//! ```
//!
//! The first capability found wins. Classification ignores caller predicates;
//! those are consulted by the traversal engine before the classifier runs.

use std::collections::BTreeMap;

use crate::types::{
    ContainerKind, Key, PathSegment, Record, SequenceStyle, UnorderedCollection, Value,
};

/// What the classifier decided about a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// `Null`: no structure at all.
    Absent,
    /// An atomic payload.
    Leaf,
    /// A container of a known kind.
    Composite(ContainerKind),
}

impl Classification {
    /// Whether the value is a container.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }
}

/// A classified value with borrowed access to its children.
#[derive(Debug)]
pub enum Node<'a, T> {
    /// `Null`.
    Absent,
    /// An atomic value.
    Leaf(&'a Value<T>),
    /// A sequence with its style and elements.
    Sequence(SequenceStyle, &'a [Value<T>]),
    /// A mapping.
    Mapping(&'a BTreeMap<Key, Value<T>>),
    /// An unordered collection.
    Unordered(&'a UnorderedCollection<T>),
    /// A record.
    Record(&'a Record<T>),
}

impl<'a, T> Node<'a, T> {
    /// The classification of this node.
    pub fn classification(&self) -> Classification {
        match self {
            Self::Absent => Classification::Absent,
            Self::Leaf(_) => Classification::Leaf,
            Self::Sequence(..) => Classification::Composite(ContainerKind::Sequence),
            Self::Mapping(_) => Classification::Composite(ContainerKind::Mapping),
            Self::Unordered(_) => {
                Classification::Composite(ContainerKind::UnorderedCollection)
            }
            Self::Record(_) => Classification::Composite(ContainerKind::FixedRecord),
        }
    }

    /// Children with their path segments, in canonical order.
    pub fn entries(&self) -> Vec<(PathSegment, &'a Value<T>)> {
        match self {
            Self::Absent | Self::Leaf(_) => Vec::new(),
            Self::Sequence(_, items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (PathSegment::Index(i), v))
                .collect(),
            Self::Mapping(map) => map
                .iter()
                .map(|(k, v)| (PathSegment::Key(k.clone()), v))
                .collect(),
            Self::Unordered(collection) => collection
                .iter()
                .enumerate()
                .map(|(i, v)| (PathSegment::Index(i), v))
                .collect(),
            Self::Record(record) => record
                .schema()
                .field_names()
                .iter()
                .zip(record.values())
                .map(|(name, v)| (PathSegment::Field(name.clone()), v))
                .collect(),
        }
    }

    /// Children in canonical order.
    pub fn children(&self) -> Vec<&'a Value<T>> {
        match self {
            Self::Absent | Self::Leaf(_) => Vec::new(),
            Self::Sequence(_, items) => items.iter().collect(),
            Self::Mapping(map) => map.values().collect(),
            Self::Unordered(collection) => collection.iter().collect(),
            Self::Record(record) => record.values().iter().collect(),
        }
    }
}

/// Classify a value and expose its children.
pub fn view<T>(value: &Value<T>) -> Node<'_, T> {
    if value.is_null() {
        return Node::Absent;
    }
    if let Some(map) = value.as_mapping() {
        return Node::Mapping(map);
    }
    if let Some(collection) = value.as_unordered() {
        return Node::Unordered(collection);
    }
    if let Some(record) = value.as_record() {
        return Node::Record(record);
    }
    if let Some((style, items)) = value.as_sequence() {
        return Node::Sequence(style, items);
    }
    Node::Leaf(value)
}

/// Classify a value.
pub fn classify<T>(value: &Value<T>) -> Classification {
    view(value).classification()
}
