//! Structural skeletons.
//!
//! A [`Shape`] is everything needed to rebuild a structure except its leaf
//! values: container kinds, sequence styles, mapping keys, record schemas and
//! child counts, recursively, in canonical order.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::key::Key;
use super::path::PathSegment;
use super::record::RecordSchema;
use crate::canonical::{shape_fingerprint, shape_to_canonical_bytes};

/// The closed set of container kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Positional, visited as stored.
    Sequence,
    /// Keyed, visited in key order.
    Mapping,
    /// Unkeyed, visited in canonical slot order.
    UnorderedCollection,
    /// Named fields, visited in declared order.
    FixedRecord,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequence => write!(f, "sequence"),
            Self::Mapping => write!(f, "mapping"),
            Self::UnorderedCollection => write!(f, "unordered collection"),
            Self::FixedRecord => write!(f, "fixed record"),
        }
    }
}

/// Flavor of a sequence. Styles are part of the shape: a list and a tuple
/// with the same children are different structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStyle {
    /// Growable list.
    List,
    /// Fixed tuple.
    Tuple,
}

/// Structural skeleton of a value. Carries no leaf values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Absent structure (`Null`): no leaves.
    Empty,
    /// One leaf slot.
    Leaf,
    /// A sequence and its children.
    Sequence {
        /// List or tuple.
        style: SequenceStyle,
        /// Child shapes in position order.
        children: Vec<Shape>,
    },
    /// A mapping and its children.
    Mapping {
        /// Keys in canonical order.
        keys: Vec<Key>,
        /// Child shapes, one per key.
        children: Vec<Shape>,
    },
    /// An unordered collection and its children.
    Unordered {
        /// Child shapes in canonical slot order.
        children: Vec<Shape>,
    },
    /// A record and its children.
    Record {
        /// Record name and field order.
        schema: RecordSchema,
        /// Child shapes in declared field order.
        children: Vec<Shape>,
    },
}

impl Shape {
    /// Container kind, or `None` for `Empty` and `Leaf`.
    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            Self::Empty | Self::Leaf => None,
            Self::Sequence { .. } => Some(ContainerKind::Sequence),
            Self::Mapping { .. } => Some(ContainerKind::Mapping),
            Self::Unordered { .. } => Some(ContainerKind::UnorderedCollection),
            Self::Record { .. } => Some(ContainerKind::FixedRecord),
        }
    }

    /// Short name of this node, distinguishing sequence styles.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Leaf => "leaf",
            Self::Sequence { style: SequenceStyle::List, .. } => "list",
            Self::Sequence { style: SequenceStyle::Tuple, .. } => "tuple",
            Self::Mapping { .. } => "mapping",
            Self::Unordered { .. } => "unordered",
            Self::Record { .. } => "record",
        }
    }

    /// Child shapes in canonical order. Empty for `Empty` and `Leaf`.
    pub fn children(&self) -> &[Shape] {
        match self {
            Self::Empty | Self::Leaf => &[],
            Self::Sequence { children, .. }
            | Self::Mapping { children, .. }
            | Self::Unordered { children }
            | Self::Record { children, .. } => children,
        }
    }

    /// Path segment leading to child `index`.
    pub fn child_segment(&self, index: usize) -> PathSegment {
        match self {
            Self::Mapping { keys, .. } => keys
                .get(index)
                .map(|k| PathSegment::Key(k.clone()))
                .unwrap_or(PathSegment::Index(index)),
            Self::Record { schema, .. } => schema
                .field_names()
                .get(index)
                .map(|f| PathSegment::Field(f.clone()))
                .unwrap_or(PathSegment::Index(index)),
            _ => PathSegment::Index(index),
        }
    }

    /// Whether this is a single leaf slot.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf)
    }

    /// Number of leaf slots.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Leaf => 1,
            _ => self.children().iter().map(Shape::leaf_count).sum(),
        }
    }

    /// Nesting depth: 0 for leaves and empty, 1 + deepest child otherwise.
    pub fn depth(&self) -> usize {
        match self {
            Self::Empty | Self::Leaf => 0,
            _ => 1 + self.children().iter().map(Shape::depth).max().unwrap_or(0),
        }
    }

    /// Deterministic byte encoding of the shape.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        shape_to_canonical_bytes(self)
    }

    /// 64-bit structural fingerprint.
    ///
    /// Equal shapes always have equal fingerprints, so differing fingerprints
    /// prove two structures differ.
    pub fn fingerprint(&self) -> u64 {
        shape_fingerprint(self)
    }

    /// Fingerprint as 16 lowercase hex characters.
    pub fn fingerprint_hex(&self) -> String {
        format!("{:016x}", self.fingerprint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Shape {
        Shape::Mapping {
            keys: vec![Key::from("a"), Key::from("b")],
            children: vec![
                Shape::Sequence {
                    style: SequenceStyle::List,
                    children: vec![Shape::Leaf, Shape::Leaf],
                },
                Shape::Sequence {
                    style: SequenceStyle::Tuple,
                    children: vec![Shape::Leaf, Shape::Empty, Shape::Unordered { children: vec![] }],
                },
            ],
        }
    }

    #[test]
    fn test_leaf_count_and_depth() {
        let shape = sample();
        assert_eq!(shape.leaf_count(), 3);
        assert_eq!(shape.depth(), 3);
        assert_eq!(Shape::Empty.leaf_count(), 0);
        assert_eq!(Shape::Unordered { children: vec![] }.depth(), 1);
    }

    #[test]
    fn test_child_segments() {
        let shape = sample();
        assert_eq!(shape.child_segment(1), PathSegment::Key(Key::from("b")));
        assert_eq!(shape.children()[1].child_segment(2), PathSegment::Index(2));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(Shape::Leaf).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "leaf"}));

        let round_trip: Shape = serde_json::from_value(serde_json::to_value(sample()).unwrap()).unwrap();
        assert_eq!(round_trip, sample());
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(sample().fingerprint(), sample().fingerprint());
        assert_ne!(sample().fingerprint(), Shape::Leaf.fingerprint());
        assert_eq!(sample().fingerprint_hex().len(), 16);
    }
}
