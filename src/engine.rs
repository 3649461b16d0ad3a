//! Traversal engine.
//!
//! One pre-order, depth-first walk produces both the ordered leaves of a
//! structure and its [`Shape`]. Every other operation is built on it.
//!
//! ## Algorithm
//!
//! For each node:
//!
//! 1. `Null` contributes no leaves and records `Shape::Empty`
//! 2. If the atomic predicate holds, the node is a leaf
//! 3. Otherwise the classifier decides; containers recurse into their
//!    children in canonical order
//!
//! ## Determinism Guarantees
//!
//! - Same structure + same predicate → identical leaf order and shape
//! - Leaf order never depends on leaf values

use crate::atomic::{IsAtomic, Scalar};
use crate::classify::{view, Node};
use crate::error::NestError;
use crate::types::{Path, Shape, Value};

/// Result of one traversal: the skeleton and the leaves in canonical order.
#[derive(Debug, Clone)]
pub struct Traversal<'a, T> {
    /// Structural skeleton.
    pub shape: Shape,
    /// Leaf nodes in canonical order.
    pub leaves: Vec<&'a Value<T>>,
}

/// Walk `value` once, collecting its shape and leaves.
pub fn traverse<'a, T, A>(value: &'a Value<T>, atomic: &A) -> Traversal<'a, T>
where
    A: IsAtomic<T> + ?Sized,
{
    let mut leaves = Vec::new();
    let shape = descend(value, atomic, &mut leaves);
    tracing::trace!(
        leaves = leaves.len(),
        depth = shape.depth(),
        root = value.kind_name(),
        "Traversed structure"
    );
    Traversal { shape, leaves }
}

fn descend<'a, T, A>(value: &'a Value<T>, atomic: &A, leaves: &mut Vec<&'a Value<T>>) -> Shape
where
    A: IsAtomic<T> + ?Sized,
{
    if value.is_null() {
        return Shape::Empty;
    }
    if atomic.is_atomic(value) {
        leaves.push(value);
        return Shape::Leaf;
    }
    match view(value) {
        Node::Absent => Shape::Empty,
        Node::Leaf(leaf) => {
            leaves.push(leaf);
            Shape::Leaf
        }
        Node::Sequence(style, items) => Shape::Sequence {
            style,
            children: items.iter().map(|c| descend(c, atomic, leaves)).collect(),
        },
        Node::Mapping(map) => Shape::Mapping {
            keys: map.keys().cloned().collect(),
            children: map.values().map(|c| descend(c, atomic, leaves)).collect(),
        },
        Node::Unordered(collection) => Shape::Unordered {
            children: collection.iter().map(|c| descend(c, atomic, leaves)).collect(),
        },
        Node::Record(record) => Shape::Record {
            schema: record.schema().clone(),
            children: record
                .values()
                .iter()
                .map(|c| descend(c, atomic, leaves))
                .collect(),
        },
    }
}

/// Leaves of `value` in canonical order.
///
/// ```rust
/// use nest_kernel::{flatten, Scalar, Value};
///
/// let s = Value::list([
///     Value::leaf(1),
///     Value::tuple([Value::leaf(2), Value::map([("a", Value::leaf(3))]), Value::leaf(4)]),
/// ]);
/// let flat: Vec<_> = flatten(&s, &Scalar).into_iter().cloned().collect();
/// assert_eq!(flat, vec![Value::leaf(1), Value::leaf(2), Value::leaf(3), Value::leaf(4)]);
/// ```
pub fn flatten<'a, T, A>(value: &'a Value<T>, atomic: &A) -> Vec<&'a Value<T>>
where
    A: IsAtomic<T> + ?Sized,
{
    traverse(value, atomic).leaves
}

/// Leaf payloads of `value` under the default predicate.
pub fn leaves<T>(value: &Value<T>) -> Vec<&T> {
    flatten(value, &Scalar)
        .into_iter()
        .filter_map(Value::as_leaf)
        .collect()
}

/// Shape of `value`.
pub fn structure_of<T, A>(value: &Value<T>, atomic: &A) -> Shape
where
    A: IsAtomic<T> + ?Sized,
{
    traverse(value, atomic).shape
}

/// Number of leaves of `value`.
pub fn leaf_count<T, A>(value: &Value<T>, atomic: &A) -> usize
where
    A: IsAtomic<T> + ?Sized,
{
    traverse(value, atomic).leaves.len()
}

/// Reject structures nested deeper than `limit` containers.
///
/// Walks with an explicit stack, so it is safe on input that would overflow
/// the recursive traversal. The reported path is the first container, in
/// canonical order, that sits beyond the limit.
pub fn check_nesting<T>(value: &Value<T>, limit: usize) -> Result<(), NestError> {
    let mut stack: Vec<(&Value<T>, Path)> = vec![(value, Path::root())];
    while let Some((node, path)) = stack.pop() {
        let node = view(node);
        if !node.classification().is_composite() {
            continue;
        }
        if path.len() >= limit {
            tracing::debug!(limit, path = %path, "Nesting guard tripped");
            return Err(NestError::NestingTooDeep { limit, path });
        }
        for (segment, child) in node.entries().into_iter().rev() {
            stack.push((child, path.child(segment)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atomic::has_max_depth;
    use crate::types::{Key, PathSegment, SequenceStyle};

    fn nested() -> Value<i64> {
        Value::map([
            ("b", Value::leaf_list([3, 4])),
            ("a", Value::tuple([Value::leaf(1), Value::Null, Value::leaf_set([2, 1])])),
        ])
    }

    #[test]
    fn test_canonical_order() {
        // keys sorted, set slots sorted, null skipped
        assert_eq!(leaves(&nested()), vec![&1, &1, &2, &3, &4]);
    }

    #[test]
    fn test_shape_matches_leaves() {
        let value = nested();
        let traversal = traverse(&value, &Scalar);
        assert_eq!(traversal.shape.leaf_count(), traversal.leaves.len());
        assert_eq!(
            traversal.shape,
            Shape::Mapping {
                keys: vec![Key::from("a"), Key::from("b")],
                children: vec![
                    Shape::Sequence {
                        style: SequenceStyle::Tuple,
                        children: vec![
                            Shape::Leaf,
                            Shape::Empty,
                            Shape::Unordered { children: vec![Shape::Leaf, Shape::Leaf] },
                        ],
                    },
                    Shape::Sequence {
                        style: SequenceStyle::List,
                        children: vec![Shape::Leaf, Shape::Leaf],
                    },
                ],
            }
        );
    }

    #[test]
    fn test_null_root() {
        let value: Value<i64> = Value::Null;
        assert!(flatten(&value, &Scalar).is_empty());
        assert_eq!(structure_of(&value, &Scalar), Shape::Empty);
    }

    #[test]
    fn test_atomic_root() {
        let value = Value::leaf_list([1, 2]);
        let flat = flatten(&value, &|v: &Value<i64>| v.is_list());
        assert_eq!(flat, vec![&value]);
        assert_eq!(leaf_count(&value, &has_max_depth(1)), 1);
    }

    #[test]
    fn test_empty_containers_have_no_leaves() {
        let value: Value<i64> = Value::list([Value::list([]), Value::map::<&str>([])]);
        assert_eq!(leaf_count(&value, &Scalar), 0);
        assert_eq!(structure_of(&value, &Scalar).depth(), 2);
    }

    #[test]
    fn test_check_nesting() {
        let value = Value::list([Value::leaf(1), Value::list([Value::leaf_list([2])])]);
        assert!(check_nesting(&value, 3).is_ok());

        let err = check_nesting(&value, 2).unwrap_err();
        assert_eq!(
            err,
            NestError::NestingTooDeep {
                limit: 2,
                path: Path::root()
                    .child(PathSegment::Index(1))
                    .child(PathSegment::Index(0)),
            }
        );
        assert!(check_nesting(&Value::leaf(1), 0).is_ok());
        assert!(check_nesting(&Value::<i64>::list([]), 0).is_err());
    }
}
