//! Depth-bounded atomicity.
//!
//! Depth is measured with an inner predicate as the leaf test:
//!
//! - a node the inner predicate marks atomic (or `Null`) has depth 0
//! - a container has depth 1 + the depth of its deepest child
//! - an empty container has depth 1
//!
//! `[1, 2, {'a': 3}]` therefore has depth 2.

use super::{IsAtomic, Scalar};
use crate::classify::{view, Node};
use crate::types::Value;

/// Atomic when a node nests no deeper than `depth`.
///
/// Lets callers keep whole substructures up to a given depth as leaves without
/// writing their own recursion:
///
/// ```rust
/// use nest_kernel::{flatten, has_max_depth, Value};
///
/// let s = Value::list([
///     Value::leaf_list([1, 2]),
///     Value::list([Value::leaf(3), Value::leaf_list([4, 5])]),
/// ]);
/// let flat = flatten(&s, &has_max_depth(1));
/// assert_eq!(
///     flat,
///     vec![&Value::leaf_list([1, 2]), &Value::leaf(3), &Value::leaf_list([4, 5])]
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxDepth<A = Scalar> {
    depth: usize,
    inner: A,
}

impl MaxDepth<Scalar> {
    /// Depth threshold with [`Scalar`] as the leaf test.
    pub fn new(depth: usize) -> Self {
        Self { depth, inner: Scalar }
    }
}

impl<A> MaxDepth<A> {
    /// Depth threshold with a custom leaf test.
    pub fn with_inner(depth: usize, inner: A) -> Self {
        Self { depth, inner }
    }

    /// The threshold.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Predicate that keeps structures of depth `depth` or less atomic.
pub fn has_max_depth(depth: usize) -> MaxDepth<Scalar> {
    MaxDepth::new(depth)
}

impl<T, A: IsAtomic<T>> IsAtomic<T> for MaxDepth<A> {
    fn is_atomic(&self, value: &Value<T>) -> bool {
        within(value, &self.inner, self.depth)
    }
}

/// Whether `value` nests no deeper than `budget`. Stops descending as soon as
/// the budget runs out.
fn within<T, A: IsAtomic<T> + ?Sized>(value: &Value<T>, inner: &A, budget: usize) -> bool {
    if value.is_null() || inner.is_atomic(value) {
        return true;
    }
    match view(value) {
        Node::Absent | Node::Leaf(_) => true,
        node => {
            if budget == 0 {
                return false;
            }
            node.children()
                .into_iter()
                .all(|child| within(child, inner, budget - 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Record, RecordSchema};

    fn record(name: &str, x: Value<i64>, y: Value<i64>) -> Value<i64> {
        let schema = RecordSchema::new(name, ["x", "y"]).unwrap();
        Value::Record(Record::new(schema, vec![x, y]).unwrap())
    }

    #[test]
    fn test_shallow_structures_are_atomic() {
        assert!(has_max_depth(1).is_atomic(&Value::leaf_list([1, 2])));
        assert!(has_max_depth(1).is_atomic(&Value::tuple([Value::leaf(1), Value::leaf(2)])));
        assert!(has_max_depth(1).is_atomic(&record("Point", Value::leaf(1), Value::leaf(2))));
        assert!(has_max_depth(2).is_atomic(&Value::map([(
            "a",
            record("Coordinates", Value::leaf(1), Value::leaf(2)),
        )])));
        assert!(has_max_depth(2).is_atomic(&record(
            "Coordinates",
            Value::leaf(1),
            Value::tuple([Value::leaf(2), Value::leaf(3)]),
        )));
    }

    #[test]
    fn test_deep_structures_are_not_atomic() {
        assert!(!has_max_depth(1).is_atomic(&Value::tuple([
            Value::leaf(1),
            Value::leaf_list([1, 2]),
        ])));
        assert!(!has_max_depth(1).is_atomic(&Value::map([("a", Value::leaf_list([1, 2]))])));
    }

    #[test]
    fn test_zero_depth_matches_scalar() {
        let zero = has_max_depth(0);
        assert!(zero.is_atomic(&Value::leaf(1)));
        assert!(zero.is_atomic(&Value::<i64>::Null));
        assert!(!zero.is_atomic(&Value::<i64>::list([])));
    }

    #[test]
    fn test_empty_container_has_depth_one() {
        assert!(has_max_depth(1).is_atomic(&Value::<i64>::list([])));
        assert!(!has_max_depth(1).is_atomic(&Value::list([Value::<i64>::list([])])));
    }

    #[test]
    fn test_custom_inner_predicate() {
        let lists_are_leaves = MaxDepth::with_inner(0, |v: &Value<i64>| !v.is_tuple());
        assert!(lists_are_leaves.is_atomic(&Value::leaf_list([1, 2])));
        assert!(!lists_are_leaves.is_atomic(&Value::tuple([Value::leaf(1)])));
        assert_eq!(lists_are_leaves.depth(), 0);
    }
}
