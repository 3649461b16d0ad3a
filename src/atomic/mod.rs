//! Atomic predicates.
//!
//! An atomic predicate decides where recursion stops. It is consulted before the
//! classifier on every non-null node, root included: when it holds, the node is
//! a leaf even if it is a container.
//!
//! | Predicate | Atomic when |
//! |-----------|-------------|
//! | [`Scalar`] | the classifier finds no container (the default) |
//! | [`MaxDepth`] | the node nests no deeper than a threshold |
//! | [`RecordNamed`] | the node is a record with a given name |
//! | closure | `Fn(&Value<T>) -> bool` returns true |
//! | [`AnyOf`] / [`AllOf`] | either / both inner predicates hold |

pub mod depth;

use std::sync::Arc;

use crate::classify::classify;
use crate::types::Value;

pub use depth::{has_max_depth, MaxDepth};

/// Decides whether a node is a leaf.
pub trait IsAtomic<T> {
    /// Whether `value` is treated as a single leaf.
    fn is_atomic(&self, value: &Value<T>) -> bool;

    /// Atomic when either predicate holds.
    fn or<B: IsAtomic<T>>(self, other: B) -> AnyOf<Self, B>
    where
        Self: Sized,
    {
        AnyOf(self, other)
    }

    /// Atomic when both predicates hold.
    fn and<B: IsAtomic<T>>(self, other: B) -> AllOf<Self, B>
    where
        Self: Sized,
    {
        AllOf(self, other)
    }
}

impl<T, F> IsAtomic<T> for F
where
    F: Fn(&Value<T>) -> bool,
{
    fn is_atomic(&self, value: &Value<T>) -> bool {
        self(value)
    }
}

/// The default predicate: every non-container is atomic.
///
/// Text payloads are leaves like any other payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scalar;

impl<T> IsAtomic<T> for Scalar {
    fn is_atomic(&self, value: &Value<T>) -> bool {
        !classify(value).is_composite()
    }
}

/// Records with a given name are atomic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordNamed(Arc<str>);

impl RecordNamed {
    /// Treat records named `name` as leaves.
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl<T> IsAtomic<T> for RecordNamed {
    fn is_atomic(&self, value: &Value<T>) -> bool {
        value
            .as_record()
            .map_or(false, |record| record.schema().name() == &*self.0)
    }
}

/// Atomic when either inner predicate holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyOf<A, B>(pub A, pub B);

impl<T, A: IsAtomic<T>, B: IsAtomic<T>> IsAtomic<T> for AnyOf<A, B> {
    fn is_atomic(&self, value: &Value<T>) -> bool {
        self.0.is_atomic(value) || self.1.is_atomic(value)
    }
}

/// Atomic when both inner predicates hold.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllOf<A, B>(pub A, pub B);

impl<T, A: IsAtomic<T>, B: IsAtomic<T>> IsAtomic<T> for AllOf<A, B> {
    fn is_atomic(&self, value: &Value<T>) -> bool {
        self.0.is_atomic(value) && self.1.is_atomic(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Record, RecordSchema};

    fn point(x: i64, y: i64) -> Value<i64> {
        let schema = RecordSchema::new("Point", ["x", "y"]).unwrap();
        Value::Record(Record::new(schema, vec![Value::leaf(x), Value::leaf(y)]).unwrap())
    }

    #[test]
    fn test_scalar() {
        assert!(Scalar.is_atomic(&Value::leaf(3)));
        assert!(Scalar.is_atomic(&Value::leaf("string")));
        assert!(Scalar.is_atomic(&Value::<i64>::Null));
        assert!(!Scalar.is_atomic(&Value::<i64>::list([])));
        assert!(!Scalar.is_atomic(&Value::leaf_list([2, 3])));
        assert!(!Scalar.is_atomic(&point(2, 3)));
    }

    #[test]
    fn test_closure() {
        let is_list = |v: &Value<i64>| v.is_list();
        assert!(is_list.is_atomic(&Value::leaf_list([1])));
        assert!(!is_list.is_atomic(&Value::tuple([Value::leaf(1)])));
    }

    #[test]
    fn test_combinators() {
        let points = AnyOf(Scalar, RecordNamed::new("Point"));
        assert!(points.is_atomic(&point(1, 2)));
        assert!(points.is_atomic(&Value::leaf(1)));
        assert!(!points.is_atomic(&Value::leaf_list([1])));

        let never = AllOf(Scalar, RecordNamed::new("Point"));
        assert!(!never.is_atomic(&point(1, 2)));
        assert!(!never.is_atomic(&Value::leaf(1)));

        let via_method = IsAtomic::<i64>::or(RecordNamed::new("Point"), |v: &Value<i64>| v.is_tuple());
        assert!(via_method.is_atomic(&Value::<i64>::tuple([])));
        assert!(via_method.is_atomic(&point(0, 0)));
    }
}
