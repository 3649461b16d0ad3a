//! Map, filter and reduce over the leaves of a structure.
//!
//! Each operation visits leaves in canonical order and calls the caller's
//! closure exactly once per leaf it reaches. The fallible `try_*` variants stop
//! at the first error and return it unchanged, with no partial result.

use std::collections::BTreeMap;
use std::convert::Infallible;

use crate::atomic::{IsAtomic, Scalar};
use crate::classify::{view, Node};
use crate::engine::traverse;
use crate::error::NestError;
use crate::pack::rebuild;
use crate::types::{Record, SequenceStyle, UnorderedCollection, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Map
// ─────────────────────────────────────────────────────────────────────────────

/// Replace every leaf with `f(leaf)`, keeping the shape.
pub fn map<T, U, A, F>(structure: &Value<T>, atomic: &A, mut f: F) -> Value<U>
where
    A: IsAtomic<T> + ?Sized,
    F: FnMut(&Value<T>) -> Value<U>,
{
    match try_map(structure, atomic, |leaf| Ok::<_, Infallible>(f(leaf))) {
        Ok(mapped) => mapped,
        Err(never) => match never {},
    }
}

/// Fallible [`map`]. The first error from `f` is returned as is.
pub fn try_map<T, U, A, F, E>(structure: &Value<T>, atomic: &A, f: F) -> Result<Value<U>, E>
where
    A: IsAtomic<T> + ?Sized,
    F: FnMut(&Value<T>) -> Result<Value<U>, E>,
{
    let traversal = traverse(structure, atomic);
    let mapped = traversal
        .leaves
        .into_iter()
        .map(f)
        .collect::<Result<Vec<_>, E>>()?;
    Ok(rebuild(&traversal.shape, &mut mapped.into_iter()))
}

/// Map leaf payloads under the default predicate.
///
/// ```rust
/// use nest_kernel::{map_leaves, Value};
///
/// let s = Value::map([
///     ("a", Value::leaf_list([1, 2])),
///     ("b", Value::tuple([Value::leaf(3), Value::leaf(4), Value::map([("c", Value::leaf(5))])])),
/// ]);
/// assert_eq!(
///     map_leaves(&s, |x| 2 * x),
///     Value::map([
///         ("a", Value::leaf_list([2, 4])),
///         ("b", Value::tuple([Value::leaf(6), Value::leaf(8), Value::map([("c", Value::leaf(10))])])),
///     ])
/// );
/// ```
pub fn map_leaves<T, U, F>(structure: &Value<T>, mut f: F) -> Value<U>
where
    F: FnMut(&T) -> U,
{
    map(structure, &Scalar, |leaf| match leaf.as_leaf() {
        Some(payload) => Value::Leaf(f(payload)),
        None => Value::Null,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter
// ─────────────────────────────────────────────────────────────────────────────

/// Keep only the leaves for which `keep` holds.
///
/// - Sequences and unordered collections drop non-matching children
/// - Mappings drop non-matching keys
/// - Records keep their fields; dropped fields become `Null`
///
/// With `keep_structure`, containers left empty stay in place. Without it, a
/// container whose children were all dropped is dropped from its parent too.
/// A fully dropped root yields `Null`.
pub fn filter<T, A, P>(structure: &Value<T>, atomic: &A, keep_structure: bool, mut keep: P) -> Value<T>
where
    T: Clone,
    A: IsAtomic<T> + ?Sized,
    P: FnMut(&Value<T>) -> bool,
{
    match try_filter(structure, atomic, keep_structure, |leaf| Ok::<_, Infallible>(keep(leaf))) {
        Ok(filtered) => filtered,
        Err(never) => match never {},
    }
}

/// Fallible [`filter`]. The first error from `keep` is returned as is.
pub fn try_filter<T, A, P, E>(
    structure: &Value<T>,
    atomic: &A,
    keep_structure: bool,
    mut keep: P,
) -> Result<Value<T>, E>
where
    T: Clone,
    A: IsAtomic<T> + ?Sized,
    P: FnMut(&Value<T>) -> Result<bool, E>,
{
    let pruned = prune(structure, atomic, keep_structure, &mut keep)?;
    Ok(pruned.unwrap_or_default())
}

/// Filter leaf payloads under the default predicate, keeping empty containers.
pub fn filter_leaves<T, P>(structure: &Value<T>, mut keep: P) -> Value<T>
where
    T: Clone,
    P: FnMut(&T) -> bool,
{
    filter(structure, &Scalar, true, |leaf| leaf.as_leaf().map_or(false, &mut keep))
}

/// `None` means the node was dropped.
fn prune<T, A, P, E>(
    value: &Value<T>,
    atomic: &A,
    keep_structure: bool,
    keep: &mut P,
) -> Result<Option<Value<T>>, E>
where
    T: Clone,
    A: IsAtomic<T> + ?Sized,
    P: FnMut(&Value<T>) -> Result<bool, E>,
{
    if value.is_null() {
        return Ok(None);
    }
    if atomic.is_atomic(value) {
        return Ok(keep(value)?.then(|| value.clone()));
    }
    let survives = |empty: bool| keep_structure || !empty;
    let pruned = match view(value) {
        Node::Absent => None,
        Node::Leaf(leaf) => keep(leaf)?.then(|| leaf.clone()),
        Node::Sequence(style, items) => {
            let kept = prune_children(items.iter(), atomic, keep_structure, keep)?;
            survives(kept.is_empty()).then(|| match style {
                SequenceStyle::List => Value::List(kept),
                SequenceStyle::Tuple => Value::Tuple(kept),
            })
        }
        Node::Unordered(collection) => {
            let kept = prune_children(collection.iter(), atomic, keep_structure, keep)?;
            survives(kept.is_empty()).then(|| Value::Set(UnorderedCollection::from_slots(kept)))
        }
        Node::Mapping(map) => {
            let mut kept = BTreeMap::new();
            for (key, child) in map {
                if let Some(child) = prune(child, atomic, keep_structure, keep)? {
                    kept.insert(key.clone(), child);
                }
            }
            survives(kept.is_empty()).then(|| Value::Map(kept))
        }
        Node::Record(record) => {
            let mut fields = Vec::with_capacity(record.values().len());
            for child in record.values() {
                fields.push(prune(child, atomic, keep_structure, keep)?);
            }
            let all_dropped = fields.iter().all(Option::is_none);
            survives(all_dropped).then(|| {
                Value::Record(Record::from_parts(
                    record.schema().clone(),
                    fields.into_iter().map(Option::unwrap_or_default).collect(),
                ))
            })
        }
    };
    Ok(pruned)
}

fn prune_children<'a, T, A, P, E>(
    children: impl Iterator<Item = &'a Value<T>>,
    atomic: &A,
    keep_structure: bool,
    keep: &mut P,
) -> Result<Vec<Value<T>>, E>
where
    T: Clone + 'a,
    A: IsAtomic<T> + ?Sized,
    P: FnMut(&Value<T>) -> Result<bool, E>,
{
    let mut kept = Vec::new();
    for child in children {
        if let Some(child) = prune(child, atomic, keep_structure, keep)? {
            kept.push(child);
        }
    }
    Ok(kept)
}

// ─────────────────────────────────────────────────────────────────────────────
// Reduce
// ─────────────────────────────────────────────────────────────────────────────

/// Left fold over the leaves, seeded with the first leaf.
///
/// Fails with `EmptyReduce` when the structure has no leaves.
pub fn reduce<T, A, F>(structure: &Value<T>, atomic: &A, mut f: F) -> Result<Value<T>, NestError>
where
    T: Clone,
    A: IsAtomic<T> + ?Sized,
    F: FnMut(Value<T>, &Value<T>) -> Value<T>,
{
    try_reduce(structure, atomic, |acc, leaf| Ok::<_, NestError>(f(acc, leaf)))
}

/// Fallible [`reduce`]. The first error from `f` is returned as is.
pub fn try_reduce<T, A, F, E>(structure: &Value<T>, atomic: &A, mut f: F) -> Result<Value<T>, E>
where
    T: Clone,
    A: IsAtomic<T> + ?Sized,
    F: FnMut(Value<T>, &Value<T>) -> Result<Value<T>, E>,
    E: From<NestError>,
{
    let mut leaves = traverse(structure, atomic).leaves.into_iter();
    let first = leaves.next().ok_or(NestError::EmptyReduce)?;
    leaves.try_fold(first.clone(), |acc, leaf| f(acc, leaf))
}

/// Fold leaf payloads under the default predicate.
///
/// ```rust
/// use nest_kernel::{reduce_leaves, Value};
///
/// let s = Value::map([
///     ("a", Value::leaf_list([1, 2])),
///     ("b", Value::tuple([Value::leaf(3), Value::leaf(4), Value::map([("c", Value::leaf(5))])])),
/// ]);
/// assert_eq!(reduce_leaves(&s, |x, y| x + y).unwrap(), 15);
/// ```
pub fn reduce_leaves<T, F>(structure: &Value<T>, mut f: F) -> Result<T, NestError>
where
    T: Clone,
    F: FnMut(T, &T) -> T,
{
    let mut leaves = traverse(structure, &Scalar)
        .leaves
        .into_iter()
        .filter_map(Value::as_leaf);
    let first = leaves.next().ok_or(NestError::EmptyReduce)?;
    Ok(leaves.fold(first.clone(), |acc, leaf| f(acc, leaf)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordSchema;

    fn point(x: Value<i64>, y: Value<i64>) -> Value<i64> {
        let schema = RecordSchema::new("Point", ["x", "y"]).unwrap();
        Value::Record(Record::new(schema, vec![x, y]).unwrap())
    }

    fn sample() -> Value<i64> {
        Value::map([
            ("a", Value::leaf_list([1, 2])),
            (
                "b",
                Value::tuple([Value::leaf(3), Value::leaf(4), Value::map([("c", Value::leaf(5))])]),
            ),
        ])
    }

    #[test]
    fn test_map_calls_once_per_leaf_in_order() {
        let mut seen = Vec::new();
        let mapped = map(&sample(), &Scalar, |leaf| {
            seen.push(leaf.clone());
            Value::leaf(leaf.as_leaf().copied().unwrap_or_default().to_string())
        });
        assert_eq!(seen, (1..=5).map(Value::leaf).collect::<Vec<_>>());
        assert_eq!(mapped.get("a"), Some(&Value::leaf_list(["1".to_string(), "2".to_string()])));
    }

    #[test]
    fn test_try_map_fails_fast() {
        let mut calls = 0;
        let result: Result<Value<i64>, String> = try_map(&sample(), &Scalar, |leaf| {
            calls += 1;
            match leaf.as_leaf() {
                Some(3) => Err("three".to_string()),
                Some(x) => Ok(Value::leaf(*x)),
                None => Ok(Value::Null),
            }
        });
        assert_eq!(result, Err("three".to_string()));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_filter_keep_structure() {
        let filtered = filter_leaves(&sample(), |x| *x > 2);
        assert_eq!(
            filtered,
            Value::map([
                ("a", Value::list([])),
                (
                    "b",
                    Value::tuple([Value::leaf(3), Value::leaf(4), Value::map([("c", Value::leaf(5))])]),
                ),
            ])
        );
    }

    #[test]
    fn test_filter_prunes_empty_branches() {
        let filtered = filter(&sample(), &Scalar, false, |v| v.as_leaf().map_or(false, |x| *x > 2));
        assert_eq!(
            filtered,
            Value::map([(
                "b",
                Value::tuple([Value::leaf(3), Value::leaf(4), Value::map([("c", Value::leaf(5))])]),
            )])
        );
    }

    #[test]
    fn test_filter_records_keep_arity() {
        let value = Value::list([point(Value::leaf(10), Value::leaf(11))]);
        let even = |v: &Value<i64>| v.as_leaf().map_or(false, |x| x % 2 == 0);
        assert_eq!(
            filter(&value, &Scalar, false, even),
            Value::list([point(Value::leaf(10), Value::Null)])
        );

        let none = |_: &Value<i64>| false;
        assert_eq!(filter(&value, &Scalar, false, none), Value::Null);
        assert_eq!(
            filter(&value, &Scalar, true, none),
            Value::list([point(Value::Null, Value::Null)])
        );
    }

    #[test]
    fn test_filter_root_leaf() {
        let value = Value::leaf("string");
        assert_eq!(filter_leaves(&value, |s| *s != "string"), Value::Null);
        assert_eq!(filter_leaves(&value, |s| *s == "string"), value);
    }

    #[test]
    fn test_filter_drops_null_children() {
        let value = Value::list([Value::leaf(1), Value::Null]);
        assert_eq!(filter_leaves(&value, |_| true), Value::leaf_list([1]));
    }

    #[test]
    fn test_try_filter_propagates_error() {
        let result: Result<Value<i64>, &str> =
            try_filter(&sample(), &Scalar, true, |_| Err("predicate failed"));
        assert_eq!(result, Err("predicate failed"));
    }

    #[test]
    fn test_reduce() {
        assert_eq!(reduce_leaves(&sample(), |x, y| x + y).unwrap(), 15);
        assert_eq!(reduce_leaves(&Value::leaf(3), |x, y| x + y).unwrap(), 3);
        assert_eq!(
            reduce_leaves(&Value::<i64>::list([]), |x, y| x + y).unwrap_err(),
            NestError::EmptyReduce
        );
        assert_eq!(
            reduce(&Value::<i64>::Null, &Scalar, |acc, _| acc).unwrap_err(),
            NestError::EmptyReduce
        );
    }

    #[derive(Debug, PartialEq)]
    enum FoldError {
        Nest(NestError),
        Overflow,
    }

    impl From<NestError> for FoldError {
        fn from(err: NestError) -> Self {
            Self::Nest(err)
        }
    }

    #[test]
    fn test_try_reduce_errors() {
        let result = try_reduce(&sample(), &Scalar, |_, _| Err(FoldError::Overflow));
        assert_eq!(result, Err(FoldError::Overflow));

        let empty: Value<i64> = Value::list([]);
        let result = try_reduce(&empty, &Scalar, |acc, _| Ok::<_, FoldError>(acc));
        assert_eq!(result, Err(FoldError::Nest(NestError::EmptyReduce)));
    }
}
