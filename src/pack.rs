//! Reconstruction.
//!
//! Rebuilds a structure from a [`Shape`] and a flat sequence of replacement
//! leaves, consuming the leaves in canonical order.

use crate::atomic::{IsAtomic, Scalar};
use crate::engine::structure_of;
use crate::error::NestError;
use crate::types::{Record, SequenceStyle, Shape, UnorderedCollection, Value};

/// Rebuild `shape` with `flat` as its leaves.
///
/// Fails with `LengthMismatch` unless there is exactly one value per leaf slot.
/// Unordered collections keep the replacement values in slot order.
pub fn reconstruct<U>(shape: &Shape, flat: Vec<Value<U>>) -> Result<Value<U>, NestError> {
    let expected = shape.leaf_count();
    if flat.len() != expected {
        tracing::debug!(
            expected,
            actual = flat.len(),
            shape = shape.kind_name(),
            "Rejected pack: length mismatch"
        );
        return Err(NestError::LengthMismatch { expected, actual: flat.len() });
    }
    Ok(rebuild(shape, &mut flat.into_iter()))
}

/// Rebuild `shape`, drawing leaves from `slots`. Missing leaves become `Null`.
pub(crate) fn rebuild<U, I>(shape: &Shape, slots: &mut I) -> Value<U>
where
    I: Iterator<Item = Value<U>>,
{
    match shape {
        Shape::Empty => Value::Null,
        Shape::Leaf => slots.next().unwrap_or_default(),
        Shape::Sequence { style, children } => {
            let items = rebuild_children(children, slots);
            match style {
                SequenceStyle::List => Value::List(items),
                SequenceStyle::Tuple => Value::Tuple(items),
            }
        }
        Shape::Mapping { keys, children } => Value::Map(
            keys.iter()
                .cloned()
                .zip(rebuild_children(children, slots))
                .collect(),
        ),
        Shape::Unordered { children } => {
            Value::Set(UnorderedCollection::from_slots(rebuild_children(children, slots)))
        }
        Shape::Record { schema, children } => Value::Record(Record::from_parts(
            schema.clone(),
            rebuild_children(children, slots),
        )),
    }
}

fn rebuild_children<U, I>(children: &[Shape], slots: &mut I) -> Vec<Value<U>>
where
    I: Iterator<Item = Value<U>>,
{
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        out.push(rebuild(child, slots));
    }
    out
}

/// Pack `flat` into the structure of `structure`.
///
/// ```rust
/// use nest_kernel::{pack, Scalar, Value};
///
/// let s = Value::map([
///     ("a", Value::leaf_list([1, 2])),
///     ("b", Value::tuple([Value::leaf(3), Value::leaf(4), Value::map([("c", Value::leaf(5))])])),
/// ]);
/// let flat = [2, 4, 6, 8, 10].into_iter().map(Value::leaf).collect();
/// let packed = pack(&s, flat, &Scalar).unwrap();
/// assert_eq!(
///     packed,
///     Value::map([
///         ("a", Value::leaf_list([2, 4])),
///         ("b", Value::tuple([Value::leaf(6), Value::leaf(8), Value::map([("c", Value::leaf(10))])])),
///     ])
/// );
/// ```
pub fn pack<T, U, A>(
    structure: &Value<T>,
    flat: Vec<Value<U>>,
    atomic: &A,
) -> Result<Value<U>, NestError>
where
    A: IsAtomic<T> + ?Sized,
{
    reconstruct(&structure_of(structure, atomic), flat)
}

/// Pack leaf payloads into the structure of `structure` under the default
/// predicate.
pub fn pack_leaves<T, U>(structure: &Value<T>, leaves: Vec<U>) -> Result<Value<U>, NestError> {
    pack(
        structure,
        leaves.into_iter().map(Value::Leaf).collect(),
        &Scalar,
    )
}
