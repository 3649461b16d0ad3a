//! Structural equality.
//!
//! Two structures have the same structure when their shapes agree: same
//! container kinds (sequence styles included), same record schemas, same
//! mapping keys and same child counts, recursively. Leaf values are ignored.
//!
//! The first divergence in canonical order is reported with its [`Path`].

use serde::Serialize;
use std::fmt;

use crate::atomic::IsAtomic;
use crate::engine::structure_of;
use crate::error::NestError;
use crate::types::{Key, Path, RecordSchema, Shape, Value};

/// What differs at the first point two shapes disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Divergence {
    /// Different node kinds.
    Kind {
        /// Kind on the left.
        left: &'static str,
        /// Kind on the right.
        right: &'static str,
    },
    /// Records of different schemas.
    Schema {
        /// Schema on the left.
        left: RecordSchema,
        /// Schema on the right.
        right: RecordSchema,
    },
    /// Mappings with different key sets.
    Keys {
        /// Keys on the left, in canonical order.
        left: Vec<Key>,
        /// Keys on the right, in canonical order.
        right: Vec<Key>,
    },
    /// Containers with different child counts.
    Length {
        /// Child count on the left.
        left: usize,
        /// Child count on the right.
        right: usize,
    },
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kind { left, right } => write!(f, "{} vs {}", left, right),
            Self::Schema { left, right } => write!(f, "record {} vs {}", left, right),
            Self::Keys { left, right } => {
                write!(f, "keys [{}] vs [{}]", join_keys(left), join_keys(right))
            }
            Self::Length { left, right } => {
                write!(f, "{} children vs {}", left, right)
            }
        }
    }
}

fn join_keys(keys: &[Key]) -> String {
    keys.iter()
        .map(|k| match k {
            Key::Int(i) => i.to_string(),
            Key::Str(s) => format!("{:?}", s),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// First divergence between two shapes, in canonical order.
pub fn first_divergence(left: &Shape, right: &Shape) -> Option<(Path, Divergence)> {
    let mut path = Path::root();
    diverge(left, right, &mut path).map(|divergence| (path, divergence))
}

/// Leaves `path` pointing at the divergence when one is found.
fn diverge(left: &Shape, right: &Shape, path: &mut Path) -> Option<Divergence> {
    if left.kind_name() != right.kind_name() {
        return Some(Divergence::Kind {
            left: left.kind_name(),
            right: right.kind_name(),
        });
    }
    match (left, right) {
        (Shape::Record { schema: l, .. }, Shape::Record { schema: r, .. }) if l != r => {
            return Some(Divergence::Schema { left: l.clone(), right: r.clone() });
        }
        (Shape::Mapping { keys: l, .. }, Shape::Mapping { keys: r, .. }) if l != r => {
            return Some(Divergence::Keys { left: l.clone(), right: r.clone() });
        }
        _ => {}
    }
    let (lc, rc) = (left.children(), right.children());
    if lc.len() != rc.len() {
        return Some(Divergence::Length { left: lc.len(), right: rc.len() });
    }
    for (i, (l, r)) in lc.iter().zip(rc).enumerate() {
        path.push(left.child_segment(i));
        if let Some(divergence) = diverge(l, r, path) {
            return Some(divergence);
        }
        path.pop();
    }
    None
}

/// Fail with `StructuralMismatch` unless two shapes are equal.
pub fn assert_same_shape(left: &Shape, right: &Shape) -> Result<(), NestError> {
    match first_divergence(left, right) {
        None => Ok(()),
        Some((path, divergence)) => {
            tracing::debug!(path = %path, divergence = %divergence, "Structural mismatch");
            Err(NestError::StructuralMismatch { path, divergence })
        }
    }
}

/// Fail with `StructuralMismatch` unless `left` and `right` have the same
/// structure under `atomic`. Symmetric: swapping the arguments never changes
/// whether it fails.
pub fn assert_same_structure<T, U, A>(
    left: &Value<T>,
    right: &Value<U>,
    atomic: &A,
) -> Result<(), NestError>
where
    A: IsAtomic<T> + IsAtomic<U> + ?Sized,
{
    assert_same_shape(&structure_of(left, atomic), &structure_of(right, atomic))
}

/// Whether `left` and `right` have the same structure under `atomic`.
pub fn same_structure<T, U, A>(left: &Value<T>, right: &Value<U>, atomic: &A) -> bool
where
    A: IsAtomic<T> + IsAtomic<U> + ?Sized,
{
    first_divergence(&structure_of(left, atomic), &structure_of(right, atomic)).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atomic::Scalar;
    use crate::types::PathSegment;

    #[test]
    fn test_leaf_values_are_ignored() {
        let a = Value::map([("a", Value::leaf_list([1, 2]))]);
        let b = Value::map([("a", Value::leaf_list(["x", "y"]))]);
        assert!(assert_same_structure(&a, &b, &Scalar).is_ok());
    }

    #[test]
    fn test_reports_first_divergence_path() {
        let a = Value::map([("a", Value::leaf(1)), ("b", Value::leaf_list([1, 2, 3]))]);
        let b = Value::map([
            ("a", Value::leaf(1)),
            ("b", Value::list([Value::leaf(1), Value::leaf(2), Value::leaf_list([3])])),
        ]);
        let err = assert_same_structure(&a, &b, &Scalar).unwrap_err();
        assert_eq!(
            err,
            NestError::StructuralMismatch {
                path: Path::root()
                    .child(PathSegment::Key(Key::from("b")))
                    .child(PathSegment::Index(2)),
                divergence: Divergence::Kind { left: "leaf", right: "list" },
            }
        );
        assert_eq!(
            err.to_string(),
            "Structural mismatch at $[\"b\"][2]: leaf vs list"
        );
    }

    #[test]
    fn test_style_and_keys_matter() {
        let list = Value::leaf_list([1]);
        let tuple = Value::tuple([Value::leaf(1)]);
        assert!(!same_structure(&list, &tuple, &Scalar));

        let a = Value::map([("a", Value::leaf(1))]);
        let b = Value::map([("b", Value::leaf(1))]);
        let err = assert_same_structure(&a, &b, &Scalar).unwrap_err();
        assert_eq!(err.to_string(), "Structural mismatch at $: keys [\"a\"] vs [\"b\"]");
    }

    #[test]
    fn test_length() {
        let a = Value::leaf_list([1, 2]);
        let b = Value::leaf_list([1, 2, 3]);
        assert!(matches!(
            assert_same_structure(&a, &b, &Scalar),
            Err(NestError::StructuralMismatch { divergence: Divergence::Length { left: 2, right: 3 }, .. })
        ));
        assert!(!same_structure(&b, &a, &Scalar));
    }

    #[test]
    fn test_null_is_not_a_leaf() {
        assert!(same_structure::<i64, i64, _>(&Value::Null, &Value::Null, &Scalar));
        assert!(!same_structure(&Value::leaf(3), &Value::<i64>::Null, &Scalar));
        assert!(!same_structure(&Value::<i64>::list([]), &Value::<i64>::Null, &Scalar));
    }
}
