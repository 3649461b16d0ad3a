//! Canonical ordering and structural fingerprints.
//!
//! ## Determinism Guarantees
//!
//! - Mapping children are visited in `Key` order (integers before strings)
//! - Record children are visited in declared field order
//! - Unordered collections are sorted once, at construction, with
//!   [`canonical_cmp`]; traversal never re-sorts
//! - Shape fingerprints depend only on the shape, never on leaf values

use std::cmp::Ordering;
use xxhash_rust::xxh64::xxh64;

use crate::types::{Key, SequenceStyle, Shape, Value};

/// Total order over values used to canonicalize unordered collections.
///
/// Nodes of different kinds order by kind (null, leaf, list, tuple, mapping,
/// unordered, record). Nodes of the same kind compare their contents
/// lexicographically; collections compare as sorted multisets, so the order is
/// consistent with collection equality.
pub fn canonical_cmp<T: Ord>(a: &Value<T>, b: &Value<T>) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Leaf(x), Value::Leaf(y)) => x.cmp(y),
        (Value::List(x), Value::List(y)) | (Value::Tuple(x), Value::Tuple(y)) => {
            cmp_sequences(x.iter(), y.iter())
        }
        (Value::Map(x), Value::Map(y)) => {
            for ((kx, vx), (ky, vy)) in x.iter().zip(y.iter()) {
                let ord = kx.cmp(ky).then_with(|| canonical_cmp(vx, vy));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Set(x), Value::Set(y)) => {
            let mut xs: Vec<&Value<T>> = x.iter().collect();
            let mut ys: Vec<&Value<T>> = y.iter().collect();
            xs.sort_by(|p, q| canonical_cmp(p, q));
            ys.sort_by(|p, q| canonical_cmp(p, q));
            cmp_sequences(xs.into_iter(), ys.into_iter())
        }
        (Value::Record(x), Value::Record(y)) => x
            .schema()
            .cmp(y.schema())
            .then_with(|| cmp_sequences(x.values().iter(), y.values().iter())),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank<T>(value: &Value<T>) -> u8 {
    match value {
        Value::Null => 0,
        Value::Leaf(_) => 1,
        Value::List(_) => 2,
        Value::Tuple(_) => 3,
        Value::Map(_) => 4,
        Value::Set(_) => 5,
        Value::Record(_) => 6,
    }
}

fn cmp_sequences<'a, T: Ord + 'a>(
    mut a: impl Iterator<Item = &'a Value<T>>,
    mut b: impl Iterator<Item = &'a Value<T>>,
) -> Ordering {
    loop {
        match (a.next(), b.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = canonical_cmp(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Encode a shape as deterministic bytes.
///
/// Each node is a tag byte followed by its labels and children; lengths are
/// little-endian `u64`.
pub fn shape_to_canonical_bytes(shape: &Shape) -> Vec<u8> {
    let mut bytes = Vec::new();
    encode_shape(shape, &mut bytes);
    bytes
}

fn encode_shape(shape: &Shape, out: &mut Vec<u8>) {
    match shape {
        Shape::Empty => out.push(0),
        Shape::Leaf => out.push(1),
        Shape::Sequence { style, children } => {
            out.push(match style {
                SequenceStyle::List => 2,
                SequenceStyle::Tuple => 3,
            });
            encode_children(children, out);
        }
        Shape::Mapping { keys, children } => {
            out.push(4);
            encode_len(keys.len(), out);
            for key in keys {
                match key {
                    Key::Int(i) => {
                        out.push(0);
                        out.extend_from_slice(&i.to_le_bytes());
                    }
                    Key::Str(s) => {
                        out.push(1);
                        encode_str(s, out);
                    }
                }
            }
            encode_children(children, out);
        }
        Shape::Unordered { children } => {
            out.push(5);
            encode_children(children, out);
        }
        Shape::Record { schema, children } => {
            out.push(6);
            encode_str(schema.name(), out);
            encode_len(schema.len(), out);
            for field in schema.field_names() {
                encode_str(field, out);
            }
            encode_children(children, out);
        }
    }
}

fn encode_children(children: &[Shape], out: &mut Vec<u8>) {
    encode_len(children.len(), out);
    for child in children {
        encode_shape(child, out);
    }
}

fn encode_str(s: &str, out: &mut Vec<u8>) {
    encode_len(s.len(), out);
    out.extend_from_slice(s.as_bytes());
}

fn encode_len(len: usize, out: &mut Vec<u8>) {
    out.extend_from_slice(&(len as u64).to_le_bytes());
}

/// Hash canonical bytes.
pub fn canonical_hash(bytes: &[u8]) -> u64 {
    xxh64(bytes, 0)
}

/// Structural fingerprint of a shape.
pub fn shape_fingerprint(shape: &Shape) -> u64 {
    canonical_hash(&shape_to_canonical_bytes(shape))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_order_before_contents() {
        let leaf = Value::leaf(100);
        let list = Value::leaf_list([0]);
        assert_eq!(canonical_cmp(&Value::Null, &leaf), Ordering::Less);
        assert_eq!(canonical_cmp(&leaf, &list), Ordering::Less);
        assert_eq!(canonical_cmp(&list, &Value::tuple([])), Ordering::Less);
    }

    #[test]
    fn test_sequences_compare_lexicographically() {
        let a = Value::leaf_list([1, 2]);
        let b = Value::leaf_list([1, 3]);
        let c = Value::leaf_list([1, 2, 0]);
        assert_eq!(canonical_cmp(&a, &b), Ordering::Less);
        assert_eq!(canonical_cmp(&a, &c), Ordering::Less);
        assert_eq!(canonical_cmp(&c, &c), Ordering::Equal);
    }

    #[test]
    fn test_sets_compare_as_multisets() {
        use crate::types::UnorderedCollection;
        let sorted = Value::leaf_set([1, 2]);
        let reversed = Value::Set(UnorderedCollection::from_slots(vec![Value::leaf(2), Value::leaf(1)]));
        assert_eq!(canonical_cmp(&sorted, &reversed), Ordering::Equal);
    }

    #[test]
    fn test_key_bytes_distinguish_int_and_str() {
        let int_keys = Shape::Mapping { keys: vec![Key::from(1)], children: vec![Shape::Leaf] };
        let str_keys = Shape::Mapping { keys: vec![Key::from("1")], children: vec![Shape::Leaf] };
        assert_ne!(shape_fingerprint(&int_keys), shape_fingerprint(&str_keys));
    }

    #[test]
    fn test_determinism() {
        let shape = Shape::Sequence {
            style: SequenceStyle::Tuple,
            children: vec![Shape::Leaf, Shape::Empty],
        };
        let h1 = shape_fingerprint(&shape);
        let h2 = shape_fingerprint(&shape);
        assert_eq!(h1, h2);
    }
}
