//! Unordered collections with a canonical slot order.
//!
//! Native iteration order of an unordered container is unspecified, so a
//! collection fixes its order once, at construction: elements are sorted with
//! [`canonical_cmp`] and exact duplicates are dropped. Traversal reads the slots
//! in that order and never re-sorts, so the visitation order is a property of the
//! container alone. Collections rebuilt by pack or map keep the replacement
//! values in the original slot order and are not re-sorted or deduplicated, so
//! they may hold duplicates. Two equal collections can therefore flatten in
//! different orders: mapping `{1, 2}` through negation yields slots `[-1, -2]`,
//! while `{-1, -2}` built directly has slots `[-2, -1]`.

use std::cmp::Ordering;

use super::value::Value;
use crate::canonical::canonical_cmp;

/// An unordered collection of values.
///
/// Equality is multiset equality: slot order does not matter, and equal
/// collections need not flatten in the same order.
#[derive(Debug, Clone)]
pub struct UnorderedCollection<T> {
    slots: Vec<Value<T>>,
}

impl<T: Ord> UnorderedCollection<T> {
    /// Build a collection, sorting into canonical order and removing duplicates.
    ///
    /// Only this constructor (and [`Value::set`]) deduplicates.
    pub fn new(items: impl IntoIterator<Item = Value<T>>) -> Self {
        let mut slots: Vec<Value<T>> = items.into_iter().collect();
        slots.sort_by(canonical_cmp);
        slots.dedup_by(|a, b| canonical_cmp(a, b) == Ordering::Equal);
        Self { slots }
    }
}

impl<T> UnorderedCollection<T> {
    /// Build a collection that keeps `slots` exactly as given.
    pub(crate) fn from_slots(slots: Vec<Value<T>>) -> Self {
        Self { slots }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Elements in canonical slot order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value<T>> {
        self.slots.iter()
    }

    /// Elements in canonical slot order.
    pub fn slots(&self) -> &[Value<T>] {
        &self.slots
    }

    /// Take the elements in canonical slot order.
    pub fn into_slots(self) -> Vec<Value<T>> {
        self.slots
    }
}

impl<T> Default for UnorderedCollection<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T: PartialEq> PartialEq for UnorderedCollection<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.slots.len() != other.slots.len() {
            return false;
        }
        let mut matched = vec![false; other.slots.len()];
        'outer: for a in &self.slots {
            for (i, b) in other.slots.iter().enumerate() {
                if !matched[i] && a == b {
                    matched[i] = true;
                    continue 'outer;
                }
            }
            return false;
        }
        true
    }
}

impl<T: Eq> Eq for UnorderedCollection<T> {}

impl<'a, T> IntoIterator for &'a UnorderedCollection<T> {
    type Item = &'a Value<T>;
    type IntoIter = std::slice::Iter<'a, Value<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sorts_and_dedups() {
        let set = UnorderedCollection::new([8, 7, 8].map(Value::leaf));
        assert_eq!(set.slots(), &[Value::leaf(7), Value::leaf(8)]);
    }

    #[test]
    fn test_equality_ignores_slot_order() {
        let a = UnorderedCollection::from_slots(vec![Value::leaf(2), Value::leaf(1)]);
        let b = UnorderedCollection::new([1, 2].map(Value::leaf));
        assert_eq!(a, b);

        let c = UnorderedCollection::from_slots(vec![Value::leaf(1), Value::leaf(1)]);
        let d = UnorderedCollection::from_slots(vec![Value::leaf(1), Value::leaf(2)]);
        assert_ne!(c, d);
    }

    #[test]
    fn test_nested_elements_have_canonical_order() {
        let set = UnorderedCollection::new([
            Value::tuple([Value::leaf(2)]),
            Value::leaf(9),
            Value::tuple([Value::leaf(1)]),
        ]);
        assert_eq!(
            set.slots(),
            &[
                Value::leaf(9),
                Value::tuple([Value::leaf(1)]),
                Value::tuple([Value::leaf(2)]),
            ]
        );
    }

    #[test]
    fn test_rebuilt_collection_keeps_slot_order_and_duplicates() {
        let set = Value::leaf_set([1, 2]);
        let negated = crate::map_leaves(&set, |x| -x);
        let direct = Value::leaf_set([-1, -2]);
        assert_eq!(negated, direct);
        assert_eq!(crate::leaves(&negated), vec![&-1, &-2]);
        assert_eq!(crate::leaves(&direct), vec![&-2, &-1]);

        let constant = crate::map_leaves(&set, |_| 0);
        assert_eq!(crate::leaves(&constant), vec![&0, &0]);
        assert_ne!(constant, Value::leaf_set([0]));
    }
}
