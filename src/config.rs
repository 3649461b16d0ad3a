//! Configuration and the configured handle.
//!
//! The free functions in this crate take every option as an argument. A
//! [`Nester`] bundles a [`NestConfig`] with an atomic predicate so callers can
//! set them once, and enforces the optional nesting guard before each
//! operation.

use serde::{Deserialize, Serialize};

use crate::atomic::{IsAtomic, Scalar};
use crate::compare;
use crate::engine::{self, check_nesting};
use crate::error::NestError;
use crate::ops;
use crate::pack;
use crate::types::{Shape, Value};

/// Nesting guard used by [`NestConfig::untrusted`].
pub const DEFAULT_MAX_NESTING: usize = 128;

/// Options for a [`Nester`].
///
/// ## Parameters
///
/// - `keep_structure`: whether filter keeps containers left empty
/// - `max_nesting`: reject input nested deeper than this many containers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NestConfig {
    /// Keep empty containers when filtering.
    pub keep_structure: bool,
    /// Maximum container nesting accepted, or `None` for no guard.
    pub max_nesting: Option<usize>,
}

impl NestConfig {
    /// Create a config.
    pub fn new(keep_structure: bool, max_nesting: Option<usize>) -> Self {
        Self { keep_structure, max_nesting }
    }

    /// Filter drops containers left empty.
    pub fn pruning() -> Self {
        Self { keep_structure: false, ..Self::default() }
    }

    /// Guard against deeply nested input before recursing into it.
    pub fn untrusted() -> Self {
        Self { max_nesting: Some(DEFAULT_MAX_NESTING), ..Self::default() }
    }
}

impl Default for NestConfig {
    fn default() -> Self {
        Self { keep_structure: true, max_nesting: None }
    }
}

/// Nesting operations with a fixed configuration and atomic predicate.
///
/// ```rust
/// use nest_kernel::{has_max_depth, NestConfig, Nester, Value};
///
/// let nester = Nester::new(NestConfig::untrusted()).with_atomic(has_max_depth(1));
/// let s = Value::list([Value::leaf_list([1, 2]), Value::leaf_list([3])]);
/// assert_eq!(nester.leaf_count(&s).unwrap(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Nester<A = Scalar> {
    config: NestConfig,
    atomic: A,
}

impl Nester<Scalar> {
    /// Handle with the default predicate.
    pub fn new(config: NestConfig) -> Self {
        Self { config, atomic: Scalar }
    }

    /// Handle with the default config and predicate.
    pub fn scalar() -> Self {
        Self::new(NestConfig::default())
    }
}

impl<A> Nester<A> {
    /// Replace the atomic predicate.
    pub fn with_atomic<B>(self, atomic: B) -> Nester<B> {
        Nester { config: self.config, atomic }
    }

    /// The configuration.
    pub fn config(&self) -> &NestConfig {
        &self.config
    }

    /// The atomic predicate.
    pub fn atomic(&self) -> &A {
        &self.atomic
    }

    /// Enforce the nesting guard, if one is configured.
    pub fn guard<T>(&self, value: &Value<T>) -> Result<(), NestError> {
        match self.config.max_nesting {
            Some(limit) => check_nesting(value, limit),
            None => Ok(()),
        }
    }

    /// Guarded [`engine::flatten`].
    pub fn flatten<'a, T>(&self, value: &'a Value<T>) -> Result<Vec<&'a Value<T>>, NestError>
    where
        A: IsAtomic<T>,
    {
        self.guard(value)?;
        Ok(engine::flatten(value, &self.atomic))
    }

    /// Guarded [`engine::structure_of`].
    pub fn structure<T>(&self, value: &Value<T>) -> Result<Shape, NestError>
    where
        A: IsAtomic<T>,
    {
        self.guard(value)?;
        Ok(engine::structure_of(value, &self.atomic))
    }

    /// Guarded [`engine::leaf_count`].
    pub fn leaf_count<T>(&self, value: &Value<T>) -> Result<usize, NestError>
    where
        A: IsAtomic<T>,
    {
        self.guard(value)?;
        Ok(engine::leaf_count(value, &self.atomic))
    }

    /// Guarded [`pack::pack`].
    pub fn pack<T, U>(&self, structure: &Value<T>, flat: Vec<Value<U>>) -> Result<Value<U>, NestError>
    where
        A: IsAtomic<T>,
    {
        self.guard(structure)?;
        pack::pack(structure, flat, &self.atomic)
    }

    /// Guarded [`ops::map`].
    pub fn map<T, U, F>(&self, value: &Value<T>, f: F) -> Result<Value<U>, NestError>
    where
        A: IsAtomic<T>,
        F: FnMut(&Value<T>) -> Value<U>,
    {
        self.guard(value)?;
        Ok(ops::map(value, &self.atomic, f))
    }

    /// Guarded [`ops::try_map`].
    pub fn try_map<T, U, F, E>(&self, value: &Value<T>, f: F) -> Result<Value<U>, E>
    where
        A: IsAtomic<T>,
        F: FnMut(&Value<T>) -> Result<Value<U>, E>,
        E: From<NestError>,
    {
        self.guard(value)?;
        ops::try_map(value, &self.atomic, f)
    }

    /// Guarded [`ops::filter`], honoring `keep_structure`.
    pub fn filter<T, P>(&self, value: &Value<T>, keep: P) -> Result<Value<T>, NestError>
    where
        T: Clone,
        A: IsAtomic<T>,
        P: FnMut(&Value<T>) -> bool,
    {
        self.guard(value)?;
        Ok(ops::filter(value, &self.atomic, self.config.keep_structure, keep))
    }

    /// Guarded [`ops::try_filter`], honoring `keep_structure`.
    pub fn try_filter<T, P, E>(&self, value: &Value<T>, keep: P) -> Result<Value<T>, E>
    where
        T: Clone,
        A: IsAtomic<T>,
        P: FnMut(&Value<T>) -> Result<bool, E>,
        E: From<NestError>,
    {
        self.guard(value)?;
        ops::try_filter(value, &self.atomic, self.config.keep_structure, keep)
    }

    /// Guarded [`ops::reduce`].
    pub fn reduce<T, F>(&self, value: &Value<T>, f: F) -> Result<Value<T>, NestError>
    where
        T: Clone,
        A: IsAtomic<T>,
        F: FnMut(Value<T>, &Value<T>) -> Value<T>,
    {
        self.guard(value)?;
        ops::reduce(value, &self.atomic, f)
    }

    /// Guarded [`compare::assert_same_structure`].
    pub fn assert_same_structure<T, U>(&self, left: &Value<T>, right: &Value<U>) -> Result<(), NestError>
    where
        A: IsAtomic<T> + IsAtomic<U>,
    {
        self.guard(left)?;
        self.guard(right)?;
        compare::assert_same_structure(left, right, &self.atomic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Path, PathSegment};

    fn deep(levels: usize) -> Value<i64> {
        let mut value = Value::leaf(0);
        for _ in 0..levels {
            value = Value::list([value]);
        }
        value
    }

    #[test]
    fn test_presets() {
        assert_eq!(NestConfig::default(), NestConfig::new(true, None));
        assert!(!NestConfig::pruning().keep_structure);
        assert_eq!(NestConfig::untrusted().max_nesting, Some(DEFAULT_MAX_NESTING));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: NestConfig = serde_json::from_str(r#"{"max_nesting": 8}"#).unwrap();
        assert_eq!(config, NestConfig::new(true, Some(8)));
    }

    #[test]
    fn test_guard_rejects_deep_input() {
        let nester = Nester::new(NestConfig::new(true, Some(2)));
        assert_eq!(nester.leaf_count(&deep(2)).unwrap(), 1);

        let err = nester.flatten(&deep(3)).unwrap_err();
        assert_eq!(
            err,
            NestError::NestingTooDeep {
                limit: 2,
                path: Path::root().child(PathSegment::Index(0)).child(PathSegment::Index(0)),
            }
        );
    }

    #[test]
    fn test_filter_uses_keep_structure() {
        let value = Value::list([Value::leaf_list([1]), Value::leaf_list([2])]);
        let odd = |v: &Value<i64>| v.as_leaf().map_or(false, |x| x % 2 == 1);

        let kept = Nester::scalar().filter(&value, odd).unwrap();
        assert_eq!(kept, Value::list([Value::leaf_list([1]), Value::list([])]));

        let pruned = Nester::new(NestConfig::pruning()).filter(&value, odd).unwrap();
        assert_eq!(pruned, Value::list([Value::leaf_list([1])]));
    }

    #[test]
    fn test_with_atomic() {
        let nester = Nester::scalar().with_atomic(|v: &Value<i64>| v.is_list());
        let value = Value::tuple([Value::leaf_list([1, 2]), Value::leaf(3)]);
        let packed = nester
            .pack(&value, vec![Value::leaf(0), Value::leaf(1)])
            .unwrap();
        assert_eq!(packed, Value::tuple([Value::leaf(0), Value::leaf(1)]));
        assert!(nester.assert_same_structure(&value, &packed).is_ok());
        assert!(Nester::scalar().assert_same_structure(&value, &packed).is_err());
    }
}
