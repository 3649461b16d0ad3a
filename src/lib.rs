//! # nest-kernel
//!
//! Traverse, transform and rebuild arbitrarily nested structures without
//! writing a recursion per shape.
//!
//! ## Core Contract
//!
//! 1. Walk a structure once, in canonical order, to get its leaves and its
//!    [`Shape`]
//! 2. Rebuild any shape from a flat sequence of replacement leaves
//! 3. Compose map, filter, reduce and structural comparison from those two
//!
//! ## Architecture
//!
//! ```text
//! Value ─→ classify ─→ traverse ─→ { leaves, Shape } ─→ map / filter / reduce
//!             ↑                          │
//!        IsAtomic predicate              └─→ reconstruct / pack
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same structure + same atomic predicate → identical leaf order and shape
//! - Mapping children are visited in key order, records in declared field
//!   order, unordered collections in the slot order fixed at construction
//! - Canonical order depends only on the shape, never on leaf values
//! - `pack(s, flatten(s)) == s` for every structure and predicate
//!
//! ## Example
//!
//! ```rust
//! use nest_kernel::{flatten, pack, Scalar, Value};
//!
//! let s = Value::map([
//!     ("a", Value::leaf_list([1, 2])),
//!     ("b", Value::tuple([Value::leaf(3), Value::leaf(4)])),
//! ]);
//! let doubled: Vec<_> = flatten(&s, &Scalar)
//!     .into_iter()
//!     .filter_map(Value::as_leaf)
//!     .map(|x| Value::leaf(x * 2))
//!     .collect();
//! let packed = pack(&s, doubled, &Scalar).unwrap();
//! assert_eq!(packed.get("b"), Some(&Value::tuple([Value::leaf(6), Value::leaf(8)])));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod atomic;
pub mod canonical;
pub mod classify;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod json;
pub mod ops;
pub mod pack;

// Re-exports
pub use types::{
    ContainerKind, Key, Path, PathSegment, Record, RecordLike, RecordSchema, SequenceStyle,
    Shape, UnorderedCollection, Value,
};
pub use atomic::{has_max_depth, AllOf, AnyOf, IsAtomic, MaxDepth, RecordNamed, Scalar};
pub use canonical::{canonical_cmp, canonical_hash, shape_fingerprint, shape_to_canonical_bytes};
pub use classify::{classify, Classification};
pub use compare::{assert_same_shape, assert_same_structure, first_divergence, same_structure, Divergence};
pub use config::{NestConfig, Nester, DEFAULT_MAX_NESTING};
pub use engine::{check_nesting, flatten, leaf_count, leaves, structure_of, traverse, Traversal};
pub use error::NestError;
pub use json::{from_json, to_json, JsonTree};
pub use ops::{
    filter, filter_leaves, map, map_leaves, reduce, reduce_leaves, try_filter, try_map,
    try_reduce,
};
pub use pack::{pack, pack_leaves, reconstruct};

/// Version of the serialized [`Shape`] and canonical byte layout.
/// Increment on any change that alters fingerprints.
pub const SHAPE_SCHEMA_VERSION: &str = "1.0.0";
