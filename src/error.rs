//! Error types for nesting operations.
//!
//! Every failure is synchronous and surfaced to the immediate caller. Operations
//! are pure, so retrying with the same input reproduces the same error.
//!
//! Errors raised by caller-supplied closures are not wrapped here: the `try_*`
//! operations return the closure's own error type unmodified.

use crate::compare::Divergence;
use crate::types::Path;

/// Errors produced by the nesting kernel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NestError {
    /// A flat sequence does not have one value per leaf of the target shape.
    #[error("Length mismatch: structure has {expected} leaves, got {actual} values")]
    LengthMismatch {
        /// Leaf count of the target shape.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// Two structures diverge at `path`.
    #[error("Structural mismatch at {path}: {divergence}")]
    StructuralMismatch {
        /// Location of the first divergence in canonical order.
        path: Path,
        /// What differs at that location.
        divergence: Divergence,
    },

    /// A node was lowered into a container type it does not match.
    #[error("Unsupported container kind: expected {expected}, found {found}")]
    UnsupportedContainerKind {
        /// The container the caller asked for.
        expected: String,
        /// What the node actually is.
        found: String,
    },

    /// A record was built with the wrong number of field values.
    #[error("Record {record} has {expected} fields, got {actual} values")]
    RecordArity {
        /// Record name.
        record: String,
        /// Declared field count.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// A record schema is malformed.
    #[error("Invalid schema for record {record}: {reason}")]
    InvalidSchema {
        /// Record name.
        record: String,
        /// Why the schema was rejected.
        reason: String,
    },

    /// Reduce was called on a structure without leaves.
    #[error("Cannot reduce a structure with no leaves")]
    EmptyReduce,

    /// Input nesting exceeds the configured guard.
    #[error("Nesting deeper than {limit} levels at {path}")]
    NestingTooDeep {
        /// Configured maximum nesting.
        limit: usize,
        /// First location found beyond the limit.
        path: Path,
    },
}

impl NestError {
    /// Create an `UnsupportedContainerKind` error.
    pub fn unsupported(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnsupportedContainerKind {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Whether this error reports a structural disagreement between inputs.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::LengthMismatch { .. } | Self::StructuralMismatch { .. }
        )
    }
}
