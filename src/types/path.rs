//! Locations inside a nested structure.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::key::Key;

/// One step from a container to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathSegment {
    /// Position in a sequence, or canonical slot in an unordered collection.
    Index(usize),
    /// Mapping key.
    Key(Key),
    /// Record field name.
    Field(Arc<str>),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "[{}]", i),
            Self::Key(Key::Int(i)) => write!(f, "[{}]", i),
            Self::Key(Key::Str(s)) => write!(f, "[{:?}]", s),
            Self::Field(name) => write!(f, ".{}", name),
        }
    }
}

/// Path from the root of a structure to one of its nodes.
///
/// Renders as `$` followed by its segments, e.g. `$["b"][2].x`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// A new path one step below this one.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    /// Descend one step in place.
    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    /// Ascend one step in place.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    /// Segments from the root.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Number of steps below the root.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.0 {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
