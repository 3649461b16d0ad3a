//! Core types for the nesting kernel.

pub mod key;
pub mod path;
pub mod value;
pub mod collection;
pub mod record;
pub mod shape;

pub use key::Key;
pub use path::{Path, PathSegment};
pub use value::Value;
pub use collection::UnorderedCollection;
pub use record::{Record, RecordLike, RecordSchema};
pub use shape::{ContainerKind, SequenceStyle, Shape};
