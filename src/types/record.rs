//! Fixed-field records.
//!
//! A record participates in nesting through its schema: a name plus an ordered
//! list of field names. Any Rust type can join by implementing [`RecordLike`],
//! which supplies the declared field order and per-field values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use super::value::Value;
use crate::error::NestError;

/// Name and declared field order of a record type.
///
/// Cloning is cheap; the name and field list are shared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordSchema {
    name: Arc<str>,
    fields: Arc<[Arc<str>]>,
}

impl RecordSchema {
    /// Create a schema, rejecting duplicate field names.
    pub fn new<S: AsRef<str>>(
        name: &str,
        fields: impl IntoIterator<Item = S>,
    ) -> Result<Self, NestError> {
        let fields: Vec<Arc<str>> = fields.into_iter().map(|f| Arc::from(f.as_ref())).collect();
        let mut seen = BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.clone()) {
                return Err(NestError::InvalidSchema {
                    record: name.to_string(),
                    reason: format!("duplicate field `{}`", field),
                });
            }
        }
        Ok(Self {
            name: Arc::from(name),
            fields: fields.into(),
        })
    }

    /// Schema of a [`RecordLike`] type.
    pub fn of<R: RecordLike<T>, T>() -> Result<Self, NestError> {
        Self::new(R::NAME, R::FIELDS)
    }

    /// Whether this schema is the schema of `R`.
    pub fn matches<R: RecordLike<T>, T>(&self) -> bool {
        &*self.name == R::NAME
            && self.fields.len() == R::FIELDS.len()
            && self.fields.iter().zip(R::FIELDS).all(|(a, b)| &**a == *b)
    }

    /// Record name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field names in declared order.
    pub fn field_names(&self) -> &[Arc<str>] {
        &self.fields
    }

    /// Position of a field in declared order.
    pub fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| &**f == field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", field)?;
        }
        write!(f, ")")
    }
}

/// A record value: one child per declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<T> {
    schema: RecordSchema,
    values: Vec<Value<T>>,
}

impl<T> Record<T> {
    /// Create a record, checking that there is one value per field.
    pub fn new(schema: RecordSchema, values: Vec<Value<T>>) -> Result<Self, NestError> {
        if values.len() != schema.len() {
            return Err(NestError::RecordArity {
                record: schema.name().to_string(),
                expected: schema.len(),
                actual: values.len(),
            });
        }
        Ok(Self { schema, values })
    }

    pub(crate) fn from_parts(schema: RecordSchema, values: Vec<Value<T>>) -> Self {
        Self { schema, values }
    }

    /// The record's schema.
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Field values in declared order.
    pub fn values(&self) -> &[Value<T>] {
        &self.values
    }

    /// Look up a field by name.
    pub fn get(&self, field: &str) -> Option<&Value<T>> {
        self.schema.position(field).and_then(|i| self.values.get(i))
    }

    /// `(field name, value)` pairs in declared order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value<T>)> {
        self.schema
            .field_names()
            .iter()
            .map(|name| &**name)
            .zip(self.values.iter())
    }

    /// Take the field values in declared order.
    pub fn into_values(self) -> Vec<Value<T>> {
        self.values
    }
}

/// Capability contract for record-like types.
///
/// `FIELDS` is the declared field order; `into_values` must yield exactly one
/// value per field in that order, and `from_values` must accept the same layout.
///
/// ```rust
/// use nest_kernel::{NestError, RecordLike, Value};
///
/// struct Point { x: i64, y: i64 }
///
/// impl RecordLike<i64> for Point {
///     const NAME: &'static str = "Point";
///     const FIELDS: &'static [&'static str] = &["x", "y"];
///
///     fn into_values(self) -> Vec<Value<i64>> {
///         vec![Value::leaf(self.x), Value::leaf(self.y)]
///     }
///
///     fn from_values(values: Vec<Value<i64>>) -> Result<Self, NestError> {
///         let mut values = values.into_iter();
///         let x = values.next().unwrap_or_default().try_into_leaf()?;
///         let y = values.next().unwrap_or_default().try_into_leaf()?;
///         Ok(Point { x, y })
///     }
/// }
///
/// let value = Value::from_record(Point { x: 1, y: 2 })?;
/// assert_eq!(nest_kernel::leaves(&value), vec![&1, &2]);
/// # Ok::<(), NestError>(())
/// ```
pub trait RecordLike<T>: Sized {
    /// Record name.
    const NAME: &'static str;
    /// Field names in declared order.
    const FIELDS: &'static [&'static str];

    /// Per-field values in declared order.
    fn into_values(self) -> Vec<Value<T>>;

    /// Rebuild from per-field values in declared order.
    fn from_values(values: Vec<Value<T>>) -> Result<Self, NestError>;
}
