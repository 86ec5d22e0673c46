use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::value::CellValue;
use chrono::NaiveDate;

/// Primitive kind a bound column coerces into.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Integer,
    Decimal,
    Text,
    Boolean,
    Date,
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Integer => "integer",
            FieldKind::Decimal => "decimal",
            FieldKind::Text => "text",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
        })
    }
}

/// How a column is identified in the source document: by 1-based position,
/// or by header cell text (matched case-insensitively once the header row
/// is read).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnRef {
    Index(u32),
    Name(String),
}

impl Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Index(i) => write!(f, "#{i}"),
            ColumnRef::Name(n) => write!(f, "`{n}`"),
        }
    }
}

impl From<u32> for ColumnRef {
    fn from(index: u32) -> Self {
        ColumnRef::Index(index)
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self {
        ColumnRef::Name(name)
    }
}

/// One coerced field value, matching its declared [`FieldKind`].
/// `Empty` marks an optional field whose bound cell was blank or unbound.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Decimal(f64),
    Text(String),
    Boolean(bool),
    Date(NaiveDate),
    Empty,
}

/// Custom coercion hook for a single column. Replaces the built-in rules
/// for non-blank cells; returning `None` reports a type mismatch.
pub type Converter = fn(&CellValue) -> Option<FieldValue>;

/// Declarative binding of one source column onto one record field.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub field: String,
    pub column: ColumnRef,
    pub kind: FieldKind,
    pub required: bool,
    pub converter: Option<Converter>,
    /// Per-column date format; falls back to the call-wide option.
    pub date_format: Option<String>,
}

impl ColumnSpec {
    pub fn new(field: impl Into<String>, column: impl Into<ColumnRef>, kind: FieldKind) -> Self {
        Self {
            field: field.into(),
            column: column.into(),
            kind,
            required: true,
            converter: None,
            date_format: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }
}

/// Ordered column→field mapping for one target record type.
///
/// A schema is plain data: building it never touches a document, and an
/// identical declaration always yields an identical schema, so one instance
/// can be shared across calls and threads.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Check the schema's own invariants: field names and column references
    /// must both be unique within one schema.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (i, spec) in self.columns.iter().enumerate() {
            for earlier in &self.columns[..i] {
                if earlier.field == spec.field {
                    return Err(SchemaError::DuplicateField {
                        field: spec.field.clone(),
                    });
                }
                if earlier.column == spec.column {
                    return Err(SchemaError::AmbiguousColumn {
                        column: spec.column.to_string(),
                        first: earlier.field.clone(),
                        second: spec.field.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Push-style construction for [`Schema`]. Declaration order is the order
/// record fields are handed to `RowModel::from_row`.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    columns: Vec<ColumnSpec>,
}

impl SchemaBuilder {
    /// Add a required column.
    pub fn required(
        self,
        field: impl Into<String>,
        column: impl Into<ColumnRef>,
        kind: FieldKind,
    ) -> Self {
        self.push(ColumnSpec::new(field, column, kind))
    }

    /// Add an optional column; a blank or unresolvable cell yields
    /// [`FieldValue::Empty`] instead of a row error.
    pub fn optional(
        self,
        field: impl Into<String>,
        column: impl Into<ColumnRef>,
        kind: FieldKind,
    ) -> Self {
        self.push(ColumnSpec::new(field, column, kind).optional())
    }

    pub fn push(mut self, spec: ColumnSpec) -> Self {
        self.columns.push(spec);
        self
    }

    pub fn finish(self) -> Schema {
        Schema {
            columns: self.columns,
        }
    }
}
