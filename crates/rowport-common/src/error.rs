use std::fmt::{self, Display};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Schema-level failures. These surface before any data row is read and
/// always abort the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("column {column} is bound by both `{first}` and `{second}`")]
    AmbiguousColumn {
        column: String,
        first: String,
        second: String,
    },

    /// A name-bound field matched a header name that appears in more than
    /// one sheet column; the binding cannot be pinned deterministically.
    /// Header names the schema never references may repeat freely.
    #[error("header `{name}` for field `{field}` matches both column #{first} and column #{second}")]
    AmbiguousHeader {
        name: String,
        field: String,
        first: u32,
        second: u32,
    },

    #[error("field `{field}` is declared more than once")]
    DuplicateField { field: String },

    #[error("no column resolves for required field `{field}` (looked for {column})")]
    MissingRequiredColumn { field: String, column: String },
}

/// Why a single row failed coercion.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowErrorKind {
    /// A required field's bound cell was blank or unresolvable.
    MissingRequired,
    /// The cell held a value that does not coerce into the declared kind.
    TypeMismatch,
}

impl Display for RowErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RowErrorKind::MissingRequired => "missing required value",
            RowErrorKind::TypeMismatch => "type mismatch",
        })
    }
}

/// One failed row: the first offending column wins, the row is never
/// partially populated. Immutable once created.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row}, column {column}: {kind} (raw value `{raw}`)")]
pub struct RowError {
    /// 1-based row index in the source document.
    pub row: u32,
    /// Display form of the offending column reference.
    pub column: String,
    pub kind: RowErrorKind,
    /// Textual rendering of the raw cell content.
    pub raw: String,
}

impl RowError {
    pub fn new(row: u32, column: impl Into<String>, kind: RowErrorKind, raw: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
            kind,
            raw: raw.into(),
        }
    }
}
