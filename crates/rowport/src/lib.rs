//! Typed record deserialization for XLSX workbooks.
//!
//! Give the engine the raw bytes of a workbook, a [`RowModel`] describing
//! how columns bind onto a record type, and a set of
//! [`DeserializeOptions`]; it returns the records in source row order
//! together with an ordered log of per-row failures and the call's
//! wall-clock duration. Whether a malformed row aborts the call or is
//! skipped and reported is a per-call policy decision.
//!
//! ```no_run
//! use rowport::{DeserializeOptions, ExcelDeserializer, FieldKind, Row, RowModel, Schema};
//!
//! #[derive(Debug, PartialEq)]
//! struct Contact {
//!     name: String,
//!     age: i64,
//! }
//!
//! impl RowModel for Contact {
//!     fn schema() -> Schema {
//!         Schema::builder()
//!             .required("name", "Name", FieldKind::Text)
//!             .required("age", "Age", FieldKind::Integer)
//!             .finish()
//!     }
//!
//!     fn from_row(mut row: Row) -> Self {
//!         Contact {
//!             name: row.take_text(0),
//!             age: row.integer(1),
//!         }
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("contacts.xlsx")?;
//! let deserializer = ExcelDeserializer::<Contact>::new()?;
//! let outcome = deserializer.deserialize(&bytes)?;
//! println!("{} contacts in {} ms", outcome.records.len(), outcome.elapsed_ms);
//! # Ok(())
//! # }
//! ```

mod binding;
mod coerce;
mod deserializer;
mod error;
mod model;
mod options;
mod reader;

pub use deserializer::{DeserializeOutcome, ExcelDeserializer};
pub use error::{DeserializeError, Result};
pub use model::{Row, RowModel};
pub use options::{DeserializeOptions, RowErrorPolicy, SheetSelector};
pub use reader::RawRow;

// Re-export the shared data model for convenience.
pub use rowport_common::{
    CellValue, ColumnRef, ColumnSpec, Converter, FieldKind, FieldValue, RowError, RowErrorKind,
    Schema, SchemaBuilder, SchemaError,
};
