//! Core data model for the rowport engine: untyped cell values, the
//! declarative column→field schema, and the error types shared between
//! schema resolution and row coercion.

pub mod error;
pub mod schema;
pub mod value;

pub use error::{RowError, RowErrorKind, SchemaError};
pub use schema::{ColumnRef, ColumnSpec, Converter, FieldKind, FieldValue, Schema, SchemaBuilder};
pub use value::{CellValue, datetime_to_serial, serial_to_datetime};
