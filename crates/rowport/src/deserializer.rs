use std::marker::PhantomData;
use std::time::Instant;

use rowport_common::{RowError, Schema, SchemaError};

use crate::binding::SchemaBinding;
use crate::coerce::coerce_row;
use crate::error::{DeserializeError, Result};
use crate::model::RowModel;
use crate::options::{DeserializeOptions, RowErrorPolicy};
use crate::reader::WorkbookReader;

/// Everything one `deserialize` call produced: records in source row order,
/// the row-error log in source row order, and wall-clock duration.
#[derive(Debug)]
pub struct DeserializeOutcome<T> {
    pub records: Vec<T>,
    pub errors: Vec<RowError>,
    pub elapsed_ms: u64,
}

/// Deserializes XLSX workbook bytes into records of `T`.
///
/// Construction validates `T`'s schema once; the instance holds no mutable
/// state and can be shared across calls and threads, so "build once per
/// target type and reuse" is plain value sharing.
pub struct ExcelDeserializer<T: RowModel> {
    schema: Schema,
    options: DeserializeOptions,
    _target: PhantomData<fn() -> T>,
}

impl<T: RowModel> ExcelDeserializer<T> {
    pub fn new() -> std::result::Result<Self, SchemaError> {
        Self::with_options(DeserializeOptions::default())
    }

    pub fn with_options(options: DeserializeOptions) -> std::result::Result<Self, SchemaError> {
        let schema = T::schema();
        schema.validate()?;
        Ok(Self {
            schema,
            options,
            _target: PhantomData,
        })
    }

    pub fn options(&self) -> &DeserializeOptions {
        &self.options
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Open the workbook bytes and convert the selected sheet's rows into
    /// records, applying the configured header, coercion, and row-error
    /// policy. Record order matches source row order; skipped rows leave no
    /// gap markers.
    pub fn deserialize(&self, bytes: &[u8]) -> Result<DeserializeOutcome<T>> {
        let _span = tracing::info_span!("deserialize_workbook").entered();
        let started = Instant::now();

        let mut reader = WorkbookReader::open(bytes)?;
        let mut rows = reader.sheet_rows(&self.options.sheet)?.into_iter();
        // The workbook handle is no longer needed once rows are materialized.
        drop(reader);

        let header = if self.options.has_header_row {
            match rows.next() {
                Some(row) => Some(row),
                // Fully empty sheet: nothing to bind against, nothing to read.
                None => return Ok(self.finish(Vec::new(), Vec::new(), started)),
            }
        } else {
            None
        };
        let binding = SchemaBinding::resolve(&self.schema, header.as_ref())?;

        let mut records = Vec::new();
        let mut errors = Vec::new();
        let mut scanned = 0usize;

        for row in rows {
            if let Some(max) = self.options.max_rows {
                if scanned >= max {
                    break;
                }
            }
            scanned += 1;

            if self.options.skip_blank_rows && row.is_blank() {
                continue;
            }

            match coerce_row(&row, &self.schema, &binding, &self.options) {
                Ok(typed) => records.push(T::from_row(typed)),
                Err(err) => match self.options.row_error_policy {
                    RowErrorPolicy::FailFast => {
                        tracing::warn!(row = err.row, %err, "aborting on malformed row");
                        return Err(DeserializeError::Row(err));
                    }
                    RowErrorPolicy::SkipAndReport => errors.push(err),
                },
            }
        }

        Ok(self.finish(records, errors, started))
    }

    fn finish(
        &self,
        records: Vec<T>,
        errors: Vec<RowError>,
        started: Instant,
    ) -> DeserializeOutcome<T> {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            records = records.len(),
            errors = errors.len(),
            elapsed_ms,
            "workbook deserialized"
        );
        DeserializeOutcome {
            records,
            errors,
            elapsed_ms,
        }
    }
}
