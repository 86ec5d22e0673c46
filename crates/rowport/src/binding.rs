use rustc_hash::FxHashMap;

use rowport_common::{CellValue, ColumnRef, Schema, SchemaError};

use crate::reader::RawRow;

/// One schema column resolved to a concrete sheet position. `column` is
/// `None` only for optional name-bound fields that found no header match;
/// such fields always read as absent.
#[derive(Debug, Clone)]
pub(crate) struct BoundColumn {
    pub spec: usize,
    pub column: Option<u32>,
}

/// Where one normalized header name was seen. Duplicated names are legal in
/// a document as long as no schema field tries to bind them.
#[derive(Debug, Clone, Copy)]
enum HeaderMatch {
    Unique(u32),
    Duplicated(u32, u32),
}

/// The schema resolved against one concrete document: every field pinned to
/// its 1-based column, in declaration order. Immutable after construction,
/// so it is safe to share for the duration of the call.
#[derive(Debug, Clone)]
pub(crate) struct SchemaBinding {
    fields: Vec<BoundColumn>,
}

impl SchemaBinding {
    /// Resolve the declared columns, using the header row when present.
    /// Header text matches case-insensitively after trimming. Fails before
    /// any data row is read if a required column cannot be pinned, a bound
    /// header name appears more than once, or two fields land on the same
    /// column.
    pub fn resolve(schema: &Schema, header: Option<&RawRow>) -> Result<Self, SchemaError> {
        let header_index = header.map(Self::index_header);

        let mut fields: Vec<BoundColumn> = Vec::with_capacity(schema.len());
        for (spec_idx, spec) in schema.columns().iter().enumerate() {
            let column = match &spec.column {
                ColumnRef::Index(i) => Some(*i),
                ColumnRef::Name(name) => {
                    let found = header_index
                        .as_ref()
                        .and_then(|idx| idx.get(name.trim().to_lowercase().as_str()))
                        .copied();
                    match found {
                        Some(HeaderMatch::Unique(col)) => Some(col),
                        Some(HeaderMatch::Duplicated(first, second)) => {
                            return Err(SchemaError::AmbiguousHeader {
                                name: name.trim().to_string(),
                                field: spec.field.clone(),
                                first,
                                second,
                            });
                        }
                        None if spec.required => {
                            return Err(SchemaError::MissingRequiredColumn {
                                field: spec.field.clone(),
                                column: spec.column.to_string(),
                            });
                        }
                        None => None,
                    }
                }
            };

            if let Some(col) = column {
                for bound in fields.iter() {
                    if bound.column == Some(col) {
                        return Err(SchemaError::AmbiguousColumn {
                            column: ColumnRef::Index(col).to_string(),
                            first: schema.columns()[bound.spec].field.clone(),
                            second: spec.field.clone(),
                        });
                    }
                }
            }

            fields.push(BoundColumn {
                spec: spec_idx,
                column,
            });
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[BoundColumn] {
        &self.fields
    }

    /// Map normalized header text to its 1-based column. Duplicated names
    /// are recorded, not rejected: the conflict only matters if a schema
    /// field binds one of them.
    fn index_header(row: &RawRow) -> FxHashMap<String, HeaderMatch> {
        let mut index = FxHashMap::default();
        for (ci, cell) in row.cells().iter().enumerate() {
            let text = match cell {
                CellValue::Text(s) => s.trim().to_lowercase(),
                CellValue::Empty => continue,
                other => other.to_string().trim().to_lowercase(),
            };
            if text.is_empty() {
                continue;
            }
            let col = ci as u32 + 1;
            index
                .entry(text)
                .and_modify(|m| {
                    if let HeaderMatch::Unique(first) = *m {
                        *m = HeaderMatch::Duplicated(first, col);
                    }
                })
                .or_insert(HeaderMatch::Unique(col));
        }
        index
    }
}
