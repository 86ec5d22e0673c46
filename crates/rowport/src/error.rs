use rowport_common::{RowError, SchemaError};
use thiserror::Error;

/// Fatal failures of a `deserialize` call.
///
/// Row-level errors only appear here under the fail-fast policy; under
/// skip-and-report they travel in the outcome's error log instead.
#[derive(Debug, Error)]
pub enum DeserializeError {
    /// The byte buffer is empty or not a valid XLSX container.
    #[error("workbook is unreadable: {0}")]
    Unreadable(String),

    /// The configured sheet selector matched nothing in the workbook.
    #[error("sheet {0} not found in workbook")]
    SheetNotFound(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// First malformed row under `RowErrorPolicy::FailFast`.
    #[error(transparent)]
    Row(#[from] RowError),
}

impl From<calamine::XlsxError> for DeserializeError {
    fn from(err: calamine::XlsxError) -> Self {
        DeserializeError::Unreadable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeserializeError>;
