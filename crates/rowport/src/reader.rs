use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};
use rowport_common::{CellValue, serial_to_datetime};

use crate::error::{DeserializeError, Result};
use crate::options::SheetSelector;

/// One raw source row: its 1-based index in the sheet plus its cells
/// aligned from column 1. Ephemeral — consumed by coercion immediately.
#[derive(Debug, Clone)]
pub struct RawRow {
    index: u32,
    cells: Vec<CellValue>,
}

impl RawRow {
    pub(crate) fn new(index: u32, cells: Vec<CellValue>) -> Self {
        Self { index, cells }
    }

    /// 1-based row index in the source document.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Cell at a 1-based column; columns outside the stored width read as
    /// empty.
    pub fn cell(&self, column: u32) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        if column == 0 {
            return &EMPTY;
        }
        self.cells.get(column as usize - 1).unwrap_or(&EMPTY)
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_blank)
    }
}

/// Read-only view over one XLSX workbook held entirely in memory.
///
/// The handle is scoped to a single `deserialize` call and dropped on every
/// exit path; nothing in it outlives the call.
pub(crate) struct WorkbookReader {
    workbook: Xlsx<Cursor<Vec<u8>>>,
}

impl WorkbookReader {
    /// Open a workbook from raw bytes. An empty buffer or a buffer that is
    /// not a valid XLSX container is unreadable.
    pub fn open(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(DeserializeError::Unreadable(
                "empty byte buffer".to_string(),
            ));
        }
        let workbook = Xlsx::new(Cursor::new(bytes.to_vec()))?;
        Ok(Self { workbook })
    }

    /// Materialize the selected sheet as ordered raw rows. Leading and
    /// trailing empty regions outside the used range are not represented;
    /// row indices stay absolute.
    pub fn sheet_rows(&mut self, selector: &SheetSelector) -> Result<Vec<RawRow>> {
        let name = self.resolve_sheet(selector)?;
        let range = self.workbook.worksheet_range(&name)?;
        Ok(Self::range_to_rows(&range))
    }

    fn resolve_sheet(&self, selector: &SheetSelector) -> Result<String> {
        let names = self.workbook.sheet_names();
        match selector {
            SheetSelector::Index(idx) => names
                .get(*idx)
                .cloned()
                .ok_or_else(|| DeserializeError::SheetNotFound(format!("#{idx}"))),
            SheetSelector::Name(name) => names
                .iter()
                .find(|n| n.as_str() == name)
                .cloned()
                .ok_or_else(|| DeserializeError::SheetNotFound(format!("`{name}`"))),
        }
    }

    fn range_to_rows(range: &Range<Data>) -> Vec<RawRow> {
        // Calamine uses 0-based indexing; sheet coordinates are 1-based.
        let (start_row, start_col) = range.start().unwrap_or_default();

        range
            .rows()
            .enumerate()
            .map(|(ri, row)| {
                let index = start_row + ri as u32 + 1;
                let mut cells = Vec::with_capacity(start_col as usize + row.len());
                cells.resize(start_col as usize, CellValue::Empty);
                cells.extend(row.iter().map(Self::convert_value));
                RawRow::new(index, cells)
            })
            .collect()
    }

    fn convert_value(data: &Data) -> CellValue {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Int(*i),
            Data::Bool(b) => CellValue::Boolean(*b),
            Data::Error(e) => CellValue::Error(e.to_string()),
            Data::DateTime(dt) => CellValue::DateTime(serial_to_datetime(dt.as_f64())),
            Data::DateTimeIso(s) => CellValue::Text(s.clone()),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }
}
