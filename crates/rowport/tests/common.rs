// Shared fixture helpers: build real XLSX workbooks in memory with umya
// and hand their bytes to the engine.

use rowport::{FieldKind, Row, RowModel, Schema};

/// Build a workbook and return its XLSX bytes.
pub fn workbook_bytes(build: impl FnOnce(&mut umya_spreadsheet::Spreadsheet)) -> Vec<u8> {
    let mut book = umya_spreadsheet::new_file();
    build(&mut book);
    let mut cursor = std::io::Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut cursor)
        .expect("write workbook to bytes");
    cursor.into_inner()
}

/// Write a contacts sheet: `Name | Age | Balance | Active | Joined` header
/// in row 1, one row per entry below it. `Joined` is written as text in
/// ISO format.
pub fn contacts_sheet(
    sh: &mut umya_spreadsheet::Worksheet,
    rows: &[(&str, f64, f64, bool, &str)],
) {
    for (ci, title) in ["Name", "Age", "Balance", "Active", "Joined"]
        .iter()
        .enumerate()
    {
        sh.get_cell_mut(((ci + 1) as u32, 1)).set_value(*title);
    }
    for (ri, (name, age, balance, active, joined)) in rows.iter().enumerate() {
        let row = (ri + 2) as u32;
        sh.get_cell_mut((1, row)).set_value(*name);
        sh.get_cell_mut((2, row)).set_value_number(*age);
        sh.get_cell_mut((3, row)).set_value_number(*balance);
        sh.get_cell_mut((4, row)).set_value_bool(*active);
        sh.get_cell_mut((5, row)).set_value(*joined);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub name: String,
    pub age: i64,
    pub balance: f64,
    pub active: bool,
    pub joined: Option<chrono::NaiveDate>,
}

impl RowModel for Contact {
    fn schema() -> Schema {
        Schema::builder()
            .required("name", "Name", FieldKind::Text)
            .required("age", "Age", FieldKind::Integer)
            .required("balance", "Balance", FieldKind::Decimal)
            .required("active", "Active", FieldKind::Boolean)
            .optional("joined", "Joined", FieldKind::Date)
            .finish()
    }

    fn from_row(mut row: Row) -> Self {
        Contact {
            name: row.take_text(0),
            age: row.integer(1),
            balance: row.decimal(2),
            active: row.boolean(3),
            joined: row.date(4),
        }
    }
}
