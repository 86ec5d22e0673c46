use chrono::NaiveDate;
use rowport_common::{FieldValue, Schema};

/// A caller-defined record type buildable from one coerced row.
///
/// `schema` is a pure function of the type: declare the binding once,
/// construct an [`ExcelDeserializer`](crate::ExcelDeserializer) from it, and
/// reuse that across calls. `from_row` only ever sees rows whose values
/// already passed coercion against that schema, in declaration order.
pub trait RowModel: Sized {
    fn schema() -> Schema;
    fn from_row(row: Row) -> Self;
}

/// One coercion-validated row, addressed by schema declaration order.
///
/// The typed accessors assume the invariant the engine maintains: slot `i`
/// holds a value of the kind declared for column `i`, or `Empty` for an
/// absent optional field. Non-`opt` accessors fall back to the kind's zero
/// value on absence.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<FieldValue>,
}

impl Row {
    pub(crate) fn new(values: Vec<FieldValue>) -> Self {
        Self { values }
    }

    fn get(&self, idx: usize) -> &FieldValue {
        self.values.get(idx).unwrap_or(&FieldValue::Empty)
    }

    pub fn text(&self, idx: usize) -> &str {
        match self.get(idx) {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    /// Move the text out of slot `idx`, leaving it absent.
    pub fn take_text(&mut self, idx: usize) -> String {
        match self.values.get_mut(idx) {
            Some(slot) if matches!(slot, FieldValue::Text(_)) => {
                match std::mem::replace(slot, FieldValue::Empty) {
                    FieldValue::Text(s) => s,
                    _ => unreachable!(),
                }
            }
            _ => String::new(),
        }
    }

    pub fn opt_text(&self, idx: usize) -> Option<&str> {
        match self.get(idx) {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&self, idx: usize) -> i64 {
        self.opt_integer(idx).unwrap_or(0)
    }

    pub fn opt_integer(&self, idx: usize) -> Option<i64> {
        match self.get(idx) {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn decimal(&self, idx: usize) -> f64 {
        self.opt_decimal(idx).unwrap_or(0.0)
    }

    pub fn opt_decimal(&self, idx: usize) -> Option<f64> {
        match self.get(idx) {
            FieldValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn boolean(&self, idx: usize) -> bool {
        self.opt_boolean(idx).unwrap_or(false)
    }

    pub fn opt_boolean(&self, idx: usize) -> Option<bool> {
        match self.get(idx) {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Dates have no natural zero value; absence is always `None`.
    pub fn date(&self, idx: usize) -> Option<NaiveDate> {
        match self.get(idx) {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }
}
