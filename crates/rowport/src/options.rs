/// What to do when a data row fails coercion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RowErrorPolicy {
    /// Abort the whole call on the first malformed row.
    #[default]
    FailFast,
    /// Omit the row from the output and record it in the error log.
    SkipAndReport,
}

/// Which worksheet to deserialize.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetSelector {
    /// 0-based position in the workbook's sheet list.
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

/// Immutable per-call configuration. Resolved before a run and shared
/// read-only for its duration.
#[derive(Clone, Debug)]
pub struct DeserializeOptions {
    /// When true, the first populated row is a header and name-bound
    /// columns resolve against it; otherwise binding is purely positional.
    pub has_header_row: bool,
    pub row_error_policy: RowErrorPolicy,
    /// chrono format string for Date fields bound to textual cells.
    pub date_format: String,
    pub sheet: SheetSelector,
    /// Cap on the number of data rows scanned (header excluded).
    pub max_rows: Option<usize>,
    /// Trim surrounding whitespace of Text-kind values.
    pub trim_text: bool,
    /// Ignore fully blank rows instead of failing them on their first
    /// required field.
    pub skip_blank_rows: bool,
}

impl Default for DeserializeOptions {
    fn default() -> Self {
        Self {
            has_header_row: true,
            row_error_policy: RowErrorPolicy::default(),
            date_format: "%Y-%m-%d".to_string(),
            sheet: SheetSelector::default(),
            max_rows: None,
            trim_text: false,
            skip_blank_rows: true,
        }
    }
}

impl DeserializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header_row(mut self, has_header_row: bool) -> Self {
        self.has_header_row = has_header_row;
        self
    }

    pub fn with_row_error_policy(mut self, policy: RowErrorPolicy) -> Self {
        self.row_error_policy = policy;
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn with_sheet(mut self, sheet: SheetSelector) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    pub fn with_trim_text(mut self, trim_text: bool) -> Self {
        self.trim_text = trim_text;
        self
    }

    pub fn with_skip_blank_rows(mut self, skip: bool) -> Self {
        self.skip_blank_rows = skip;
        self
    }
}
