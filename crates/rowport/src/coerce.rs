use chrono::NaiveDate;

use rowport_common::{CellValue, ColumnSpec, FieldKind, FieldValue, RowError, RowErrorKind, Schema};

use crate::binding::SchemaBinding;
use crate::model::Row;
use crate::options::DeserializeOptions;

/// Coerce one raw row into a typed row, field by field in declaration
/// order. The first failing field stops evaluation and describes the
/// offending column; a row is never partially populated.
pub(crate) fn coerce_row(
    row: &crate::reader::RawRow,
    schema: &Schema,
    binding: &SchemaBinding,
    options: &DeserializeOptions,
) -> Result<Row, RowError> {
    let mut values = Vec::with_capacity(schema.len());

    for bound in binding.fields() {
        let spec = &schema.columns()[bound.spec];
        let cell = match bound.column {
            Some(col) => row.cell(col),
            None => &CellValue::Empty,
        };

        if cell.is_blank() {
            if spec.required {
                return Err(RowError::new(
                    row.index(),
                    spec.column.to_string(),
                    RowErrorKind::MissingRequired,
                    cell.to_string(),
                ));
            }
            values.push(FieldValue::Empty);
            continue;
        }

        let coerced = match spec.converter {
            Some(convert) => convert(cell),
            None => coerce_value(cell, spec, options),
        };

        match coerced {
            Some(value) => values.push(value),
            None => {
                return Err(RowError::new(
                    row.index(),
                    spec.column.to_string(),
                    RowErrorKind::TypeMismatch,
                    cell.to_string(),
                ));
            }
        }
    }

    Ok(Row::new(values))
}

/// Built-in coercion rules for one non-blank cell. `None` is a mismatch.
fn coerce_value(cell: &CellValue, spec: &ColumnSpec, options: &DeserializeOptions) -> Option<FieldValue> {
    // Error markers are not values, whatever the target kind.
    if matches!(cell, CellValue::Error(_)) {
        return None;
    }

    match spec.kind {
        FieldKind::Integer => coerce_integer(cell),
        FieldKind::Decimal => coerce_decimal(cell),
        FieldKind::Boolean => coerce_boolean(cell),
        FieldKind::Date => {
            let format = spec.date_format.as_deref().unwrap_or(&options.date_format);
            coerce_date(cell, format)
        }
        FieldKind::Text => {
            let text = cell.to_string();
            Some(FieldValue::Text(if options.trim_text {
                text.trim().to_string()
            } else {
                text
            }))
        }
    }
}

fn coerce_integer(cell: &CellValue) -> Option<FieldValue> {
    match cell {
        CellValue::Int(i) => Some(FieldValue::Int(*i)),
        // XLSX stores most integers as floats; accept them when integral
        // and representable without saturating the cast.
        CellValue::Number(n) if n.fract() == 0.0 && fits_i64(*n) => {
            Some(FieldValue::Int(*n as i64))
        }
        CellValue::Text(s) => s.trim().parse::<i64>().ok().map(FieldValue::Int),
        _ => None,
    }
}

/// Integral floats in [-2^63, 2^63) convert to i64 exactly.
fn fits_i64(n: f64) -> bool {
    n >= i64::MIN as f64 && n < -(i64::MIN as f64)
}

fn coerce_decimal(cell: &CellValue) -> Option<FieldValue> {
    match cell {
        CellValue::Int(i) => Some(FieldValue::Decimal(*i as f64)),
        CellValue::Number(n) => Some(FieldValue::Decimal(*n)),
        // Full parse only, and the inf/NaN spellings are not numbers here.
        CellValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(FieldValue::Decimal),
        _ => None,
    }
}

fn coerce_boolean(cell: &CellValue) -> Option<FieldValue> {
    match cell {
        CellValue::Boolean(b) => Some(FieldValue::Boolean(*b)),
        CellValue::Text(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("true") {
                Some(FieldValue::Boolean(true))
            } else if s.eq_ignore_ascii_case("false") {
                Some(FieldValue::Boolean(false))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn coerce_date(cell: &CellValue, format: &str) -> Option<FieldValue> {
    match cell {
        CellValue::DateTime(dt) => Some(FieldValue::Date(dt.date())),
        // Exact-format parse only; chrono rejects trailing input.
        CellValue::Text(s) => NaiveDate::parse_from_str(s.trim(), format)
            .ok()
            .map(FieldValue::Date),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::RawRow;
    use chrono::NaiveDate;

    fn run(cells: Vec<CellValue>, schema: &Schema, options: &DeserializeOptions) -> Result<Row, RowError> {
        let binding = SchemaBinding::resolve(schema, None).unwrap();
        let row = RawRow::new(2, cells);
        coerce_row(&row, schema, &binding, options)
    }

    fn single(kind: FieldKind) -> Schema {
        Schema::builder().required("f", 1u32, kind).finish()
    }

    #[test]
    fn integral_float_coerces_to_integer() {
        let row = run(
            vec![CellValue::Number(42.0)],
            &single(FieldKind::Integer),
            &DeserializeOptions::default(),
        )
        .unwrap();
        assert_eq!(row.integer(0), 42);
    }

    #[test]
    fn fractional_float_is_not_an_integer() {
        let err = run(
            vec![CellValue::Number(42.5)],
            &single(FieldKind::Integer),
            &DeserializeOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind, RowErrorKind::TypeMismatch);
        assert_eq!(err.row, 2);
    }

    #[test]
    fn partial_numeric_text_is_a_mismatch() {
        let err = run(
            vec![CellValue::Text("12abc".into())],
            &single(FieldKind::Integer),
            &DeserializeOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind, RowErrorKind::TypeMismatch);
        assert_eq!(err.raw, "12abc");
    }

    #[test]
    fn integer_beyond_i64_range_is_a_mismatch() {
        let opts = DeserializeOptions::default();
        let schema = single(FieldKind::Integer);
        let err = run(vec![CellValue::Number(1.0e19)], &schema, &opts).unwrap_err();
        assert_eq!(err.kind, RowErrorKind::TypeMismatch);
        // The last integral float below 2^63 still converts.
        let row = run(vec![CellValue::Number(9.2233720368547738e18)], &schema, &opts).unwrap();
        assert_eq!(row.integer(0), 9223372036854773760);
    }

    #[test]
    fn non_finite_decimal_text_is_a_mismatch() {
        let opts = DeserializeOptions::default();
        let schema = single(FieldKind::Decimal);
        for raw in ["inf", "-inf", "NaN", "infinity"] {
            let err = run(vec![CellValue::Text(raw.into())], &schema, &opts).unwrap_err();
            assert_eq!(err.kind, RowErrorKind::TypeMismatch, "raw `{raw}`");
        }
    }

    #[test]
    fn textual_decimal_parses_fully() {
        let row = run(
            vec![CellValue::Text(" 3.25 ".into())],
            &single(FieldKind::Decimal),
            &DeserializeOptions::default(),
        )
        .unwrap();
        assert_eq!(row.decimal(0), 3.25);
    }

    #[test]
    fn boolean_literals_are_case_insensitive() {
        let opts = DeserializeOptions::default();
        let schema = single(FieldKind::Boolean);
        assert!(run(vec![CellValue::Text("TRUE".into())], &schema, &opts)
            .unwrap()
            .boolean(0));
        assert!(!run(vec![CellValue::Text("False".into())], &schema, &opts)
            .unwrap()
            .boolean(0));
        assert!(run(vec![CellValue::Text("yes".into())], &schema, &opts).is_err());
        assert!(run(vec![CellValue::Int(1)], &schema, &opts).is_err());
    }

    #[test]
    fn date_text_must_match_the_configured_format_exactly() {
        let opts = DeserializeOptions::default().with_date_format("%d/%m/%Y");
        let schema = single(FieldKind::Date);
        let row = run(vec![CellValue::Text("01/03/2023".into())], &schema, &opts).unwrap();
        assert_eq!(row.date(0), NaiveDate::from_ymd_opt(2023, 3, 1));
        assert!(run(vec![CellValue::Text("2023-03-01".into())], &schema, &opts).is_err());
        // Trailing garbage is not a partial parse.
        assert!(run(vec![CellValue::Text("01/03/2023x".into())], &schema, &opts).is_err());
    }

    #[test]
    fn per_column_date_format_overrides_the_option() {
        let schema = Schema::builder()
            .push(
                rowport_common::ColumnSpec::new("f", 1u32, FieldKind::Date)
                    .with_date_format("%m-%d-%Y"),
            )
            .finish();
        let row = run(
            vec![CellValue::Text("03-01-2023".into())],
            &schema,
            &DeserializeOptions::default(),
        )
        .unwrap();
        assert_eq!(row.date(0), NaiveDate::from_ymd_opt(2023, 3, 1));
    }

    #[test]
    fn plain_numeric_cell_is_not_a_date() {
        let err = run(
            vec![CellValue::Number(44986.0)],
            &single(FieldKind::Date),
            &DeserializeOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind, RowErrorKind::TypeMismatch);
    }

    #[test]
    fn any_cell_renders_as_text() {
        let schema = single(FieldKind::Text);
        let opts = DeserializeOptions::default();
        assert_eq!(
            run(vec![CellValue::Number(3.0)], &schema, &opts)
                .unwrap()
                .text(0),
            "3"
        );
        assert_eq!(
            run(vec![CellValue::Boolean(true)], &schema, &opts)
                .unwrap()
                .text(0),
            "true"
        );
    }

    #[test]
    fn trim_text_option_strips_whitespace() {
        let opts = DeserializeOptions::default().with_trim_text(true);
        let row = run(
            vec![CellValue::Text("  padded  ".into())],
            &single(FieldKind::Text),
            &opts,
        )
        .unwrap();
        assert_eq!(row.text(0), "padded");
    }

    #[test]
    fn error_cells_mismatch_even_for_text() {
        let err = run(
            vec![CellValue::Error("#DIV/0!".into())],
            &single(FieldKind::Text),
            &DeserializeOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind, RowErrorKind::TypeMismatch);
        assert_eq!(err.raw, "#DIV/0!");
    }

    #[test]
    fn blank_required_field_is_missing_required() {
        let err = run(
            vec![CellValue::Text("  ".into())],
            &single(FieldKind::Text),
            &DeserializeOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind, RowErrorKind::MissingRequired);
    }

    #[test]
    fn blank_optional_field_reads_as_absent() {
        let schema = Schema::builder().optional("f", 1u32, FieldKind::Integer).finish();
        let row = run(vec![CellValue::Empty], &schema, &DeserializeOptions::default()).unwrap();
        assert_eq!(row.opt_integer(0), None);
        assert_eq!(row.integer(0), 0);
    }

    #[test]
    fn first_offending_column_wins() {
        let schema = Schema::builder()
            .required("a", 1u32, FieldKind::Integer)
            .required("b", 2u32, FieldKind::Integer)
            .finish();
        let err = run(
            vec![CellValue::Text("bad".into()), CellValue::Text("also bad".into())],
            &schema,
            &DeserializeOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.column, "#1");
    }

    #[test]
    fn converter_replaces_builtin_rules() {
        fn percent(cell: &CellValue) -> Option<FieldValue> {
            match cell {
                CellValue::Text(s) => s
                    .trim()
                    .strip_suffix('%')?
                    .parse::<f64>()
                    .ok()
                    .map(|p| FieldValue::Decimal(p / 100.0)),
                _ => None,
            }
        }
        let schema = Schema::builder()
            .push(
                rowport_common::ColumnSpec::new("rate", 1u32, FieldKind::Decimal)
                    .with_converter(percent),
            )
            .finish();
        let opts = DeserializeOptions::default();
        let row = run(vec![CellValue::Text("12.5%".into())], &schema, &opts).unwrap();
        assert_eq!(row.decimal(0), 0.125);
        let err = run(vec![CellValue::Number(0.125)], &schema, &opts).unwrap_err();
        assert_eq!(err.kind, RowErrorKind::TypeMismatch);
    }
}
