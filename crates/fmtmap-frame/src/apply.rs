//! Column-level application of lookups, bins and formats.
//!
//! Each function reads `source`, writes `target` (which may be the same
//! column) and returns the number of non-null cells written. Null and blank
//! cells stay null. The first failing cell aborts the call and the frame is
//! left untouched.

use chrono::NaiveDate;
use fmtmap_core::{BinSpec, FormatDefinition, FormatError, LookupTable, Value};
use polars::prelude::{AnyValue, Column, DataFrame, NamedFrom, Series};
use tracing::debug;

use crate::error::{FrameError, Result};
use crate::values::{any_to_f64, cell_key, render_cell};

fn source_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| FrameError::ColumnNotFound {
        column: name.to_string(),
    })
}

fn cell_error(column: &str, row: usize, source: FormatError) -> FrameError {
    FrameError::Cell {
        column: column.to_string(),
        row,
        source,
    }
}

fn write_text(df: &mut DataFrame, target: &str, values: Vec<Option<String>>) -> Result<usize> {
    let written = values.iter().filter(|value| value.is_some()).count();
    df.with_column(Series::new(target.into(), values))?;
    Ok(written)
}

/// Replaces each key in `source` by its display value.
pub fn lookup_column(
    df: &mut DataFrame,
    source: &str,
    target: &str,
    table: &LookupTable,
) -> Result<usize> {
    let column = source_column(df, source)?;
    let mut values = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let cell = column.get(row).unwrap_or(AnyValue::Null);
        let value = match cell_key(table, cell) {
            Some(key) => Some(
                table
                    .get(key)
                    .map_err(|error| cell_error(source, row, error))?
                    .to_string(),
            ),
            None => None,
        };
        values.push(value);
    }
    let written = write_text(df, target, values)?;
    debug!(source, target, written, "applied lookup table");
    Ok(written)
}

/// Replaces each number in `source` by its interval label.
///
/// Text cells holding ISO dates are binned by their day ordinal.
pub fn bin_column(df: &mut DataFrame, source: &str, target: &str, spec: &BinSpec) -> Result<usize> {
    let column = source_column(df, source)?;
    let mut values = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let cell = column.get(row).unwrap_or(AnyValue::Null);
        let value = match any_to_f64(cell) {
            Some(Ok(number)) => Some(
                spec.bin(number)
                    .map_err(|error| cell_error(source, row, error))?
                    .to_string(),
            ),
            Some(Err(text)) => match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
                Ok(date) => Some(
                    spec.bin_date(date)
                        .map_err(|error| cell_error(source, row, error))?
                        .to_string(),
                ),
                Err(_) => {
                    return Err(cell_error(
                        source,
                        row,
                        FormatError::unparsable(text, "number", "not a number or ISO date"),
                    ));
                }
            },
            None => None,
        };
        values.push(value);
    }
    let written = write_text(df, target, values)?;
    debug!(source, target, written, "applied bins");
    Ok(written)
}

/// Parses formatted text in `source` into typed values.
///
/// The target is a Float64 column when every parsed value is a number;
/// otherwise values are written as text (dates in ISO form).
pub fn parse_column(
    df: &mut DataFrame,
    source: &str,
    target: &str,
    definition: &dyn FormatDefinition,
) -> Result<usize> {
    let column = source_column(df, source)?;
    let mut parsed: Vec<Option<Value>> = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let cell = column.get(row).unwrap_or(AnyValue::Null);
        let value = match crate::values::any_to_text(cell) {
            Some(text) => Some(
                definition
                    .parse(&text)
                    .map_err(|error| cell_error(source, row, error))?,
            ),
            None => None,
        };
        parsed.push(value);
    }

    let written = parsed.iter().filter(|value| value.is_some()).count();
    let all_numbers = parsed
        .iter()
        .flatten()
        .all(|value| matches!(value, Value::Number(_)));
    if all_numbers {
        let numbers: Vec<Option<f64>> = parsed
            .iter()
            .map(|value| value.as_ref().and_then(Value::as_f64))
            .collect();
        df.with_column(Series::new(target.into(), numbers))?;
    } else {
        let texts: Vec<Option<String>> = parsed
            .iter()
            .map(|value| value.as_ref().map(ToString::to_string))
            .collect();
        df.with_column(Series::new(target.into(), texts))?;
    }
    debug!(source, target, written, format = definition.name(), "parsed column");
    Ok(written)
}

/// Renders each value in `source` through `definition`.
///
/// Text cells are offered to the definition as a number, then as an ISO date,
/// then as text; the first form it renders is used.
pub fn render_column(
    df: &mut DataFrame,
    source: &str,
    target: &str,
    definition: &dyn FormatDefinition,
) -> Result<usize> {
    let column = source_column(df, source)?;
    let mut values = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let cell = column.get(row).unwrap_or(AnyValue::Null);
        let value = render_cell(definition, cell)
            .transpose()
            .map_err(|error| cell_error(source, row, error))?;
        values.push(value);
    }
    let written = write_text(df, target, values)?;
    debug!(source, target, written, format = definition.name(), "rendered column");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmtmap_core::{BinPolicy, FormatRegistry};
    use polars::prelude::IntoColumn;

    fn text_frame(name: &str, values: &[Option<&str>]) -> DataFrame {
        let column = Series::new(name.into(), values.to_vec()).into_column();
        DataFrame::new(vec![column]).unwrap()
    }

    fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|value| value.map(String::from))
            .collect()
    }

    #[test]
    fn lookup_writes_target_and_keeps_nulls() {
        let mut df = text_frame("REGION", &[Some("E"), None, Some("AS")]);
        let table = LookupTable::builder()
            .entry("E", "Europe")
            .default_value("Unknown")
            .build()
            .unwrap();
        let written = lookup_column(&mut df, "REGION", "REGION_LABEL", &table).unwrap();
        assert_eq!(written, 2);
        assert_eq!(
            strings(&df, "REGION_LABEL"),
            vec![Some("Europe".to_string()), None, Some("Unknown".to_string())]
        );
    }

    #[test]
    fn out_of_range_cell_reports_row() {
        let mut df = text_frame("AGE", &[Some("59"), Some("120")]);
        let spec = BinSpec::new(vec![0.0, 60.0, 100.0], None, BinPolicy::right(false)).unwrap();
        let error = bin_column(&mut df, "AGE", "AGE_GROUP", &spec).unwrap_err();
        assert!(matches!(
            error,
            FrameError::Cell { row: 1, source: FormatError::OutOfRange { .. }, .. }
        ));
        assert!(df.column("AGE_GROUP").is_err());
    }

    #[test]
    fn parse_produces_numbers() {
        let mut df = text_frame("SHARE", &[Some("(82.5%)"), Some("10%"), None]);
        let registry = FormatRegistry::with_builtins();
        let definition = registry.get("accounting-percent").unwrap();
        parse_column(&mut df, "SHARE", "SHARE", definition.as_ref()).unwrap();
        let values: Vec<Option<f64>> = df
            .column("SHARE")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(-0.825), Some(0.1), None]);
    }

    #[test]
    fn render_uses_first_renderable_form() {
        let mut df = text_frame("VISIT", &[Some("2024-01-05")]);
        let registry = FormatRegistry::with_builtins();
        let date9 = registry.get("date9").unwrap();
        render_column(&mut df, "VISIT", "VISIT_FMT", date9.as_ref()).unwrap();
        assert_eq!(strings(&df, "VISIT_FMT"), vec![Some("05JAN2024".to_string())]);
    }

    #[test]
    fn missing_column_is_reported() {
        let mut df = text_frame("A", &[Some("1")]);
        let table = LookupTable::builder().build().unwrap();
        assert!(matches!(
            lookup_column(&mut df, "B", "C", &table),
            Err(FrameError::ColumnNotFound { .. })
        ));
    }
}
