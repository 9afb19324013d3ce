//! Polars AnyValue conversions.
//!
//! Cells arrive either typed (numeric columns built in memory) or as raw text
//! (CSV files read with every column as a string).

use chrono::NaiveDate;
use fmtmap_core::{FormatDefinition, LookupKey, LookupTable, Value};
use fmtmap_model::format_numeric;
use polars::prelude::AnyValue;

/// Converts a Polars AnyValue to a String representation.
/// Returns `None` for Null and blank text.
pub fn any_to_text(value: AnyValue<'_>) -> Option<String> {
    let text = match value {
        AnyValue::Null => return None,
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.trim().to_string(),
        AnyValue::StringOwned(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Converts an AnyValue to f64. Text must be a plain number.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<std::result::Result<f64, String>> {
    let number = match value {
        AnyValue::Null => return None,
        AnyValue::Int8(v) => f64::from(v),
        AnyValue::Int16(v) => f64::from(v),
        AnyValue::Int32(v) => f64::from(v),
        AnyValue::Int64(v) => v as f64,
        AnyValue::UInt8(v) => f64::from(v),
        AnyValue::UInt16(v) => f64::from(v),
        AnyValue::UInt32(v) => f64::from(v),
        AnyValue::UInt64(v) => v as f64,
        AnyValue::Float32(v) => f64::from(v),
        AnyValue::Float64(v) => v,
        other => {
            let text = any_to_text(other)?;
            return Some(text.parse::<f64>().map_err(|_| text));
        }
    };
    Some(Ok(number))
}

/// Integer-looking text matches an integer key when the table has one.
pub fn cell_key(table: &LookupTable, value: AnyValue<'_>) -> Option<LookupKey> {
    let integer = match value {
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        _ => None,
    };
    if let Some(n) = integer {
        return Some(LookupKey::Int(n));
    }
    let text = any_to_text(value)?;
    if let Ok(n) = text.parse::<i64>() {
        let key = LookupKey::Int(n);
        if table.contains(key.clone()) {
            return Some(key);
        }
    }
    Some(LookupKey::Text(text))
}

/// Candidate typed values for a cell, most specific first.
pub fn cell_candidates(value: AnyValue<'_>) -> Vec<Value> {
    if let Some(Ok(number)) = any_to_f64(value.clone()) {
        if !matches!(value, AnyValue::String(_) | AnyValue::StringOwned(_)) {
            return vec![Value::Number(number)];
        }
    }
    let Some(text) = any_to_text(value) else {
        return Vec::new();
    };
    let mut candidates = Vec::with_capacity(3);
    if let Ok(number) = text.parse::<f64>() {
        candidates.push(Value::Number(number));
    }
    if let Ok(date) = NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
        candidates.push(Value::Date(date));
    }
    candidates.push(Value::Text(text));
    candidates
}

/// Renders the first candidate of `value` that `definition` accepts.
///
/// Returns `None` for null or blank cells and the first rejection when no
/// candidate renders.
pub fn render_cell(
    definition: &dyn FormatDefinition,
    value: AnyValue<'_>,
) -> Option<fmtmap_core::Result<String>> {
    let mut first_error = None;
    for candidate in cell_candidates(value) {
        match definition.render(&candidate) {
            Ok(text) => return Some(Ok(text)),
            Err(error) => {
                first_error.get_or_insert(error);
            }
        }
    }
    first_error.map(Err)
}
