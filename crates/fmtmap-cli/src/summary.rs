//! Terminal tables for command output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use fmtmap_core::{FormatRegistry, Value};
use fmtmap_frame::values::any_to_text;
use polars::prelude::{AnyValue, DataFrame};

use crate::steps::StepReport;

/// Name and lossiness of every registered format, sorted by name.
pub fn format_rows(registry: &FormatRegistry) -> Vec<(String, String)> {
    registry
        .snapshot()
        .iter()
        .map(|(name, definition)| (name.clone(), definition.lossiness().to_string()))
        .collect()
}

pub fn formats_table(registry: &FormatRegistry) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Format"), header_cell("Round trip")]);
    apply_table_style(&mut table);
    for (name, lossiness) in format_rows(registry) {
        table.add_row(vec![Cell::new(name), Cell::new(lossiness)]);
    }
    table
}

/// First `rows` rows of `df`. Nulls show as `.` like SAS missing values.
pub fn preview_rows(df: &DataFrame, rows: usize) -> Vec<Vec<String>> {
    let columns = df.get_columns();
    (0..df.height().min(rows))
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    any_to_text(column.get(row).unwrap_or(AnyValue::Null))
                        .unwrap_or_else(|| ".".to_string())
                })
                .collect()
        })
        .collect()
}

pub fn preview_table(df: &DataFrame, rows: usize) -> Table {
    let mut table = Table::new();
    table.set_header(
        df.get_column_names()
            .into_iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for row in preview_rows(df, rows) {
        table.add_row(row);
    }
    table
}

pub fn steps_table(reports: &[StepReport]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Column"),
        header_cell("Target"),
        header_cell("Using"),
        header_cell("Cells"),
    ]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(4) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for report in reports {
        table.add_row(vec![
            Cell::new(report.kind),
            Cell::new(&report.column),
            Cell::new(&report.target),
            Cell::new(&report.name),
            Cell::new(report.written),
        ]);
    }
    table
}

/// JSON text for a parsed value: numbers bare, dates and text quoted.
pub fn describe_value(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}
