//! CSV in, formatted columns out.

use std::io::Write;

use fmtmap_core::{FormatCatalog, FormatRegistry};
use fmtmap_frame::{
    FrameError, bin_column, lookup_column, parse_column, read_csv_text, render_column, write_csv,
};
use tempfile::NamedTempFile;

const CATALOG: &str = r#"{
  "lookups": [
    { "name": "region",
      "entries": [{"key": "E", "value": "Europe"}, {"key": "SA", "value": "South America"}],
      "default": "Unknown" }
  ],
  "bins": [
    { "name": "age_group", "boundaries": [0, 40, 60, 100],
      "labels": ["Young", "Middle-Aged", "Old"],
      "closed": "right", "include_outer": false }
  ]
}"#;

fn create_temp_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

fn column_text(df: &polars::prelude::DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.map(String::from))
        .collect()
}

#[test]
fn catalog_driven_batch() {
    let file = create_temp_csv(
        "ID,REGION,AGE,AMOUNT\n1,E,59,\"$1,234.50\"\n2,AS,30,$12.00\n3,SA,,\n",
    );
    let mut df = read_csv_text(file.path()).unwrap();
    let catalog = FormatCatalog::from_json_str(CATALOG).unwrap();
    let registry = FormatRegistry::with_builtins();

    lookup_column(&mut df, "REGION", "REGION", catalog.lookup_table("region").unwrap()).unwrap();
    bin_column(&mut df, "AGE", "AGE_GROUP", catalog.bin_spec("age_group").unwrap()).unwrap();
    let dollar = registry.get("dollar").unwrap();
    parse_column(&mut df, "AMOUNT", "AMOUNT_N", dollar.as_ref()).unwrap();
    let comma = registry.get("comma").unwrap();
    render_column(&mut df, "AMOUNT_N", "AMOUNT_C", comma.as_ref()).unwrap();

    assert_eq!(
        column_text(&df, "REGION"),
        vec![
            Some("Europe".to_string()),
            Some("Unknown".to_string()),
            Some("South America".to_string())
        ]
    );
    assert_eq!(
        column_text(&df, "AGE_GROUP"),
        vec![Some("Middle-Aged".to_string()), Some("Young".to_string()), None]
    );
    assert_eq!(
        column_text(&df, "AMOUNT_C"),
        vec![Some("1,234.5".to_string()), Some("12".to_string()), None]
    );

    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("out.csv");
    write_csv(&mut df, &path).unwrap();
    let written = read_csv_text(&path).unwrap();
    assert_eq!(written.height(), 3);
    assert_eq!(column_text(&written, "AGE_GROUP")[0].as_deref(), Some("Middle-Aged"));
}

#[test]
fn malformed_cell_stops_the_batch() {
    let file = create_temp_csv("SHARE\n10%\n£5\n");
    let mut df = read_csv_text(file.path()).unwrap();
    let registry = FormatRegistry::with_builtins();
    let percent = registry.get("percent").unwrap();
    let error = parse_column(&mut df, "SHARE", "SHARE", percent.as_ref()).unwrap_err();
    match error {
        FrameError::Cell { column, row, .. } => {
            assert_eq!(column, "SHARE");
            assert_eq!(row, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}
