//! CSV reading and writing.
//!
//! Every column is read as text so formatted cells such as `$1,234.50` or
//! `(82.5%)` reach the parsers unchanged.

use std::fs::File;
use std::path::Path;

use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};
use tracing::debug;

use crate::error::{FrameError, Result};

/// Reads a CSV file with a single header row, keeping every column as text.
pub fn read_csv_text(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(FrameError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| FrameError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| FrameError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "read CSV");
    Ok(df)
}

/// Writes `df` as CSV with a header row.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|source| FrameError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    debug!(path = %path.display(), rows = df.height(), "wrote CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::DataType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn numeric_looking_columns_stay_text() {
        let file = create_temp_csv("ID,AMOUNT\n1,\"$1,234.50\"\n2,12\n");
        let df = read_csv_text(file.path()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("ID").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("AMOUNT").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_csv_text(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(FrameError::FileNotFound { .. })));
    }
}
