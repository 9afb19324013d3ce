//! Batch application of fmtmap components to Polars DataFrames.
//!
//! Columns are processed cell by cell. Nulls pass through; the first cell that
//! fails stops the batch with its column and row.

pub mod apply;
pub mod csv;
pub mod error;
pub mod values;

pub use apply::{bin_column, lookup_column, parse_column, render_column};
pub use csv::{read_csv_text, write_csv};
pub use error::{FrameError, Result};
