//! Format mapping utilities.
//!
//! Four independent components, modelled on SAS formats and informats:
//!
//! - **lookup**: discrete key to display value tables with a default
//! - **binning**: labelled half-open intervals over ordered boundaries
//! - **mask**: values that keep their display format through arithmetic
//! - **formats** and **registry**: named definitions that render values and
//!   parse formatted text back
//!
//! The free functions below work against [`FormatRegistry::global`].
//!
//! ```
//! use fmtmap_core::{Value, parse};
//!
//! assert_eq!(parse("(82.5%)", "accounting-percent").unwrap(), Value::Number(-0.825));
//! assert_eq!(parse("£1,000.00", "currency").unwrap(), Value::Number(1000.0));
//! ```

pub mod binning;
pub mod catalog;
pub mod definition;
pub mod formats;
pub mod lookup;
pub mod mask;
pub mod registry;

pub use binning::{BinPolicy, BinSpec};
pub use catalog::FormatCatalog;
pub use definition::{FnFormat, FormatDefinition, Lossiness, ParseFn, RenderFn};
pub use fmtmap_model::{Closed, FormatError, LookupKey, Result, Value};
pub use lookup::{LookupTable, LookupTableBuilder};
pub use mask::MaskedValue;
pub use registry::FormatRegistry;

pub fn lookup(table: &LookupTable, key: impl Into<LookupKey>) -> Result<&str> {
    table.get(key)
}

pub fn bin(spec: &BinSpec, value: f64) -> Result<&str> {
    spec.bin(value)
}

/// Masks `raw` with a format from the global registry.
pub fn mask<T>(raw: T, format_name: &str) -> Result<MaskedValue<T>>
where
    T: Clone + Into<Value>,
{
    FormatRegistry::global().mask(raw, format_name)
}

pub fn unwrap<T>(masked: MaskedValue<T>) -> T {
    masked.unwrap()
}

/// Parses `text` with a format from the global registry.
pub fn parse(text: &str, format_name: &str) -> Result<Value> {
    FormatRegistry::global().parse(text, format_name)
}

pub fn render(value: &Value, format_name: &str) -> Result<String> {
    FormatRegistry::global().render(value, format_name)
}

/// Registers a closure-based format in the global registry.
///
/// # Errors
///
/// [`FormatError::DuplicateFormat`] if the name is already taken.
pub fn register_format<R, P>(name: &str, render: R, parse: P) -> Result<()>
where
    R: Fn(&Value) -> Result<String> + Send + Sync + 'static,
    P: Fn(&str) -> Result<Value> + Send + Sync + 'static,
{
    FormatRegistry::global().register_fn(name, render, parse)
}
